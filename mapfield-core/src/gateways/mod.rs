pub mod geocode;
pub mod timer;
