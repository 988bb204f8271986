mod location_button;
mod map_control;

pub use self::{location_button::*, map_control::*};
