//! Native gateways of the map field.

pub mod nominatim;
pub mod timer;
