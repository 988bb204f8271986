use std::f64::consts::PI;

use strum::{Display, EnumString};

use crate::geo::Coord;

/// Radius of the sphere used by spherical Web Mercator.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world in meters.
pub const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Latitude at which the projected world becomes square.
pub const MAX_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Projection {
    /// Geographic longitude/latitude in degrees.
    #[strum(serialize = "EPSG:4326")]
    Geographic,
    /// Spherical Web Mercator in meters.
    #[strum(serialize = "EPSG:3857")]
    WebMercator,
}

impl Projection {
    pub fn transform(self, target: Self, c: Coord) -> Coord {
        match (self, target) {
            (Self::Geographic, Self::WebMercator) => from_lon_lat(c),
            (Self::WebMercator, Self::Geographic) => to_lon_lat(c),
            _ => c,
        }
    }
}

/// Projects a geographic `(lon, lat)` pair into Web Mercator meters.
pub fn from_lon_lat(c: Coord) -> Coord {
    let x = HALF_SIZE * c.x / 180.0;
    let lat = c.y.clamp(-MAX_LAT, MAX_LAT);
    let y = EARTH_RADIUS * (PI * (lat + 90.0) / 360.0).tan().ln();
    Coord::new(x, y.clamp(-HALF_SIZE, HALF_SIZE))
}

/// Unprojects Web Mercator meters into a geographic `(lon, lat)` pair.
pub fn to_lon_lat(c: Coord) -> Coord {
    let lon = 180.0 * c.x / HALF_SIZE;
    let lat = 360.0 * (c.y / EARTH_RADIUS).exp().atan() / PI - 90.0;
    Coord::new(lon, lat)
}
