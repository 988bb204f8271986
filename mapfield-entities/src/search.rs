use crate::geo::{Coord, MapPoint};

/// Identifier of a place as assigned by the geocoding service.
pub type PlaceId = u64;

/// A candidate place offered to the editor while searching.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOption {
    pub label: String,
    pub value: PlaceId,
    pub lon: f64,
    pub lat: f64,
}

impl SearchOption {
    pub const fn pos(&self) -> MapPoint {
        MapPoint::from_lat_lng_deg(self.lat, self.lon)
    }

    /// The position as a geographic `(lon, lat)` coordinate pair.
    pub const fn lon_lat(&self) -> Coord {
        Coord::new(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_of_option() {
        let option = SearchOption {
            label: "Paris, France".into(),
            value: 1,
            lon: 2.35,
            lat: 48.85,
        };
        assert_eq!(option.pos().lat(), 48.85);
        assert_eq!(option.pos().lng(), 2.35);
        assert_eq!(option.lon_lat(), Coord::new(2.35, 48.85));
    }
}
