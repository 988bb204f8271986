use mapfield_entities::{geo::MapPoint, search::SearchOption};
use thiserror::Error;

use super::NominatimPlace;

#[derive(Debug, Error)]
#[error("Invalid position of place {place_id}: lat={lat}, lon={lon}")]
pub struct InvalidPlace {
    pub place_id: u64,
    pub lat: String,
    pub lon: String,
}

impl TryFrom<NominatimPlace> for SearchOption {
    type Error = InvalidPlace;
    fn try_from(from: NominatimPlace) -> Result<Self, Self::Error> {
        let NominatimPlace {
            place_id,
            display_name,
            lon,
            lat,
        } = from;
        let pos = lat
            .trim()
            .parse::<f64>()
            .ok()
            .zip(lon.trim().parse::<f64>().ok())
            .and_then(|(lat, lon)| MapPoint::try_from_lat_lng_deg(lat, lon));
        let Some(pos) = pos else {
            return Err(InvalidPlace { place_id, lat, lon });
        };
        Ok(Self {
            label: display_name,
            value: place_id,
            lon: pos.lng(),
            lat: pos.lat(),
        })
    }
}
