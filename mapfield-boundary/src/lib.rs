use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[cfg(feature = "entity-conversions")]
pub use self::conv::InvalidPlace;

/// A single result of the Nominatim `search` endpoint (`format=json`).
///
/// Nominatim delivers the coordinates as decimal strings.
#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NominatimPlace {
    pub place_id     : u64,
    pub display_name : String,
    pub lon          : String,
    pub lat          : String,
}

/// Query parameters of the Nominatim `search` endpoint.
#[derive(Serialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct NominatimQuery<'a> {
    pub q: &'a str,
    pub format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl<'a> NominatimQuery<'a> {
    pub const fn json(q: &'a str) -> Self {
        Self {
            q,
            format: "json",
            limit: None,
        }
    }
}
