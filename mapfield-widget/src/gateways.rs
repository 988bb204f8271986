use std::{fmt::Write as _, time::Duration};

use gloo_net::http::Request;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use mapfield_boundary::NominatimPlace;
use mapfield_core::{
    entities::search::SearchOption,
    gateways::{
        geocode::{GeocodingError, GeocodingGateway},
        timer::Timer,
    },
};

const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search.php";

/// Nominatim search from within the browser.
#[derive(Debug, Clone)]
pub struct Nominatim {
    url: String,
    limit: Option<u32>,
}

impl Nominatim {
    #[must_use]
    pub const fn new(url: String, limit: Option<u32>) -> Self {
        Self { url, limit }
    }

    fn search_url(&self, query: &str) -> String {
        let encoded_query = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let mut url = format!("{}?q={encoded_query}&format=json", self.url);
        if let Some(limit) = self.limit {
            let _ = write!(url, "&limit={limit}");
        }
        url
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new(DEFAULT_NOMINATIM_URL.to_string(), None)
    }
}

impl GeocodingGateway for Nominatim {
    async fn search(&self, query: &str) -> Result<Vec<SearchOption>, GeocodingError> {
        let url = self.search_url(query);
        log::debug!("GET {url}");
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|err| GeocodingError::Fetch(err.to_string()))?;
        if !response.ok() {
            return Err(GeocodingError::Fetch(format!(
                "{} {}",
                response.status(),
                response.status_text()
            )));
        }
        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| GeocodingError::Response(err.to_string()))?;
        let options = places
            .into_iter()
            .filter_map(|place| {
                SearchOption::try_from(place)
                    .map_err(|err| log::warn!("Skip place: {err}"))
                    .ok()
            })
            .collect();
        Ok(options)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
