use mapfield_boundary::{NominatimPlace, NominatimQuery};
use mapfield_core::{
    entities::search::SearchOption,
    gateways::geocode::{GeocodingError, GeocodingGateway},
};
use reqwest::{Client, Request};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search.php";

pub const DEFAULT_USER_AGENT: &str = concat!("mapfield/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Nominatim {
    client: Client,
    base_url: String,
    limit: Option<u32>,
}

impl Nominatim {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| GeocodingError::Fetch(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            limit: None,
        })
    }

    /// Restricts the number of places per search.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    fn request(&self, query: &str) -> reqwest::Result<Request> {
        let query = NominatimQuery {
            limit: self.limit,
            ..NominatimQuery::json(query)
        };
        self.client.get(&self.base_url).query(&query).build()
    }
}

impl GeocodingGateway for Nominatim {
    async fn search(&self, query: &str) -> Result<Vec<SearchOption>, GeocodingError> {
        let request = self
            .request(query)
            .map_err(|err| GeocodingError::Fetch(err.to_string()))?;
        log::debug!("GET {}", request.url());
        let response = self
            .client
            .execute(request)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| GeocodingError::Fetch(err.to_string()))?;
        let places = response
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|err| GeocodingError::Response(err.to_string()))?;
        Ok(into_options(places))
    }
}

/// Converts the places in response order, skipping those without a valid position.
fn into_options(places: Vec<NominatimPlace>) -> Vec<SearchOption> {
    places
        .into_iter()
        .filter_map(|place| match SearchOption::try_from(place) {
            Ok(option) => Some(option),
            Err(err) => {
                log::warn!("Skip place: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answers a single HTTP request with `response` and returns the search URL.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}/search")
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn search_request_url() {
        let nominatim = Nominatim::new(DEFAULT_BASE_URL, DEFAULT_USER_AGENT).unwrap();
        let req = nominatim.request("Paris").unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://nominatim.openstreetmap.org/search.php?q=Paris&format=json"
        );
    }

    #[test]
    fn search_request_with_limit_and_custom_base_url() {
        let nominatim = Nominatim::new("http://localhost:8080/search", "test")
            .unwrap()
            .with_limit(Some(5));
        let req = nominatim.request("Bad Honnef").unwrap();
        assert_eq!(req.url().host_str(), Some("localhost"));
        assert_eq!(req.url().path(), "/search");
        assert_eq!(req.url().query(), Some("q=Bad+Honnef&format=json&limit=5"));
    }

    #[test]
    fn options_of_response() {
        let json = r#"[
          { "place_id": 1, "display_name": "Paris, France", "lon": "2.35", "lat": "48.85",
            "class": "boundary", "importance": 0.9 },
          { "place_id": 2, "display_name": "Nowhere", "lon": "east", "lat": "91" },
          { "place_id": 3, "display_name": "Paris, Texas", "lon": "-95.55", "lat": "33.66" }
        ]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        let options = into_options(places);
        assert_eq!(
            options,
            vec![
                SearchOption {
                    label: "Paris, France".into(),
                    value: 1,
                    lon: 2.35,
                    lat: 48.85,
                },
                SearchOption {
                    label: "Paris, Texas".into(),
                    value: 3,
                    lon: -95.55,
                    lat: 33.66,
                },
            ]
        );
    }

    #[tokio::test]
    async fn search_places() {
        let body = r#"[{ "place_id": 7, "display_name": "Bonn", "lon": "7.1", "lat": "50.7" }]"#;
        let url = serve_once(http_response("200 OK", body)).await;
        let nominatim = Nominatim::new(url, DEFAULT_USER_AGENT).unwrap();
        let options = nominatim.search("Bonn").await.unwrap();
        assert_eq!(
            options,
            vec![SearchOption {
                label: "Bonn".into(),
                value: 7,
                lon: 7.1,
                lat: 50.7,
            }]
        );
    }

    #[tokio::test]
    async fn failed_status_is_a_fetch_error() {
        let url = serve_once(http_response("503 Service Unavailable", "")).await;
        let nominatim = Nominatim::new(url, DEFAULT_USER_AGENT).unwrap();
        let err = nominatim.search("Bonn").await.unwrap_err();
        assert!(matches!(err, GeocodingError::Fetch(_)), "{err:?}");
    }

    #[tokio::test]
    async fn invalid_body_is_a_response_error() {
        let url = serve_once(http_response("200 OK", "{ not json")).await;
        let nominatim = Nominatim::new(url, DEFAULT_USER_AGENT).unwrap();
        let err = nominatim.search("Bonn").await.unwrap_err();
        assert!(matches!(err, GeocodingError::Response(_)), "{err:?}");
    }
}
