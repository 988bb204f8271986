use duration_str::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("mapfield.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub geocoding: Option<Geocoding>,
    pub map: Option<Map>,
    pub field: Option<Field>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub debounce: Duration,
    pub limit: Option<u32>,
    pub user_agent: Option<String>,
}

impl Default for Geocoding {
    fn default() -> Self {
        Config::default()
            .geocoding
            .expect("Geocoding configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub max_zoom: f64,
    pub padding: [f64; 4],
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Map {
    fn default() -> Self {
        Config::default().map.expect("Map configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Field {
    pub r#type: Option<String>,
    pub decimals: Option<u8>,
}

impl Default for Field {
    fn default() -> Self {
        Config::default().field.expect("Field configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.geocoding.is_some());
        assert!(cfg.map.is_some());
        assert!(cfg.field.is_some());
    }

    #[test]
    fn default_geocoding_config() {
        let cfg = Geocoding::default();
        assert_eq!(cfg.debounce, Duration::from_millis(300));
        assert!(cfg.limit.is_none());
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let cfg: Config = toml::from_str(
            r#"
            [geocoding]
            base-url = "http://localhost:7070/search"
            debounce = "1s"
            limit = 3
            user-agent = "test"

            [field]
            type = "Polygon"
            "#,
        )
        .unwrap();
        let geocoding = cfg.geocoding.unwrap();
        assert_eq!(geocoding.debounce, Duration::from_secs(1));
        assert_eq!(geocoding.limit, Some(3));
        assert!(cfg.map.is_none());
        let field = cfg.field.unwrap();
        assert_eq!(field.r#type.as_deref(), Some("Polygon"));
        assert!(field.decimals.is_none());
    }
}
