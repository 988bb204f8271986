use anyhow::{anyhow, Result};
use mapfield_core::{
    entities::{
        field::{FieldConfig, DEFAULT_DECIMALS, MAX_DECIMALS},
        geometry::GeometryKind,
    },
    headless::Viewport,
    map::FitOptions,
};
use mapfield_gateways::nominatim::DEFAULT_USER_AGENT;
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "mapfield.toml";

const ENV_NAME_GEOCODING_URL: &str = "MAPFIELD_GEOCODING_URL";

pub struct Config {
    pub geocoding: Geocoding,
    pub map: Map,
    pub field: FieldConfig,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(base_url) = env::var(ENV_NAME_GEOCODING_URL) {
            cfg.geocoding.base_url = base_url;
        }
        Ok(cfg)
    }
}

pub struct Geocoding {
    pub base_url: String,
    pub debounce: Duration,
    /// Maximum number of places per search
    pub limit: Option<u32>,
    pub user_agent: String,
}

pub struct Map {
    pub fit: FitOptions,
    pub viewport: Viewport,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            geocoding,
            map,
            field,
        } = from;

        let raw::Geocoding {
            base_url,
            debounce,
            limit,
            user_agent,
        } = geocoding.unwrap_or_default();
        let geocoding = Geocoding {
            base_url,
            debounce,
            limit,
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };

        let raw::Map {
            max_zoom,
            padding,
            viewport_width,
            viewport_height,
        } = map.unwrap_or_default();
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            return Err(anyhow!(
                "Invalid viewport size {viewport_width}x{viewport_height}"
            ));
        }
        let map = Map {
            fit: FitOptions { max_zoom, padding },
            viewport: Viewport {
                width: viewport_width,
                height: viewport_height,
            },
        };

        let raw::Field { r#type, decimals } = field.unwrap_or_default();
        let geometry_kind = match r#type {
            Some(kind) => kind
                .parse::<GeometryKind>()
                .map_err(|_| anyhow!("Unsupported geometry type '{kind}'"))?,
            None => GeometryKind::default(),
        };
        let decimals = decimals.unwrap_or(DEFAULT_DECIMALS);
        if decimals > MAX_DECIMALS {
            return Err(anyhow!("Too many decimals: {decimals}"));
        }
        let field = FieldConfig {
            geometry_kind,
            decimals,
        };

        Ok(Self {
            geocoding,
            map,
            field,
        })
    }
}

#[cfg(test)]
mod tests {
    use mapfield_gateways::nominatim::DEFAULT_BASE_URL;

    use super::*;

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg = Config::try_load_from_file_or_default(file).unwrap();
        assert_eq!(cfg.field, FieldConfig::default());
        assert_eq!(cfg.map.fit, FitOptions::default());
        assert_eq!(cfg.map.viewport, Viewport::default());
        assert_eq!(cfg.geocoding.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn reject_unknown_geometry_type() {
        let raw: raw::Config = toml::from_str("[field]\ntype = \"Circle\"").unwrap();
        assert!(Config::try_from(raw).is_err());
    }

    #[test]
    fn reject_too_many_decimals() {
        let raw: raw::Config = toml::from_str("[field]\ndecimals = 16").unwrap();
        assert!(Config::try_from(raw).is_err());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let raw: raw::Config = toml::from_str("[field]\ntype = \"LineString\"").unwrap();
        let cfg = Config::try_from(raw).unwrap();
        assert_eq!(cfg.field.geometry_kind, GeometryKind::LineString);
        assert_eq!(cfg.field.decimals, DEFAULT_DECIMALS);
        assert_eq!(cfg.geocoding.debounce, Duration::from_millis(300));
        assert_eq!(cfg.geocoding.base_url, DEFAULT_BASE_URL);
    }
}
