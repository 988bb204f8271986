use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use mapfield_core::{
    codec::{GeoJsonCodec, GeometryCodec},
    control::{ControlProps, MapControl, MountedControl},
    entities::{
        field::{FieldConfig, MAX_DECIMALS},
        geo::{Coord, MapPoint},
        geometry::{Geometry, GeometryKind},
        projection,
        search::SearchOption,
    },
    gateways::{geocode::GeocodingGateway, timer::Timer},
    headless::{HeadlessLayer, HeadlessMap, HeadlessMapFactory},
    search::SearchController,
};
use mapfield_gateways::{nominatim::Nominatim, timer::TokioTimer};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "mapfield",
    version,
    about = "Search places and draw map field values without a browser"
)]
pub struct CliArgs {
    /// Path to the configuration file (default: mapfield.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search places by name
    Search {
        query: String,

        /// Put the n-th place (starting at 1) on a point field and print its value
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Draw a geometry through `lon,lat` positions and print the field value
    Encode {
        /// Geometry type of the field (e.g. Point, LineString, Polygon)
        #[arg(long = "type")]
        kind: Option<GeometryKind>,

        /// Number of decimals of the written coordinates
        #[arg(long)]
        decimals: Option<u8>,

        #[arg(required = true, allow_hyphen_values = true)]
        positions: Vec<String>,
    },

    /// Mount a field value and print the fitted view
    Inspect { value: String },
}

pub async fn run(args: CliArgs) -> Result<()> {
    let CliArgs { config, command } = args;
    let cfg = Config::try_load_from_file_or_default(config)?;
    match command {
        Commands::Search { query, pick } => search(&cfg, &query, pick).await,
        Commands::Encode {
            kind,
            decimals,
            positions,
        } => {
            let field = FieldConfig {
                geometry_kind: kind.unwrap_or(cfg.field.geometry_kind),
                decimals: decimals.unwrap_or(cfg.field.decimals),
            };
            println!("{}", encode(&cfg, field, &positions)?);
            Ok(())
        }
        Commands::Inspect { value } => inspect(&cfg, value),
    }
}

type Control = MountedControl<GeoJsonCodec, HeadlessLayer, HeadlessMap>;

type LastValue = Rc<RefCell<Option<String>>>;

fn mount(cfg: &Config, field: FieldConfig, value: Option<String>) -> Result<(Control, LastValue)> {
    let last_value = LastValue::default();
    let on_change = {
        let last_value = Rc::clone(&last_value);
        Box::new(move |value: String| *last_value.borrow_mut() = Some(value))
    };
    let props = ControlProps {
        field,
        value,
        on_change,
    };
    let control = MapControl::new(HeadlessMapFactory)
        .with_fit_options(cfg.map.fit)
        .mount(cfg.map.viewport, props)?;
    Ok((control, last_value))
}

async fn search(cfg: &Config, query: &str, pick: Option<usize>) -> Result<()> {
    let gateway = Nominatim::new(cfg.geocoding.base_url.clone(), &cfg.geocoding.user_agent)?
        .with_limit(cfg.geocoding.limit);
    let search = SearchController::with_debounce(gateway, TokioTimer, cfg.geocoding.debounce);
    search.input_changed(query).await;
    let options = search.state().options().to_vec();
    if options.is_empty() {
        println!("No places found");
        return Ok(());
    }
    for (i, option) in options.iter().enumerate() {
        println!(
            "{:>2}. {} ({:.5}, {:.5})",
            i + 1,
            option.label,
            option.lon,
            option.lat
        );
    }
    let Some(n) = pick else {
        return Ok(());
    };
    let option = pick_place(&search, n)?;
    println!("Selected: {}", option.label);
    let field = FieldConfig {
        geometry_kind: GeometryKind::Point,
        ..cfg.field
    };
    let (mut control, last_value) = mount(cfg, field, None)?;
    control.add_to_map(&option)?;
    if let Some(value) = last_value.borrow().as_deref() {
        println!("{value}");
    }
    Ok(())
}

/// Selects the `n`-th (1-based) place of the current options.
fn pick_place<G, T>(search: &SearchController<G, T>, n: usize) -> Result<SearchOption>
where
    G: GeocodingGateway + 'static,
    T: Timer + 'static,
{
    let option = n
        .checked_sub(1)
        .and_then(|i| search.state().options().get(i).cloned())
        .ok_or_else(|| anyhow!("There is no place #{n}"))?;
    search.select(Some(option));
    search
        .state()
        .selected()
        .cloned()
        .ok_or_else(|| anyhow!("No place selected"))
}

fn encode(cfg: &Config, field: FieldConfig, positions: &[String]) -> Result<String> {
    if field.decimals > MAX_DECIMALS {
        bail!("Too many decimals: {}", field.decimals);
    }
    let codec = GeoJsonCodec::default();
    let coords = positions
        .iter()
        .map(|pos| parse_position(pos).map(|c| codec.project(c)))
        .collect::<Result<Vec<_>, _>>()?;
    let geometry = Geometry::from_vertices(field.geometry_kind, coords)?;
    let (control, last_value) = mount(cfg, field, None)?;
    control.view().finish_drawing(geometry)?;
    let value = last_value.borrow_mut().take();
    value.ok_or_else(|| anyhow!("The geometry could not be encoded"))
}

fn inspect(cfg: &Config, value: String) -> Result<()> {
    let (control, _) = mount(cfg, cfg.field, Some(value))?;
    match control.features().first() {
        Some(feature) => {
            println!("type:   {}", feature.geometry.kind());
            if let Some(extent) = feature.extent() {
                let min = projection::to_lon_lat(extent.min());
                let max = projection::to_lon_lat(extent.max());
                println!(
                    "extent: {:.7},{:.7} {:.7},{:.7}",
                    min.x, min.y, max.x, max.y
                );
            }
        }
        None => println!("type:   -"),
    }
    let view = control.view().view();
    let center = projection::to_lon_lat(view.center);
    println!("center: {:.7},{:.7}", center.x, center.y);
    println!("zoom:   {:.2}", view.zoom);
    Ok(())
}

#[derive(Debug, Error)]
enum PositionError {
    #[error("Invalid position '{0}' (expected 'lon,lat')")]
    Format(String),
    #[error("Position '{0}' is out of range")]
    Range(String),
}

/// Parses a geographic `lon,lat` pair.
fn parse_position(pos: &str) -> Result<Coord, PositionError> {
    let format_err = || PositionError::Format(pos.to_string());
    let (lon, lat) = pos.split_once(',').ok_or_else(format_err)?;
    let lon = lon.trim().parse::<f64>().map_err(|_| format_err())?;
    let lat = lat.trim().parse::<f64>().map_err(|_| format_err())?;
    MapPoint::try_from_lat_lng_deg(lat, lon)
        .map(|p| Coord::new(p.lng(), p.lat()))
        .ok_or_else(|| PositionError::Range(pos.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use std::time::Duration;

    use clap::CommandFactory;
    use mapfield_core::gateways::geocode::GeocodingError;
    use serde_json::{json, Value};

    use super::*;

    struct Places;

    impl GeocodingGateway for Places {
        async fn search(&self, query: &str) -> Result<Vec<SearchOption>, GeocodingError> {
            Ok(["France", "Texas"]
                .into_iter()
                .zip(1..)
                .map(|(region, value)| SearchOption {
                    label: format!("{query}, {region}"),
                    value,
                    lon: 0.0,
                    lat: 0.0,
                })
                .collect())
        }
    }

    fn config() -> Config {
        Config::try_load_from_file_or_default(None::<&Path>).unwrap()
    }

    fn positions(ps: &[&str]) -> Vec<String> {
        ps.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_encode_command() {
        let args = CliArgs::try_parse_from([
            "mapfield", "encode", "--type", "Polygon", "--decimals", "3", "2.35,48.85", "1,1",
        ])
        .unwrap();
        let Commands::Encode {
            kind,
            decimals,
            positions,
        } = args.command
        else {
            panic!("expected the encode command");
        };
        assert_eq!(kind, Some(GeometryKind::Polygon));
        assert_eq!(decimals, Some(3));
        assert_eq!(positions, vec!["2.35,48.85", "1,1"]);
    }

    #[test]
    fn reject_unknown_geometry_type() {
        assert!(CliArgs::try_parse_from(["mapfield", "encode", "--type", "Circle", "0,0"]).is_err());
    }

    #[test]
    fn parse_positions() {
        assert_eq!(parse_position("2.35, 48.85").unwrap(), Coord::new(2.35, 48.85));
        assert!(matches!(
            parse_position("2.35"),
            Err(PositionError::Format(_))
        ));
        assert!(matches!(
            parse_position("a,b"),
            Err(PositionError::Format(_))
        ));
        assert!(matches!(
            parse_position("0,91"),
            Err(PositionError::Range(_))
        ));
    }

    #[test]
    fn encode_point() {
        let cfg = config();
        let field = FieldConfig {
            geometry_kind: GeometryKind::Point,
            decimals: 2,
        };
        let value = encode(&cfg, field, &positions(&["2.3522,48.8566"])).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&value).unwrap(),
            json!({ "type": "Point", "coordinates": [2.35, 48.86] })
        );
    }

    #[test]
    fn encode_line_string() {
        let cfg = config();
        let field = FieldConfig {
            geometry_kind: GeometryKind::LineString,
            decimals: 1,
        };
        let value = encode(&cfg, field, &positions(&["1,2", "3,4"])).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&value).unwrap(),
            json!({ "type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]] })
        );
    }

    #[test]
    fn encode_incomplete_polygon() {
        let field = FieldConfig {
            geometry_kind: GeometryKind::Polygon,
            decimals: 7,
        };
        assert!(encode(&config(), field, &positions(&["0,0", "1,1"])).is_err());
    }

    #[test]
    fn inspect_invalid_value() {
        assert!(inspect(&config(), "nope".to_string()).is_err());
    }

    #[tokio::test]
    async fn pick_second_place() {
        let search = SearchController::with_debounce(Places, TokioTimer, Duration::ZERO);
        search.input_changed("Paris").await;
        let place = pick_place(&search, 2).unwrap();
        assert_eq!(place.label, "Paris, Texas");
        let state = search.state();
        assert_eq!(state.selected(), Some(&place));
        assert_eq!(state.input_value(), "");
        assert!(pick_place(&search, 0).is_err());
    }
}
