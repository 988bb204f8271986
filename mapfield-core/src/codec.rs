use geojson::{GeoJson, Value};
use thiserror::Error;

use crate::entities::{
    field::FieldConfig,
    geo::Coord,
    geometry::{Feature, Geometry},
    projection::Projection,
};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    GeoJson(#[from] geojson::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("The document does not contain a geometry")]
    MissingGeometry,
    #[error("Unsupported geometry: {0}")]
    Unsupported(&'static str),
    #[error("Invalid position with {0} dimension(s)")]
    Position(usize),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Round coordinates to this number of decimals.
    pub decimals: Option<u8>,
}

impl From<&FieldConfig> for WriteOptions {
    fn from(from: &FieldConfig) -> Self {
        Self {
            decimals: Some(from.decimals),
        }
    }
}

/// Translates between the serialized value of a field and drawable features.
pub trait GeometryCodec {
    fn read_feature(&self, value: &str) -> Result<Feature, CodecError>;

    fn write_geometry(
        &self,
        geometry: &Geometry,
        options: &WriteOptions,
    ) -> Result<String, CodecError>;

    /// Transforms a geographic `(lon, lat)` pair into the feature projection.
    fn project(&self, lon_lat: Coord) -> Coord;
}

/// Creates the codec of a field.
///
/// Any `Fn(&FieldConfig) -> impl GeometryCodec` can be used to override
/// the default.
pub trait CodecFactory {
    type Codec: GeometryCodec;
    fn codec(&self, field: &FieldConfig) -> Self::Codec;
}

impl<F, C> CodecFactory for F
where
    F: Fn(&FieldConfig) -> C,
    C: GeometryCodec,
{
    type Codec = C;
    fn codec(&self, field: &FieldConfig) -> C {
        self(field)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCodecFactory;

impl CodecFactory for DefaultCodecFactory {
    type Codec = GeoJsonCodec;
    fn codec(&self, _: &FieldConfig) -> GeoJsonCodec {
        GeoJsonCodec::default()
    }
}

/// GeoJSON with reprojection between the data and the feature projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoJsonCodec {
    pub data_projection: Projection,
    pub feature_projection: Projection,
}

impl Default for GeoJsonCodec {
    fn default() -> Self {
        Self {
            data_projection: Projection::Geographic,
            feature_projection: Projection::WebMercator,
        }
    }
}

impl GeometryCodec for GeoJsonCodec {
    fn read_feature(&self, value: &str) -> Result<Feature, CodecError> {
        let geometry = match value.parse::<GeoJson>()? {
            GeoJson::Geometry(geometry) => geometry,
            GeoJson::Feature(feature) => feature.geometry.ok_or(CodecError::MissingGeometry)?,
            GeoJson::FeatureCollection(_) => {
                return Err(CodecError::Unsupported("FeatureCollection"));
            }
        };
        let geometry = from_value(&geometry.value)?;
        let (from, to) = (self.data_projection, self.feature_projection);
        Ok(Feature::new(
            geometry.map_coords(|c| from.transform(to, c)),
        ))
    }

    fn write_geometry(
        &self,
        geometry: &Geometry,
        options: &WriteOptions,
    ) -> Result<String, CodecError> {
        let (from, to) = (self.feature_projection, self.data_projection);
        let factor = options.decimals.map(|d| 10_f64.powi(i32::from(d)));
        let geometry = geometry.map_coords(|c| {
            let c = from.transform(to, c);
            match factor {
                Some(f) => Coord::new(round(c.x, f), round(c.y, f)),
                None => c,
            }
        });
        let geometry = geojson::Geometry::new(to_value(&geometry));
        Ok(serde_json::to_string(&geometry)?)
    }

    fn project(&self, lon_lat: Coord) -> Coord {
        Projection::Geographic.transform(self.feature_projection, lon_lat)
    }
}

fn round(v: f64, factor: f64) -> f64 {
    (v * factor).round() / factor
}

fn coord(pos: &[f64]) -> Result<Coord, CodecError> {
    match pos {
        [x, y, ..] => Ok(Coord::new(*x, *y)),
        _ => Err(CodecError::Position(pos.len())),
    }
}

fn line(positions: &[Vec<f64>]) -> Result<Vec<Coord>, CodecError> {
    positions.iter().map(|p| coord(p)).collect()
}

fn rings(rings: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Coord>>, CodecError> {
    rings.iter().map(|r| line(r)).collect()
}

fn from_value(value: &Value) -> Result<Geometry, CodecError> {
    let geometry = match value {
        Value::Point(p) => Geometry::Point(coord(p)?),
        Value::MultiPoint(ps) => Geometry::MultiPoint(line(ps)?),
        Value::LineString(ps) => Geometry::LineString(line(ps)?),
        Value::MultiLineString(ls) => Geometry::MultiLineString(rings(ls)?),
        Value::Polygon(rs) => Geometry::Polygon(rings(rs)?),
        Value::MultiPolygon(ps) => Geometry::MultiPolygon(
            ps.iter()
                .map(|p| rings(p))
                .collect::<Result<_, _>>()?,
        ),
        Value::GeometryCollection(_) => {
            return Err(CodecError::Unsupported("GeometryCollection"));
        }
    };
    Ok(geometry)
}

fn position(c: &Coord) -> Vec<f64> {
    vec![c.x, c.y]
}

fn positions(cs: &[Coord]) -> Vec<Vec<f64>> {
    cs.iter().map(position).collect()
}

fn to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(c) => Value::Point(position(c)),
        Geometry::MultiPoint(cs) => Value::MultiPoint(positions(cs)),
        Geometry::LineString(cs) => Value::LineString(positions(cs)),
        Geometry::MultiLineString(ls) => {
            Value::MultiLineString(ls.iter().map(|l| positions(l)).collect())
        }
        Geometry::Polygon(rs) => Value::Polygon(rs.iter().map(|r| positions(r)).collect()),
        Geometry::MultiPolygon(ps) => Value::MultiPolygon(
            ps.iter()
                .map(|rs| rs.iter().map(|r| positions(r)).collect())
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value as Json};

    use super::*;
    use crate::entities::{geometry::GeometryKind, projection};

    fn written(codec: &GeoJsonCodec, geometry: &Geometry, decimals: Option<u8>) -> Json {
        let text = codec
            .write_geometry(geometry, &WriteOptions { decimals })
            .unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn write_point_rounded_to_decimals() {
        let codec = GeoJsonCodec::default();
        let point = Geometry::Point(Coord::new(100.0, 200.0));
        assert_eq!(
            written(&codec, &point, Some(5)),
            json!({ "type": "Point", "coordinates": [0.0009, 0.0018] })
        );
        assert_eq!(
            written(&codec, &point, Some(7)),
            json!({ "type": "Point", "coordinates": [0.0008983, 0.0017966] })
        );
    }

    #[test]
    fn write_without_rounding() {
        let codec = GeoJsonCodec::default();
        let point = Geometry::Point(projection::from_lon_lat(Coord::new(2.5, 0.0)));
        let json = written(&codec, &point, None);
        let x = json["coordinates"][0].as_f64().unwrap();
        assert!((x - 2.5).abs() < 1e-12);
    }

    #[test]
    fn read_geometry_into_feature_projection() {
        let codec = GeoJsonCodec::default();
        let feature = codec
            .read_feature(r#"{"type":"Point","coordinates":[2.35,48.85]}"#)
            .unwrap();
        let Geometry::Point(c) = feature.geometry else {
            panic!("expected a point");
        };
        assert!((c.x - 261_600.80).abs() < 0.01);
        assert!((c.y - 6_249_447.75).abs() < 0.01);
    }

    #[test]
    fn read_feature_document() {
        let codec = GeoJsonCodec::default();
        let value = r#"{
          "type": "Feature",
          "properties": {},
          "geometry": {
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]
          }
        }"#;
        let feature = codec.read_feature(value).unwrap();
        assert_eq!(feature.geometry.kind(), GeometryKind::LineString);
        assert_eq!(feature.geometry.coords().len(), 3);
    }

    #[test]
    fn read_and_write_polygon() {
        let codec = GeoJsonCodec::default();
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[10.0, 50.0], [11.0, 50.0], [11.0, 51.0], [10.0, 50.0]]]
        });
        let feature = codec.read_feature(&value.to_string()).unwrap();
        assert_eq!(written(&codec, &feature.geometry, Some(7)), value);
    }

    #[test]
    fn ignore_altitude() {
        let codec = GeoJsonCodec {
            data_projection: Projection::Geographic,
            feature_projection: Projection::Geographic,
        };
        let feature = codec
            .read_feature(r#"{"type":"Point","coordinates":[1.0,2.0,300.0]}"#)
            .unwrap();
        assert_eq!(feature.geometry, Geometry::Point(Coord::new(1.0, 2.0)));
    }

    #[test]
    fn reject_malformed_values() {
        let codec = GeoJsonCodec::default();
        assert!(matches!(
            codec.read_feature("not json"),
            Err(CodecError::GeoJson(_))
        ));
        assert!(matches!(
            codec.read_feature(r#"{"type":"Feature","properties":{},"geometry":null}"#),
            Err(CodecError::MissingGeometry)
        ));
        assert!(matches!(
            codec.read_feature(r#"{"type":"FeatureCollection","features":[]}"#),
            Err(CodecError::Unsupported("FeatureCollection"))
        ));
    }

    #[test]
    fn project_lon_lat() {
        let codec = GeoJsonCodec::default();
        let c = codec.project(Coord::new(0.0, 0.0));
        assert!(c.x.abs() < 1e-9 && c.y.abs() < 1e-9);
    }

    #[test]
    fn override_codec_with_closure() {
        let factory = |field: &FieldConfig| {
            assert_eq!(field.decimals, 3);
            GeoJsonCodec {
                data_projection: Projection::Geographic,
                feature_projection: Projection::Geographic,
            }
        };
        let field = FieldConfig {
            decimals: 3,
            ..Default::default()
        };
        let codec = factory.codec(&field);
        assert_eq!(codec.feature_projection, Projection::Geographic);
    }
}
