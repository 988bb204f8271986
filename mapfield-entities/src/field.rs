use std::collections::HashMap;

use thiserror::Error;

use crate::geometry::GeometryKind;

pub const TYPE_KEY: &str = "type";
pub const DECIMALS_KEY: &str = "decimals";

pub const DEFAULT_DECIMALS: u8 = 7;

/// More decimals than an `f64` can carry are rejected.
pub const MAX_DECIMALS: u8 = 15;

/// Read access to the options of a host form field.
pub trait Field {
    fn get(&self, key: &str) -> Option<&str>;
}

impl Field for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl Field for [(&str, &str)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unsupported geometry type: {0}")]
    GeometryKind(String),
    #[error("Invalid number of decimals: {0}")]
    Decimals(String),
}

/// The recognized options of a map field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    pub geometry_kind: GeometryKind,
    pub decimals: u8,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            geometry_kind: GeometryKind::default(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl FieldConfig {
    /// Reads the field options, falling back to `defaults` for missing keys.
    pub fn from_field_or<F>(field: &F, defaults: Self) -> Result<Self, FieldError>
    where
        F: Field + ?Sized,
    {
        let geometry_kind = match field.get(TYPE_KEY) {
            Some(kind) => kind
                .trim()
                .parse()
                .map_err(|_| FieldError::GeometryKind(kind.to_string()))?,
            None => defaults.geometry_kind,
        };
        let decimals = match field.get(DECIMALS_KEY) {
            Some(decimals) => decimals
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|d| *d <= MAX_DECIMALS)
                .ok_or_else(|| FieldError::Decimals(decimals.to_string()))?,
            None => defaults.decimals,
        };
        Ok(Self {
            geometry_kind,
            decimals,
        })
    }

    pub fn from_field<F>(field: &F) -> Result<Self, FieldError>
    where
        F: Field + ?Sized,
    {
        Self::from_field_or(field, Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_empty_field() {
        let field = HashMap::<String, String>::new();
        let cfg = FieldConfig::from_field(&field).unwrap();
        assert_eq!(cfg.geometry_kind, GeometryKind::Point);
        assert_eq!(cfg.decimals, 7);
    }

    #[test]
    fn read_type_and_decimals() {
        let field: &[(&str, &str)] = &[("type", "Polygon"), ("decimals", "5")];
        let cfg = FieldConfig::from_field(field).unwrap();
        assert_eq!(cfg.geometry_kind, GeometryKind::Polygon);
        assert_eq!(cfg.decimals, 5);
    }

    #[test]
    fn custom_defaults() {
        let field: &[(&str, &str)] = &[("decimals", "3")];
        let defaults = FieldConfig {
            geometry_kind: GeometryKind::LineString,
            decimals: 9,
        };
        let cfg = FieldConfig::from_field_or(field, defaults).unwrap();
        assert_eq!(cfg.geometry_kind, GeometryKind::LineString);
        assert_eq!(cfg.decimals, 3);
    }

    #[test]
    fn reject_unknown_type() {
        let field: &[(&str, &str)] = &[("type", "Circle")];
        assert_eq!(
            FieldConfig::from_field(field).unwrap_err(),
            FieldError::GeometryKind("Circle".into())
        );
    }

    #[test]
    fn reject_invalid_decimals() {
        for invalid in ["-1", "seven", "16", "2.5"] {
            let field: &[(&str, &str)] = &[("decimals", invalid)];
            assert_eq!(
                FieldConfig::from_field(field).unwrap_err(),
                FieldError::Decimals(invalid.into())
            );
        }
    }
}
