use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

use crate::geo::{Coord, Extent};

/// The kind of geometry an editor is allowed to draw.
///
/// The string representation matches the GeoJSON `type` member.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum GeometryKind {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
}

impl Geometry {
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
            Self::MultiLineString(_) => GeometryKind::MultiLineString,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// All coordinates in document order.
    pub fn coords(&self) -> Vec<Coord> {
        match self {
            Self::Point(c) => vec![*c],
            Self::LineString(cs) | Self::MultiPoint(cs) => cs.clone(),
            Self::Polygon(rings) | Self::MultiLineString(rings) => rings.concat(),
            Self::MultiPolygon(polygons) => polygons.iter().flat_map(|p| p.concat()).collect(),
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::from_coords(self.coords())
    }

    /// Returns a copy with `f` applied to every coordinate.
    #[must_use]
    pub fn map_coords<F>(&self, f: F) -> Self
    where
        F: Fn(Coord) -> Coord,
    {
        let line = |cs: &Vec<Coord>| cs.iter().copied().map(&f).collect::<Vec<_>>();
        let rings = |rs: &Vec<Vec<Coord>>| rs.iter().map(|r| line(r)).collect::<Vec<_>>();
        match self {
            Self::Point(c) => Self::Point(f(*c)),
            Self::LineString(cs) => Self::LineString(line(cs)),
            Self::MultiPoint(cs) => Self::MultiPoint(line(cs)),
            Self::Polygon(rs) => Self::Polygon(rings(rs)),
            Self::MultiLineString(rs) => Self::MultiLineString(rings(rs)),
            Self::MultiPolygon(ps) => Self::MultiPolygon(ps.iter().map(|p| rings(p)).collect()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("A {kind} needs at least {min} position(s), got {actual}")]
    TooFewPositions {
        kind: GeometryKind,
        min: usize,
        actual: usize,
    },
    #[error("A point needs exactly one position, got {0}")]
    Point(usize),
}

impl Geometry {
    /// Builds a single-part geometry of `kind` through the sketched `vertices`.
    ///
    /// Rings are closed if the last vertex differs from the first one.
    pub fn from_vertices(
        kind: GeometryKind,
        vertices: Vec<Coord>,
    ) -> Result<Self, GeometryError> {
        match kind {
            GeometryKind::Point => match vertices.as_slice() {
                [c] => Ok(Self::Point(*c)),
                _ => Err(GeometryError::Point(vertices.len())),
            },
            GeometryKind::MultiPoint => at_least(kind, 1, vertices).map(Self::MultiPoint),
            GeometryKind::LineString => at_least(kind, 2, vertices).map(Self::LineString),
            GeometryKind::MultiLineString => {
                at_least(kind, 2, vertices).map(|line| Self::MultiLineString(vec![line]))
            }
            GeometryKind::Polygon => ring(kind, vertices).map(|ring| Self::Polygon(vec![ring])),
            GeometryKind::MultiPolygon => {
                ring(kind, vertices).map(|ring| Self::MultiPolygon(vec![vec![ring]]))
            }
        }
    }
}

fn at_least(
    kind: GeometryKind,
    min: usize,
    vertices: Vec<Coord>,
) -> Result<Vec<Coord>, GeometryError> {
    if vertices.len() < min {
        return Err(GeometryError::TooFewPositions {
            kind,
            min,
            actual: vertices.len(),
        });
    }
    Ok(vertices)
}

fn ring(kind: GeometryKind, vertices: Vec<Coord>) -> Result<Vec<Coord>, GeometryError> {
    let mut ring = at_least(kind, 3, vertices)?;
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }
    Ok(ring)
}

/// A drawable feature on the editable layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
}

impl Feature {
    pub const fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    pub fn extent(&self) -> Option<Extent> {
        self.geometry.extent()
    }
}

impl From<Geometry> for Feature {
    fn from(geometry: Geometry) -> Self {
        Self::new(geometry)
    }
}
