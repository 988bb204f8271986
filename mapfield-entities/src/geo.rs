/// A geographic position in degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

impl MapPoint {
    pub const fn from_lat_lng_deg(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg(lat: f64, lng: f64) -> Option<Self> {
        let pos = Self::from_lat_lng_deg(lat, lng);
        pos.is_valid().then_some(pos)
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lng(&self) -> f64 {
        self.lng
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A planar coordinate pair.
///
/// Whether `x`/`y` are degrees or meters depends on the
/// [`Projection`](crate::projection::Projection) the value belongs to.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    min: Coord,
    max: Coord,
}

impl Extent {
    pub const fn from_coord(c: Coord) -> Self {
        Self { min: c, max: c }
    }

    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut coords = coords.into_iter();
        let mut extent = Self::from_coord(coords.next()?);
        for c in coords {
            extent.extend(c);
        }
        Some(extent)
    }

    pub fn extend(&mut self, c: Coord) {
        self.min.x = self.min.x.min(c.x);
        self.min.y = self.min.y.min(c.y);
        self.max.x = self.max.x.max(c.x);
        self.max.y = self.max.y.max(c.y);
    }

    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.extend(other.min);
        self.extend(other.max);
        self
    }

    pub const fn min(&self) -> Coord {
        self.min
    }

    pub const fn max(&self) -> Coord {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn contains(&self, c: Coord) -> bool {
        (self.min.x..=self.max.x).contains(&c.x) && (self.min.y..=self.max.y).contains(&c.y)
    }

    pub fn contains_extent(&self, other: &Self) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_map_point() {
        assert!(MapPoint::try_from_lat_lng_deg(48.85, 2.35).is_some());
        assert!(MapPoint::try_from_lat_lng_deg(90.1, 0.0).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(0.0, -180.5).is_none());
        assert!(MapPoint::try_from_lat_lng_deg(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn extent_of_coords() {
        let extent = Extent::from_coords([
            Coord::new(1.0, 5.0),
            Coord::new(-3.0, 2.0),
            Coord::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(extent.min(), Coord::new(-3.0, -1.0));
        assert_eq!(extent.max(), Coord::new(4.0, 5.0));
        assert_eq!(extent.width(), 7.0);
        assert_eq!(extent.height(), 6.0);
        assert_eq!(extent.center(), Coord::new(0.5, 2.0));
        assert!(extent.contains(Coord::new(0.0, 0.0)));
        assert!(!extent.contains(Coord::new(0.0, 5.1)));
    }

    #[test]
    fn no_extent_without_coords() {
        assert!(Extent::from_coords(std::iter::empty()).is_none());
    }

    #[test]
    fn union_of_extents() {
        let a = Extent::from_coord(Coord::new(0.0, 0.0));
        let b = Extent::from_coord(Coord::new(2.0, -2.0));
        let u = a.union(&b);
        assert!(u.contains_extent(&a));
        assert!(u.contains_extent(&b));
    }
}
