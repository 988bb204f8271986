//! Capabilities of the map engine the control renders into.

use std::rc::Rc;

use crate::entities::{
    geo::{Coord, Extent},
    geometry::{Feature, GeometryKind},
};

pub const DEFAULT_MAX_ZOOM: f64 = 16.0;
pub const DEFAULT_PADDING: Padding = [80.0, 80.0, 80.0, 80.0];

/// Initial view of a freshly created map.
pub const DEFAULT_CENTER: Coord = Coord::new(0.0, 0.0);
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Padding in pixels: top, right, bottom, left.
pub type Padding = [f64; 4];

/// Invoked by the map engine whenever a drawing gesture is completed.
///
/// The engine must not add the drawn feature to the layer itself,
/// the handler decides what ends up on the layer.
pub type DrawEndHandler = Rc<dyn Fn(Feature)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub max_zoom: f64,
    pub padding: Padding,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_ZOOM,
            padding: DEFAULT_PADDING,
        }
    }
}

/// An editable vector layer.
pub trait DrawableLayer {
    fn features(&self) -> Vec<Feature>;
    fn add_feature(&mut self, feature: Feature);
    fn clear(&mut self);

    fn extent(&self) -> Option<Extent> {
        self.features()
            .iter()
            .filter_map(Feature::extent)
            .reduce(|a, b| a.union(&b))
    }
}

/// A rendered map with a view that can be moved around.
pub trait MapView {
    /// Fits the view to `extent`, see [`FitOptions`].
    fn fit(&mut self, extent: &Extent, options: &FitOptions);

    fn center_on(&mut self, center: Coord, zoom: f64);

    /// Lets the editor draw geometries of `kind`.
    fn add_draw_interaction(&mut self, kind: GeometryKind, on_draw_end: DrawEndHandler);
}

/// Creates the map engine objects of a control.
pub trait MapFactory {
    /// The container the map is rendered into.
    type Target;
    type Layer: DrawableLayer;
    type View: MapView;

    fn create_layer(&self, features: Vec<Feature>) -> Self::Layer;

    /// Creates a map with a base tile layer and `layer` on top of it.
    fn create_map(&self, target: Self::Target, layer: &Self::Layer) -> Self::View;
}
