//! A map engine without any rendering.
//!
//! It keeps track of the view and the layer content exactly like a rendered
//! map would, so the control can be driven without a browser.

use std::{cell::RefCell, fmt, rc::Rc};

use thiserror::Error;

use crate::{
    entities::{
        geo::{Coord, Extent},
        geometry::{Feature, Geometry, GeometryKind},
        projection::HALF_SIZE,
    },
    map::{
        DrawEndHandler, DrawableLayer, FitOptions, MapFactory, MapView, DEFAULT_CENTER,
        DEFAULT_ZOOM,
    },
};

pub const TILE_SIZE: f64 = 256.0;

/// Resolution (meters per pixel) at zoom level 0.
pub const MAX_RESOLUTION: f64 = 2.0 * HALF_SIZE / TILE_SIZE;

pub fn zoom_to_resolution(zoom: f64) -> f64 {
    MAX_RESOLUTION / zoom.exp2()
}

pub fn resolution_to_zoom(resolution: f64) -> f64 {
    (MAX_RESOLUTION / resolution).log2()
}

/// Size of the map container in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub center: Coord,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessLayer {
    features: Rc<RefCell<Vec<Feature>>>,
}

impl HeadlessLayer {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features: Rc::new(RefCell::new(features)),
        }
    }

    pub fn len(&self) -> usize {
        self.features.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.borrow().is_empty()
    }
}

impl DrawableLayer for HeadlessLayer {
    fn features(&self) -> Vec<Feature> {
        self.features.borrow().clone()
    }

    fn add_feature(&mut self, feature: Feature) {
        self.features.borrow_mut().push(feature);
    }

    fn clear(&mut self) {
        self.features.borrow_mut().clear();
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("No draw interaction has been added")]
    NoInteraction,
    #[error("Expected a {expected} but got a {actual}")]
    KindMismatch {
        expected: GeometryKind,
        actual: GeometryKind,
    },
}

pub struct HeadlessMap {
    viewport: Viewport,
    view: ViewState,
    layer: HeadlessLayer,
    draw: Option<(GeometryKind, DrawEndHandler)>,
}

impl fmt::Debug for HeadlessMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessMap")
            .field("viewport", &self.viewport)
            .field("view", &self.view)
            .field("layer", &self.layer)
            .field("draw", &self.draw_kind())
            .finish()
    }
}

impl HeadlessMap {
    pub fn new(viewport: Viewport, layer: HeadlessLayer) -> Self {
        Self {
            viewport,
            view: ViewState::default(),
            layer,
            draw: None,
        }
    }

    pub const fn view(&self) -> ViewState {
        self.view
    }

    pub const fn layer(&self) -> &HeadlessLayer {
        &self.layer
    }

    pub fn draw_kind(&self) -> Option<GeometryKind> {
        self.draw.as_ref().map(|(kind, _)| *kind)
    }

    pub fn resolution(&self) -> f64 {
        zoom_to_resolution(self.view.zoom)
    }

    /// The extent currently visible in the viewport.
    pub fn visible_extent(&self) -> Extent {
        let res = self.resolution();
        let Viewport { width, height } = self.viewport;
        let ViewState { center, .. } = self.view;
        let mut extent = Extent::from_coord(Coord::new(
            center.x - width / 2.0 * res,
            center.y - height / 2.0 * res,
        ));
        extent.extend(Coord::new(
            center.x + width / 2.0 * res,
            center.y + height / 2.0 * res,
        ));
        extent
    }

    /// Completes a drawing gesture as if the editor had drawn `geometry`.
    pub fn finish_drawing(&self, geometry: Geometry) -> Result<(), DrawError> {
        let Some((expected, on_draw_end)) = &self.draw else {
            return Err(DrawError::NoInteraction);
        };
        let actual = geometry.kind();
        if actual != *expected {
            return Err(DrawError::KindMismatch {
                expected: *expected,
                actual,
            });
        }
        on_draw_end(Feature::new(geometry));
        Ok(())
    }
}

impl MapView for HeadlessMap {
    fn fit(&mut self, extent: &Extent, options: &FitOptions) {
        let [top, right, bottom, left] = options.padding;
        let width = (self.viewport.width - left - right).max(1.0);
        let height = (self.viewport.height - top - bottom).max(1.0);
        let resolution = (extent.width() / width)
            .max(extent.height() / height)
            .max(zoom_to_resolution(options.max_zoom));
        let zoom = resolution_to_zoom(resolution);
        let mut center = extent.center();
        // Shift the center so that the extent is centered in the padded area.
        center.x += (right - left) / 2.0 * resolution;
        center.y += (top - bottom) / 2.0 * resolution;
        log::debug!("Fit view: center = {center:?}, zoom = {zoom}");
        self.view = ViewState { center, zoom };
    }

    fn center_on(&mut self, center: Coord, zoom: f64) {
        self.view = ViewState { center, zoom };
    }

    fn add_draw_interaction(&mut self, kind: GeometryKind, on_draw_end: DrawEndHandler) {
        if self.draw.is_some() {
            log::warn!("Replacing the existing draw interaction");
        }
        self.draw = Some((kind, on_draw_end));
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessMapFactory;

impl MapFactory for HeadlessMapFactory {
    type Target = Viewport;
    type Layer = HeadlessLayer;
    type View = HeadlessMap;

    fn create_layer(&self, features: Vec<Feature>) -> HeadlessLayer {
        HeadlessLayer::new(features)
    }

    fn create_map(&self, target: Viewport, layer: &HeadlessLayer) -> HeadlessMap {
        HeadlessMap::new(target, layer.clone())
    }
}
