//! Leaflet as map engine of the control.
//!
//! Features are kept in the feature projection (EPSG:3857) and converted
//! to `LatLng` when they are rendered.

use std::{cell::RefCell, fmt, rc::Rc};

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use mapfield_core::{
    entities::{
        geo::{Coord, Extent},
        geometry::{Feature, Geometry, GeometryKind},
        projection,
    },
    map::{
        DrawEndHandler, DrawableLayer, FitOptions, MapFactory, MapView, DEFAULT_CENTER,
        DEFAULT_ZOOM,
    },
};

mod ffi;

const TILE_LAYER_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const MAP_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

fn lat_lng(c: Coord) -> ffi::LatLng {
    let Coord { x: lng, y: lat } = projection::to_lon_lat(c);
    ffi::lat_lng(lat, lng)
}

fn lat_lngs(cs: &[Coord]) -> Array {
    cs.iter().copied().map(lat_lng).collect()
}

fn rings(rs: &[Vec<Coord>]) -> Array {
    rs.iter().map(|r| lat_lngs(r)).collect()
}

fn layers_of(geometry: &Geometry) -> Vec<ffi::Layer> {
    match geometry {
        Geometry::Point(c) => vec![ffi::marker(&lat_lng(*c))],
        Geometry::MultiPoint(cs) => cs.iter().map(|c| ffi::marker(&lat_lng(*c))).collect(),
        Geometry::LineString(cs) => vec![ffi::polyline(&lat_lngs(cs))],
        Geometry::MultiLineString(ls) => ls.iter().map(|l| ffi::polyline(&lat_lngs(l))).collect(),
        Geometry::Polygon(rs) => vec![ffi::polygon(&rings(rs))],
        Geometry::MultiPolygon(ps) => ps.iter().map(|p| ffi::polygon(&rings(p))).collect(),
    }
}

#[derive(Debug, Clone)]
pub struct LeafletLayer {
    group: ffi::LayerGroup,
    features: Rc<RefCell<Vec<Feature>>>,
}

impl LeafletLayer {
    fn new() -> Self {
        Self {
            group: ffi::layer_group(),
            features: Rc::default(),
        }
    }
}

impl DrawableLayer for LeafletLayer {
    fn features(&self) -> Vec<Feature> {
        self.features.borrow().clone()
    }

    fn add_feature(&mut self, feature: Feature) {
        for layer in layers_of(&feature.geometry) {
            self.group.add_layer(&layer);
        }
        self.features.borrow_mut().push(feature);
    }

    fn clear(&mut self) {
        self.group.clear_layers();
        self.features.borrow_mut().clear();
    }
}

type MouseHandler = Closure<dyn FnMut(ffi::MouseEvent)>;

/// Clicks add vertices, a double click completes the sketch.
struct DrawInteraction {
    kind: GeometryKind,
    on_click: MouseHandler,
    on_dbl_click: MouseHandler,
}

impl DrawInteraction {
    fn new(kind: GeometryKind, on_draw_end: DrawEndHandler) -> Self {
        let vertices = Rc::new(RefCell::new(Vec::<Coord>::new()));
        let on_click = {
            let vertices = Rc::clone(&vertices);
            let on_draw_end = Rc::clone(&on_draw_end);
            Closure::new(move |ev: ffi::MouseEvent| {
                let pos = ev.latlng();
                let c = projection::from_lon_lat(Coord::new(pos.lng(), pos.lat()));
                if kind == GeometryKind::Point {
                    on_draw_end(Feature::new(Geometry::Point(c)));
                } else {
                    vertices.borrow_mut().push(c);
                }
            })
        };
        let on_dbl_click = Closure::new(move |_: ffi::MouseEvent| {
            if kind == GeometryKind::Point {
                return;
            }
            let mut sketch = vertices.take();
            // A double click is also reported as two single clicks.
            sketch.dedup();
            match Geometry::from_vertices(kind, sketch) {
                Ok(geometry) => on_draw_end(Feature::new(geometry)),
                Err(err) => log::warn!("Discard sketch: {err}"),
            }
        });
        Self {
            kind,
            on_click,
            on_dbl_click,
        }
    }

    fn attach(&self, map: &ffi::Map) {
        map.on("click", &self.on_click);
        map.on("dblclick", &self.on_dbl_click);
    }

    fn detach(&self, map: &ffi::Map) {
        map.off("click", &self.on_click);
        map.off("dblclick", &self.on_dbl_click);
    }
}

pub struct LeafletMap {
    map: ffi::Map,
    draw: Option<DrawInteraction>,
}

impl fmt::Debug for LeafletMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafletMap")
            .field("map", &self.map)
            .field("draw", &self.draw.as_ref().map(|d| d.kind))
            .finish()
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        if let Some(draw) = self.draw.take() {
            draw.detach(&self.map);
        }
    }
}

fn set(target: &Object, key: &str, value: &JsValue) {
    if let Err(err) = Reflect::set(target, &JsValue::from_str(key), value) {
        log::warn!("Unable to set option '{key}': {err:?}");
    }
}

fn point(x: f64, y: f64) -> Array {
    Array::of2(&JsValue::from_f64(x), &JsValue::from_f64(y))
}

impl MapView for LeafletMap {
    fn fit(&mut self, extent: &Extent, options: &FitOptions) {
        let [top, right, bottom, left] = options.padding;
        let bounds = ffi::lat_lng_bounds(&lat_lng(extent.min()), &lat_lng(extent.max()));
        let opts = Object::new();
        set(&opts, "paddingTopLeft", &point(left, top));
        set(&opts, "paddingBottomRight", &point(right, bottom));
        set(&opts, "maxZoom", &JsValue::from_f64(options.max_zoom));
        self.map.fit_bounds(&bounds, &opts);
    }

    fn center_on(&mut self, center: Coord, zoom: f64) {
        self.map.set_view(&lat_lng(center), zoom);
    }

    fn add_draw_interaction(&mut self, kind: GeometryKind, on_draw_end: DrawEndHandler) {
        if let Some(draw) = self.draw.take() {
            log::warn!("Replacing the existing draw interaction");
            draw.detach(&self.map);
        }
        self.map.double_click_zoom().disable();
        let draw = DrawInteraction::new(kind, on_draw_end);
        draw.attach(&self.map);
        self.draw = Some(draw);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LeafletMapFactory;

impl MapFactory for LeafletMapFactory {
    type Target = HtmlElement;
    type Layer = LeafletLayer;
    type View = LeafletMap;

    fn create_layer(&self, features: Vec<Feature>) -> LeafletLayer {
        let mut layer = LeafletLayer::new();
        for feature in features {
            layer.add_feature(feature);
        }
        layer
    }

    fn create_map(&self, target: HtmlElement, layer: &LeafletLayer) -> LeafletMap {
        let map = ffi::map(&target);
        map.set_view(&lat_lng(DEFAULT_CENTER), DEFAULT_ZOOM);
        let tile_opts = Object::new();
        set(&tile_opts, "attribution", &JsValue::from_str(MAP_ATTRIBUTION));
        ffi::tile_layer(TILE_LAYER_URL, &tile_opts).add_to(&map);
        layer.group.add_to(&map);
        LeafletMap { map, draw: None }
    }
}
