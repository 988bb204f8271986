//! The map control: draws geometries into the host field.

use std::{cell::RefCell, fmt, rc::Rc};

use thiserror::Error;

use crate::{
    codec::{CodecError, CodecFactory, DefaultCodecFactory, GeometryCodec, WriteOptions},
    entities::{
        field::{FieldConfig, FieldError},
        geometry::{Feature, Geometry, GeometryKind},
        search::SearchOption,
    },
    map::{DrawableLayer, FitOptions, MapFactory, MapView},
};

/// Receives the serialized geometry after each completed drawing.
pub type OnChange = Box<dyn FnMut(String)>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("Unable to decode the field value: {0}")]
    Codec(#[from] CodecError),
    #[error("Only a point field can take a place ({0} field)")]
    NotAPointField(GeometryKind),
}

pub struct ControlProps {
    pub field: FieldConfig,
    pub value: Option<String>,
    pub on_change: OnChange,
}

impl fmt::Debug for ControlProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlProps")
            .field("field", &self.field)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Creates map controls with the given codec and map engine.
#[derive(Debug, Clone)]
pub struct MapControl<MF, CF = DefaultCodecFactory> {
    map_factory: MF,
    codec_factory: CF,
    fit: FitOptions,
}

impl<MF> MapControl<MF>
where
    MF: MapFactory,
{
    pub const fn new(map_factory: MF) -> Self {
        Self {
            map_factory,
            codec_factory: DefaultCodecFactory,
            fit: FitOptions {
                max_zoom: crate::map::DEFAULT_MAX_ZOOM,
                padding: crate::map::DEFAULT_PADDING,
            },
        }
    }
}

impl<MF, CF> MapControl<MF, CF>
where
    MF: MapFactory,
    CF: CodecFactory,
{
    pub fn with_codec<F>(self, codec_factory: F) -> MapControl<MF, F>
    where
        F: CodecFactory,
    {
        let Self {
            map_factory, fit, ..
        } = self;
        MapControl {
            map_factory,
            codec_factory,
            fit,
        }
    }

    #[must_use]
    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    pub fn mount(
        &self,
        target: MF::Target,
        props: ControlProps,
    ) -> Result<MountedControl<CF::Codec, MF::Layer, MF::View>, Error>
    where
        CF::Codec: 'static,
        MF::Layer: 'static,
    {
        let ControlProps {
            field,
            value,
            on_change,
        } = props;
        let codec = self.codec_factory.codec(&field);
        let features = match value.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => vec![codec.read_feature(value)?],
            _ => vec![],
        };
        let extent = features.first().and_then(Feature::extent);
        let layer = self.map_factory.create_layer(features);
        let mut view = self.map_factory.create_map(target, &layer);
        if let Some(extent) = extent {
            view.fit(&extent, &self.fit);
        }
        let session = Rc::new(DrawSession {
            codec,
            write_options: WriteOptions::from(&field),
            layer: RefCell::new(layer),
            on_change: RefCell::new(on_change),
        });
        let on_draw_end = {
            let session = Rc::clone(&session);
            Rc::new(move |feature: Feature| session.draw_end(feature))
        };
        view.add_draw_interaction(field.geometry_kind, on_draw_end);
        log::debug!("Mounted map control for a {} field", field.geometry_kind);
        Ok(MountedControl {
            field,
            fit: self.fit,
            session,
            view,
        })
    }
}

struct DrawSession<C, L> {
    codec: C,
    write_options: WriteOptions,
    layer: RefCell<L>,
    on_change: RefCell<OnChange>,
}

impl<C, L> DrawSession<C, L>
where
    C: GeometryCodec,
    L: DrawableLayer,
{
    fn draw_end(&self, feature: Feature) {
        log::debug!("Completed drawing a {}", feature.geometry.kind());
        let value = self
            .codec
            .write_geometry(&feature.geometry, &self.write_options);
        {
            let mut layer = self.layer.borrow_mut();
            layer.clear();
            layer.add_feature(feature);
        }
        match value {
            Ok(value) => (self.on_change.borrow_mut())(value),
            Err(err) => log::error!("Unable to encode the drawn geometry: {err}"),
        }
    }
}

/// A control that has been rendered into its target.
pub struct MountedControl<C, L, V> {
    field: FieldConfig,
    fit: FitOptions,
    session: Rc<DrawSession<C, L>>,
    view: V,
}

impl<C, L, V> fmt::Debug for MountedControl<C, L, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedControl")
            .field("field", &self.field)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl<C, L, V> MountedControl<C, L, V>
where
    C: GeometryCodec,
    L: DrawableLayer,
    V: MapView,
{
    pub const fn field(&self) -> &FieldConfig {
        &self.field
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn features(&self) -> Vec<Feature> {
        self.session.layer.borrow().features()
    }

    /// Handles a completed drawing gesture.
    ///
    /// The layer keeps the drawn feature only and the host is notified
    /// with its encoding.
    pub fn draw_end(&self, feature: Feature) {
        self.session.draw_end(feature);
    }

    /// Whether a search result can be put on the map.
    pub fn can_add_to_map(&self) -> bool {
        self.field.geometry_kind == GeometryKind::Point
    }

    /// Places the selected search result as the point of this field
    /// and centers the view on it.
    pub fn add_to_map(&mut self, option: &SearchOption) -> Result<(), Error> {
        if !self.can_add_to_map() {
            return Err(Error::NotAPointField(self.field.geometry_kind));
        }
        let center = self.session.codec.project(option.lon_lat());
        log::debug!("Add '{}' to the map", option.label);
        self.session.draw_end(Feature::new(Geometry::Point(center)));
        self.view.center_on(center, self.fit.max_zoom);
        Ok(())
    }
}
