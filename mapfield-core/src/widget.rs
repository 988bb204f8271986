use crate::{
    codec::CodecFactory,
    control::{ControlProps, Error, MapControl, MountedControl, OnChange},
    entities::field::FieldConfig,
    map::MapFactory,
};

/// A widget that edits the value of a host form field.
pub trait FieldWidget {
    type Output;

    fn render(&self, field: &FieldConfig, value: Option<String>, on_change: OnChange)
        -> Self::Output;
}

/// Renders into a default target of the map engine.
impl<MF, CF> FieldWidget for MapControl<MF, CF>
where
    MF: MapFactory,
    MF::Target: Default,
    MF::Layer: 'static,
    CF: CodecFactory,
    CF::Codec: 'static,
{
    type Output = Result<MountedControl<CF::Codec, MF::Layer, MF::View>, Error>;

    fn render(
        &self,
        field: &FieldConfig,
        value: Option<String>,
        on_change: OnChange,
    ) -> Self::Output {
        let props = ControlProps {
            field: *field,
            value,
            on_change,
        };
        self.mount(MF::Target::default(), props)
    }
}
