//! # mapfield-widget
//!
//! Browser rendition of the map field: a Leaflet map to draw the geometry
//! of a form field and a place search to navigate to.

use std::cell::RefCell;

use leptos::*;

use mapfield_core::{control::OnChange, entities::field::FieldConfig, widget::FieldWidget};

pub mod components;
pub mod gateways;
pub mod leaflet;

use self::components::MapControl;

/// Renders the map control of a field into the current reactive scope.
#[derive(Debug, Default, Clone)]
pub struct LeafletFieldWidget {
    /// Overrides the public Nominatim endpoint.
    pub geocoding_url: Option<String>,
}

impl FieldWidget for LeafletFieldWidget {
    type Output = View;

    fn render(&self, field: &FieldConfig, value: Option<String>, on_change: OnChange) -> View {
        let on_change = RefCell::new(on_change);
        let on_change = Callback::new(move |value: String| (on_change.borrow_mut())(value));
        let geocoding_url = self.geocoding_url.clone();
        view! { <MapControl field=*field value on_change geocoding_url /> }.into_view()
    }
}
