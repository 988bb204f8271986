use std::collections::HashMap;

use leptos::*;
use wasm_bindgen::JsCast;

use mapfield_core::{
    entities::field::{FieldConfig, DECIMALS_KEY, TYPE_KEY},
    widget::FieldWidget,
};
use mapfield_widget::LeafletFieldWidget;

const VALUE_INPUT_ID: &str = "value";

fn main() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("Start map field");
    let app_container: web_sys::HtmlElement = document()
        .get_element_by_id("app")
        .expect("app container element")
        .dyn_into()
        .expect("HtmlElement");

    let options: HashMap<String, String> = [TYPE_KEY, DECIMALS_KEY]
        .into_iter()
        .filter_map(|key| {
            let value = app_container.get_attribute(&format!("data-{key}"))?;
            Some((key.to_string(), value))
        })
        .collect();
    let field = FieldConfig::from_field(&options).unwrap_or_else(|err| {
        log::warn!("Invalid field options: {err}");
        FieldConfig::default()
    });
    let value = app_container.get_attribute("data-value");

    let on_change = Box::new(|value: String| {
        log::debug!("Field value changed: {value}");
        let input = document()
            .get_element_by_id(VALUE_INPUT_ID)
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok());
        match input {
            Some(input) => input.set_value(&value),
            None => log::warn!("No input element '{VALUE_INPUT_ID}' found"),
        }
    });
    let widget = LeafletFieldWidget::default();
    mount_to(app_container, move || widget.render(&field, value, on_change));
}
