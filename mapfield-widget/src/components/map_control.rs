use leptos::*;

use mapfield_core::{
    codec::GeoJsonCodec,
    control::{self, ControlProps, MountedControl},
    entities::{
        field::FieldConfig,
        location::{ActionType, Location},
        search::SearchOption,
    },
    search::{SearchController, SearchState},
};

use super::LocationButton;
use crate::{
    gateways::{GlooTimer, Nominatim},
    leaflet::{LeafletLayer, LeafletMap, LeafletMapFactory},
};

type Control = MountedControl<GeoJsonCodec, LeafletLayer, LeafletMap>;

type OptionRow = (usize, SearchOption);

// Places may share an id, so rows are keyed by position as well.
fn option_rows(options: &[SearchOption]) -> Vec<OptionRow> {
    options.iter().cloned().enumerate().collect()
}

fn option_row_key((index, option): &OptionRow) -> (usize, u64) {
    (*index, option.value)
}

#[component]
pub fn MapControl(
    field: FieldConfig,
    #[prop(default = None)] value: Option<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(default = None)] geocoding_url: Option<String>,
) -> impl IntoView {
    let map_ref = create_node_ref::<html::Div>();
    let control = store_value(None::<Control>);
    let (error, set_error) = create_signal(None::<String>);

    // -- search -- //

    let gateway = geocoding_url
        .map(|url| Nominatim::new(url, None))
        .unwrap_or_default();
    let search = SearchController::new(gateway, GlooTimer);
    let (state, set_state) = create_signal(SearchState::default());
    search.on_update(move |s| set_state.set(s.clone()));
    let search = store_value(search);

    let on_input = move |ev| {
        let text = event_target_value(&ev);
        let task = search.with_value(|s| s.input_changed(&text));
        spawn_local(task);
    };

    // -- map -- //

    map_ref.on_load(move |el| {
        let target: web_sys::HtmlElement = (*el).clone().into();
        // Leaflet needs a container with a layout.
        request_animation_frame(move || {
            let props = ControlProps {
                field,
                value,
                on_change: Box::new(move |value| on_change.call(value)),
            };
            match control::MapControl::new(LeafletMapFactory).mount(target, props) {
                Ok(mounted) => control.set_value(Some(mounted)),
                Err(err) => {
                    log::error!("Unable to mount map control: {err}");
                    set_error.set(Some(err.to_string()));
                }
            }
        });
    });

    let add_to_map = move |option: &SearchOption| {
        control.update_value(|c| {
            let Some(c) = c else {
                log::warn!("The map control is not mounted");
                return;
            };
            if let Err(err) = c.add_to_map(option) {
                log::error!("Unable to add '{}' to the map: {err}", option.label);
            }
        });
    };

    let can_add_to_map =
        move || control.with_value(|c| c.as_ref().is_some_and(|c| c.can_add_to_map()));

    view! {
      <div class="map-field">
        <div class="map-field__map" node_ref=map_ref></div>
        { move || error.get().map(|err| view! { <p class="map-field__error">{ err }</p> }) }
        <div class="map-field__search">
          <input
            type="search"
            placeholder="Search for a place"
            prop:value=move || state.with(|s| s.input_value().to_string())
            on:input=on_input
          />
          { move || state.with(SearchState::is_loading).then(|| view! {
              <p class="map-field__loading">"Loading..."</p>
            })
          }
          <ul class="map-field__options">
            <For
              each=move || state.with(|s| option_rows(s.options()))
              key=option_row_key
              children=move |(_, option)| view! {
                <li on:click={
                  let option = option.clone();
                  move |_| search.with_value(|s| s.select(Some(option.clone())))
                }>
                  { option.label.clone() }
                </li>
              }
            />
          </ul>
          { move || state.with(|s| s.selected().cloned()).map(|selected| {
              let location = Location::from(&selected);
              view! {
                <div class="map-field__selection">
                  <LocationButton
                    action=ActionType::Remove
                    location=Some(location)
                    on_click=move |()| search.with_value(SearchController::clear_selection)
                  />
                  { can_add_to_map().then(|| view! {
                      <LocationButton
                        action=ActionType::Add
                        location=None
                        on_click=move |()| add_to_map(&selected)
                      />
                    })
                  }
                </div>
              }
            })
          }
        </div>
      </div>
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn option(label: &str, value: u64) -> SearchOption {
        SearchOption {
            label: label.into(),
            value,
            lon: 0.0,
            lat: 0.0,
        }
    }

    #[test]
    fn rows_with_duplicate_place_ids_have_unique_keys() {
        let options = [option("Paris", 7), option("Paris", 7), option("Lyon", 8)];
        let rows = option_rows(&options);
        let keys: HashSet<_> = rows.iter().map(option_row_key).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(rows[1].1, options[1]);
    }
}
