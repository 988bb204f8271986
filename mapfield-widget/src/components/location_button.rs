use leptos::*;

use mapfield_core::{
    button,
    entities::location::{ActionType, Location},
};

#[component]
pub fn LocationButton(
    action: ActionType,
    location: Option<Location>,
    #[prop(into)] on_click: Callback<()>,
) -> impl IntoView {
    let button = button::LocationButton::new(action, location);
    let class = format!("location-button location-button--{}", button.style());
    let label = button.label().map(ToString::to_string);
    view! {
      <div class="location">
        <button type="button" class=class on:click=move |_| on_click.call(())>
          { button.text() }
        </button>
        { label.map(|label| view! { <span class="location-label">{ label }</span> }) }
      </div>
    }
}
