//! Project filter binding.

use leptos::prelude::*;
use web_sys::{Event, HtmlElement};

use super::handles::FilterHandles;
use super::{DomError, Listener, has_class, listen, set_class, set_style};
use crate::config::UiConfig;
use crate::state::filter::{Category, FilterState};

/// Render the filter selection onto controls and cards, and route control clicks into it.
///
/// Must run inside a reactive owner.
pub fn bind(handles: FilterHandles, config: &UiConfig) -> Result<Vec<Listener>, DomError> {
    let FilterHandles { controls, cards } = handles;
    let active_class = config.active_class.clone();
    let shown_display = config.filter.shown_display.clone();
    let attr = &config.filter.category_attr;

    let controls: Vec<(HtmlElement, Category)> = controls
        .into_iter()
        .map(|control| {
            let raw = control.get_attribute(attr).unwrap_or_default();
            let category = Category::parse(&raw, &config.filter.all_category);
            (control, category)
        })
        .collect();
    let cards: Vec<(HtmlElement, String)> = cards
        .into_iter()
        .map(|card| {
            let category = card.get_attribute(attr).unwrap_or_default();
            (card, category)
        })
        .collect();

    let initial = controls
        .iter()
        .find(|(control, _)| has_class(control, &active_class))
        .map(|(_, category)| category.clone())
        .unwrap_or_default();
    let filter = RwSignal::new(FilterState { active: initial });

    let rendered = controls.clone();
    Effect::new(move || {
        let state = filter.get();
        for (control, category) in &rendered {
            set_class(control, &active_class, state.control_active(category));
        }
        for (card, category) in &cards {
            let display = if state.card_visible(category) { shown_display.as_str() } else { "none" };
            set_style(card, "display", display);
        }
    });

    let mut listeners = Vec::with_capacity(controls.len());
    for (control, category) in controls {
        let listener = listen(&control, "click", move |_: Event| {
            log::debug!("filter projects by {category:?}");
            filter.update(|state| state.select(category.clone()));
        })?;
        listeners.push(listener);
    }
    Ok(listeners)
}
