//! Section navigation binding.

use leptos::prelude::*;
use web_sys::{Event, HtmlElement};

use super::handles::NavHandles;
use super::{DomError, Listener, has_class, listen, scroll_to_top, set_class};
use crate::config::UiConfig;
use crate::state::navigation::NavState;

/// Render `nav` onto the sections and controls, and route control clicks into it.
///
/// Must run inside a reactive owner.
pub fn bind(handles: NavHandles, config: &UiConfig) -> Result<Vec<Listener>, DomError> {
    let NavHandles { controls, sections } = handles;
    let active_class = config.active_class.clone();

    let targets: Vec<String> = controls
        .iter()
        .map(|control| {
            control.get_attribute(&config.nav.target_attr).unwrap_or_else(|| {
                log::warn!("nav control without {}: {}", config.nav.target_attr, control.inner_text());
                String::new()
            })
        })
        .collect();
    let initial = controls
        .iter()
        .zip(&targets)
        .find(|(control, _)| has_class(control, &active_class))
        .map(|(_, target)| target.as_str());
    let ids = sections.iter().map(|section| section.id()).collect();
    let nav = RwSignal::new(NavState::with_initial(ids, initial));

    let rendered: Vec<(HtmlElement, String)> = controls.iter().cloned().zip(targets.iter().cloned()).collect();
    Effect::new(move || {
        let state = nav.get();
        for section in &sections {
            set_class(section, &active_class, state.section_visible(&section.id()));
        }
        for (control, target) in &rendered {
            set_class(control, &active_class, state.control_active(target));
        }
    });

    let mut listeners = Vec::with_capacity(controls.len());
    for (control, target) in controls.iter().zip(targets) {
        let listener = listen(control, "click", move |ev: Event| {
            ev.prevent_default();
            log::debug!("show section {target}");
            nav.update(|state| state.activate(&target));
            scroll_to_top();
        })?;
        listeners.push(listener);
    }
    Ok(listeners)
}
