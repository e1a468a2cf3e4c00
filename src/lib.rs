//! # portfolio-ui
//!
//! Leptos + WASM interactivity for a statically rendered portfolio page:
//! in-memory section navigation, project filtering, and an asynchronous
//! contact form.
//!
//! The markup is owned by the page. This crate attaches to it: `state` holds
//! the pure models, `net` the contact transport and submit driver, `dom`
//! (browser only) renders the models onto the page and routes events back,
//! and `controller` ties the three behaviors together.

pub mod config;
#[cfg(feature = "hydrate")]
pub mod controller;
#[cfg(feature = "hydrate")]
pub mod dom;
pub mod net;
pub mod state;

#[cfg(feature = "hydrate")]
use std::rc::Rc;

#[cfg(feature = "hydrate")]
use crate::config::{CONFIG_SCRIPT_ID, UiConfig};
#[cfg(feature = "hydrate")]
use crate::controller::UiController;
#[cfg(feature = "hydrate")]
use crate::dom::DomError;
#[cfg(feature = "hydrate")]
use crate::dom::handles::PageHandles;
#[cfg(feature = "hydrate")]
use crate::net::contact::FormPostTransport;

/// WASM entry point: call once the page's DOM is ready.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = any_spawner::Executor::init_wasm_bindgen() {
        leptos::leptos_dom::logging::console_warn(&format!("executor already initialized: {e:?}"));
    }

    match start() {
        Ok(controller) => controller.forget(),
        // The logger may not be installed yet, so report straight to the console.
        Err(e) => leptos::leptos_dom::logging::console_error(&format!("portfolio ui failed to start: {e}")),
    }
}

#[cfg(feature = "hydrate")]
fn start() -> Result<UiController, DomError> {
    let window = web_sys::window().ok_or(DomError::MissingWindow)?;
    let document = window.document().ok_or(DomError::MissingDocument)?;

    // Logging is configured by the page, so config problems are reported after init.
    let parsed = UiConfig::from_json(&dom::config_text(&document, CONFIG_SCRIPT_ID));
    let config = match &parsed {
        Ok(config) => config.clone(),
        Err(_) => UiConfig::default(),
    };
    let level = match config.level() {
        Ok(level) => level,
        Err(_) => log::Level::Info,
    };
    if let Err(e) = console_log::init_with_level(level) {
        leptos::leptos_dom::logging::console_warn(&format!("logger already installed: {e}"));
    }
    if let Err(e) = &parsed {
        log::warn!("using default ui config: {e}");
    }
    if let Err(e) = config.level() {
        log::warn!("{e}; logging at info");
    }

    let handles = PageHandles::query(&document, &config)?;
    let mut controller = UiController::init(handles, &config, Rc::new(FormPostTransport))?;
    controller.cancel_on_pagehide(&window)?;
    log::info!("portfolio ui ready");
    Ok(controller)
}
