//! Element handles the controller is initialized with.
//!
//! The controller never queries the document itself. [`PageHandles::query`]
//! is the one place selectors from [`UiConfig`] meet the live DOM; a host
//! page with unusual markup can build the handles by hand instead.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement};

use super::{DomError, query_all};
use crate::config::UiConfig;

pub struct NavHandles {
    pub controls: Vec<HtmlElement>,
    pub sections: Vec<HtmlElement>,
}

pub struct FilterHandles {
    pub controls: Vec<HtmlElement>,
    pub cards: Vec<HtmlElement>,
}

pub struct ContactHandles {
    pub form: HtmlFormElement,
    pub status: HtmlElement,
    pub submit: HtmlButtonElement,
}

/// Handles for each behavior. `None` means the page lacks that region.
#[derive(Default)]
pub struct PageHandles {
    pub nav: Option<NavHandles>,
    pub filter: Option<FilterHandles>,
    pub contact: Option<ContactHandles>,
}

impl PageHandles {
    /// Look up every region using the selectors in `config`.
    ///
    /// # Errors
    ///
    /// Fails when a selector is invalid, or when the contact form exists but
    /// its status element or submit button does not.
    pub fn query(document: &Document, config: &UiConfig) -> Result<Self, DomError> {
        let nav_controls = query_all(document, &config.nav.control_selector)?;
        let sections = query_all(document, &config.nav.section_selector)?;
        let nav = if nav_controls.is_empty() && sections.is_empty() {
            log::warn!("no navigation found for {}", config.nav.control_selector);
            None
        } else {
            Some(NavHandles { controls: nav_controls, sections })
        };

        let filter_controls = query_all(document, &config.filter.control_selector)?;
        let cards = query_all(document, &config.filter.card_selector)?;
        let filter = if filter_controls.is_empty() {
            log::debug!("no project filter found for {}", config.filter.control_selector);
            None
        } else {
            Some(FilterHandles { controls: filter_controls, cards })
        };

        let contact = query_contact(document, config)?;
        Ok(Self { nav, filter, contact })
    }
}

fn query_contact(document: &Document, config: &UiConfig) -> Result<Option<ContactHandles>, DomError> {
    let selectors = &config.contact;
    let Some(form) = document.query_selector(&selectors.form_selector).map_err(DomError::js)? else {
        log::debug!("no contact form found for {}", selectors.form_selector);
        return Ok(None);
    };
    let form = form
        .dyn_into::<HtmlFormElement>()
        .map_err(|_| DomError::MissingElement(format!("{} is not a <form>", selectors.form_selector)))?;

    let status = document
        .query_selector(&selectors.status_selector)
        .map_err(DomError::js)?
        .and_then(cast::<HtmlElement>)
        .ok_or_else(|| DomError::MissingElement(selectors.status_selector.clone()))?;

    let submit = form
        .query_selector(&selectors.submit_selector)
        .map_err(DomError::js)?
        .and_then(cast::<HtmlButtonElement>)
        .ok_or_else(|| DomError::MissingElement(selectors.submit_selector.clone()))?;

    Ok(Some(ContactHandles { form, status, submit }))
}

fn cast<T: JsCast>(el: Element) -> Option<T> {
    match el.dyn_into::<T>() {
        Ok(t) => Some(t),
        Err(_) => None,
    }
}
