//! The page's UI controller: owns the reactive scope and every listener.
//!
//! ARCHITECTURE
//! ============
//! [`UiController::init`] takes element handles and a transport instead of
//! reaching into globals, binds the three behaviors under one reactive
//! [`Owner`], and keeps the resulting listeners alive for as long as the
//! controller lives. The behaviors share nothing but the owner.

use std::rc::Rc;

use leptos::prelude::*;
use web_sys::Event;

use crate::config::UiConfig;
use crate::dom::contact_form::PendingSubmission;
use crate::dom::handles::PageHandles;
use crate::dom::{DomError, Listener, contact_form, filter, listen, navigation};
use crate::net::contact::ContactTransport;

pub struct UiController {
    owner: Owner,
    listeners: Vec<Listener>,
    pending: PendingSubmission,
}

impl UiController {
    /// Bind every region present in `handles`.
    ///
    /// # Errors
    ///
    /// Fails if the browser refuses an event listener registration.
    pub fn init(handles: PageHandles, config: &UiConfig, transport: Rc<dyn ContactTransport>) -> Result<Self, DomError> {
        let owner = Owner::new();
        let pending = PendingSubmission::default();

        let listeners = owner.with(|| -> Result<Vec<Listener>, DomError> {
            let mut listeners = Vec::new();
            if let Some(nav) = handles.nav {
                listeners.extend(navigation::bind(nav, config)?);
            }
            if let Some(projects) = handles.filter {
                listeners.extend(filter::bind(projects, config)?);
            }
            if let Some(contact) = handles.contact {
                listeners.extend(contact_form::bind(contact, config, transport, Rc::clone(&pending))?);
            }
            Ok(listeners)
        })?;
        log::debug!("ui controller bound {} listeners", listeners.len());

        Ok(Self { owner, listeners, pending })
    }

    /// Abort the in-flight contact submission, if any, fetch included.
    ///
    /// Returns whether there was one to abort.
    pub fn cancel_pending_submission(&self) -> bool {
        let taken = self.pending.borrow_mut().take();
        match taken {
            Some(delivery) => {
                delivery.cancel();
                true
            }
            None => false,
        }
    }

    /// Abort any in-flight submission when the page is being unloaded.
    ///
    /// # Errors
    ///
    /// Fails if the listener cannot be registered on `window`.
    pub fn cancel_on_pagehide(&mut self, window: &web_sys::Window) -> Result<(), DomError> {
        let pending = Rc::clone(&self.pending);
        let listener = listen(window, "pagehide", move |_: Event| {
            let taken = pending.borrow_mut().take();
            if let Some(delivery) = taken {
                log::debug!("page hidden with a submission in flight");
                delivery.cancel();
            }
        })?;
        self.listeners.push(listener);
        Ok(())
    }

    /// Keep the controller alive for the rest of the page session.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for UiController {
    fn drop(&mut self) {
        self.cancel_pending_submission();
        self.owner.cleanup();
    }
}
