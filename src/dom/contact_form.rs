//! Contact form binding: reads the form, drives the submission, renders status.
//!
//! DESIGN
//! ======
//! The submit listener snapshots the form, enters `Submitting` synchronously
//! so a re-dispatched submit event sees the busy state, then spawns the
//! request. Status text and button state are rendered from
//! `ContactFormState` by two effects; the button label is only touched when
//! the busy flag flips. A third effect resets the form whenever `reset_seq`
//! moves.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::abortable;
use js_sys::Array;
use leptos::prelude::*;
use web_sys::{AbortController, Event, FormData, HtmlFormElement};

use super::handles::ContactHandles;
use super::{DomError, Listener, js_error_text, listen, set_style};
use crate::config::{ContactConfig, UiConfig};
use crate::net::contact::{ContactSubmission, ContactTransport, PendingDelivery, begin_submission, deliver};
use crate::state::contact::{
    ContactFields, ContactFormState, EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD, StatusTone, SubmitLabel, SubmitRejected,
    submit_label_change,
};

/// The request currently in flight, if any.
pub type PendingSubmission = Rc<RefCell<Option<PendingDelivery>>>;

/// Wire the form's submit event to the submission driver.
///
/// Must run inside a reactive owner.
pub fn bind(
    handles: ContactHandles,
    config: &UiConfig,
    transport: Rc<dyn ContactTransport>,
    pending: PendingSubmission,
) -> Result<Vec<Listener>, DomError> {
    let ContactHandles { form, status, submit } = handles;
    let contact = config.contact.clone();
    // Markup, not text: the button may hold an icon next to its label.
    let original_label = submit.inner_html();
    let form_state = RwSignal::new(ContactFormState::default());

    let render_config = contact.clone();
    Effect::new(move || {
        form_state.with(|state| match &state.status {
            Some(message) => {
                status.set_text_content(Some(message.text.as_str()));
                set_style(&status, "color", tone_color(&render_config, message.tone));
            }
            None => {
                status.set_text_content(None);
                set_style(&status, "color", "");
            }
        });
    });

    let busy_label = contact.busy_label.clone();
    Effect::new(move |prev: Option<bool>| {
        let busy = form_state.with(ContactFormState::is_submitting);
        submit.set_disabled(busy);
        match submit_label_change(prev, busy) {
            Some(SubmitLabel::Busy) => submit.set_text_content(Some(busy_label.as_str())),
            Some(SubmitLabel::Original) => submit.set_inner_html(&original_label),
            None => {}
        }
        busy
    });

    let reset_form = form.clone();
    Effect::new(move |prev: Option<u64>| {
        let seq = form_state.with(|state| state.reset_seq);
        if prev.is_some_and(|p| p != seq) {
            reset_form.reset();
        }
        seq
    });

    let listener_form = form.clone();
    let listener = listen(&form, "submit", move |ev: Event| {
        ev.prevent_default();
        let submission = match read_submission(&listener_form) {
            Ok(submission) => submission,
            Err(e) => {
                log::error!("could not read contact form: {e}");
                return;
            }
        };
        let fields = ContactFields::new(
            submission.field(NAME_FIELD).unwrap_or_default(),
            submission.field(EMAIL_FIELD).unwrap_or_default(),
            submission.field(MESSAGE_FIELD).unwrap_or_default(),
        );
        match begin_submission(form_state, &fields, &contact.messages) {
            Ok(()) => spawn_delivery(form_state, submission, Rc::clone(&transport), &contact, &pending),
            Err(SubmitRejected::Invalid(err)) => log::debug!("contact form not sent: {err}"),
            Err(SubmitRejected::InFlight) => log::debug!("contact form not sent: request already in flight"),
        }
    })?;
    Ok(vec![listener])
}

/// Post in the background; the delivery stays in `pending` until it settles.
fn spawn_delivery(
    form_state: RwSignal<ContactFormState>,
    mut submission: ContactSubmission,
    transport: Rc<dyn ContactTransport>,
    contact: &ContactConfig,
    pending: &PendingSubmission,
) {
    let fetch = match AbortController::new() {
        Ok(fetch) => Some(fetch),
        Err(e) => {
            log::warn!("contact request cannot be aborted: {}", js_error_text(&e));
            None
        }
    };
    submission.abort_signal = fetch.as_ref().map(AbortController::signal);

    let messages = contact.messages.clone();
    let (task, handle) =
        abortable(async move { deliver(form_state, transport.as_ref(), &submission, &messages).await });
    *pending.borrow_mut() = Some(PendingDelivery::with_fetch(handle, fetch));

    let pending = Rc::clone(pending);
    leptos::task::spawn_local(async move {
        if task.await.is_err() {
            log::info!("contact submission cancelled");
            form_state.update(ContactFormState::abandon);
        }
        *pending.borrow_mut() = None;
    });
}

/// Snapshot every entry of `form` with the form's resolved `action` URL.
///
/// The `FormData` itself becomes the request body; the text entries are
/// copied out for validation.
fn read_submission(form: &HtmlFormElement) -> Result<ContactSubmission, DomError> {
    let data = FormData::new_with_form(form).map_err(DomError::js)?;
    let mut submission = ContactSubmission::new(form.action());
    if let Some(entries) = js_sys::try_iter(&data).map_err(DomError::js)? {
        for entry in entries {
            let entry = Array::from(&entry.map_err(DomError::js)?);
            let Some(name) = entry.get(0).as_string() else {
                continue;
            };
            submission.push_entry(name, entry.get(1).as_string());
        }
    }
    if !submission.attachments.is_empty() {
        log::debug!("contact form carries attachments: {}", submission.attachments.join(", "));
    }
    submission.form_data = Some(data);
    Ok(submission)
}

fn tone_color(contact: &ContactConfig, tone: StatusTone) -> &str {
    match tone {
        StatusTone::Neutral => &contact.neutral_color,
        StatusTone::Success => &contact.success_color,
        StatusTone::Error => &contact.error_color,
    }
}
