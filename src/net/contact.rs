//! Contact form delivery: transport seam, typed outcome, and the submit driver.
//!
//! Client-side (hydrate): multipart POST via `gloo-net` to the form's `action`.
//! Natively only the trait and driver exist, so the full submit sequence can
//! be exercised against a recording transport.
//!
//! ERROR HANDLING
//! ==============
//! Transport errors never surface to the user verbatim. The driver maps them
//! to the generic network status and writes the detail to the `log` channel.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use futures::future::{AbortHandle, LocalBoxFuture};
use leptos::prelude::*;

use crate::config::ContactMessages;
use crate::state::contact::{ContactFields, ContactFormState, SubmitRejected};

/// Result of one delivered request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Endpoint answered with a 2xx status.
    Success,
    /// Endpoint answered with any other status.
    ServerRejected { status: u16 },
    /// The request never produced a response (offline, DNS, CORS, ...).
    TransportFailure(String),
}

impl SubmitOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) { Self::Success } else { Self::ServerRejected { status } }
    }

    /// Line recorded on the diagnostic channel, if this outcome warrants one.
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Success => None,
            Self::ServerRejected { status } => Some(format!("contact endpoint rejected submission: {status}")),
            Self::TransportFailure(detail) => Some(format!("contact submission failed: {detail}")),
        }
    }
}

/// Everything needed to issue the POST: target URL plus every form entry, untrimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub action: String,
    /// Text entries in form order. Validation reads these.
    pub fields: Vec<(String, String)>,
    /// Names of entries whose value is not text, e.g. file inputs.
    pub attachments: Vec<String>,
    /// The form's own entry list. Posted as is when present, so file parts survive.
    #[cfg(feature = "hydrate")]
    pub form_data: Option<web_sys::FormData>,
    /// Aborts the fetch itself when the submission is cancelled.
    #[cfg(feature = "hydrate")]
    pub abort_signal: Option<web_sys::AbortSignal>,
}

impl ContactSubmission {
    pub fn new(action: impl Into<String>) -> Self {
        Self { action: action.into(), ..Self::default() }
    }

    /// Record one form entry; `None` marks a non-text value.
    pub fn push_entry(&mut self, name: String, text: Option<String>) {
        match text {
            Some(value) => self.fields.push((name, value)),
            None => self.attachments.push(name),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// A delivery that has been spawned and not yet settled.
///
/// Dropping the task alone leaves a browser fetch running, so in the browser
/// the request's `AbortController` travels with it.
#[derive(Debug)]
pub struct PendingDelivery {
    task: AbortHandle,
    #[cfg(feature = "hydrate")]
    fetch: Option<web_sys::AbortController>,
}

impl PendingDelivery {
    pub fn new(task: AbortHandle) -> Self {
        Self {
            task,
            #[cfg(feature = "hydrate")]
            fetch: None,
        }
    }

    #[cfg(feature = "hydrate")]
    pub fn with_fetch(task: AbortHandle, fetch: Option<web_sys::AbortController>) -> Self {
        Self { task, fetch }
    }

    /// Stop the request on the wire, then the task awaiting it.
    pub fn cancel(self) {
        #[cfg(feature = "hydrate")]
        if let Some(fetch) = &self.fetch {
            fetch.abort();
        }
        self.task.abort();
    }
}

/// Sends one submission and reports how it went. Never retries.
pub trait ContactTransport {
    fn post<'a>(&'a self, submission: &'a ContactSubmission) -> LocalBoxFuture<'a, SubmitOutcome>;
}

/// Run one submit event end to end: validate, post, apply the outcome.
///
/// State changes happen in a fixed order: `begin` (disable + connecting
/// status), the single await on `transport`, then `finish` (outcome status,
/// re-enable). Rejected events never reach the transport.
///
/// # Errors
///
/// Returns [`SubmitRejected`] when validation fails or a submission is
/// already in flight.
pub async fn submit_contact<T: ContactTransport + ?Sized>(
    form: RwSignal<ContactFormState>,
    transport: &T,
    fields: &ContactFields,
    submission: &ContactSubmission,
    messages: &ContactMessages,
) -> Result<SubmitOutcome, SubmitRejected> {
    begin_submission(form, fields, messages)?;
    Ok(deliver(form, transport, submission, messages).await)
}

/// Synchronous half of a submit: validate and enter `Submitting`.
///
/// # Errors
///
/// See [`ContactFormState::begin`].
pub fn begin_submission(
    form: RwSignal<ContactFormState>,
    fields: &ContactFields,
    messages: &ContactMessages,
) -> Result<(), SubmitRejected> {
    // A disposed signal means the controller is gone; treat it like a busy form.
    form.try_update(|state| state.begin(fields, messages))
        .unwrap_or(Err(SubmitRejected::InFlight))
}

/// Asynchronous half of a submit: post once and apply the outcome.
pub async fn deliver<T: ContactTransport + ?Sized>(
    form: RwSignal<ContactFormState>,
    transport: &T,
    submission: &ContactSubmission,
    messages: &ContactMessages,
) -> SubmitOutcome {
    log::debug!("posting contact form to {}", submission.action);
    let outcome = transport.post(submission).await;
    match &outcome {
        SubmitOutcome::Success => log::info!("contact form delivered"),
        SubmitOutcome::ServerRejected { .. } => {
            if let Some(line) = outcome.diagnostic() {
                log::warn!("{line}");
            }
        }
        SubmitOutcome::TransportFailure(_) => {
            if let Some(line) = outcome.diagnostic() {
                log::error!("{line}");
            }
        }
    }

    form.update(|state| state.finish(&outcome, messages));
    outcome
}

/// Multipart POST to the submission's `action` URL.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FormPostTransport;

#[cfg(feature = "hydrate")]
impl ContactTransport for FormPostTransport {
    fn post<'a>(&'a self, submission: &'a ContactSubmission) -> LocalBoxFuture<'a, SubmitOutcome> {
        Box::pin(async move {
            match send_multipart(submission).await {
                Ok(status) => SubmitOutcome::from_status(status),
                Err(detail) => SubmitOutcome::TransportFailure(detail),
            }
        })
    }
}

#[cfg(feature = "hydrate")]
async fn send_multipart(submission: &ContactSubmission) -> Result<u16, String> {
    use crate::dom::js_error_text;

    let body = match &submission.form_data {
        Some(data) => data.clone(),
        None => {
            let body = web_sys::FormData::new().map_err(|e| js_error_text(&e))?;
            for (name, value) in &submission.fields {
                body.append_with_str(name, value).map_err(|e| js_error_text(&e))?;
            }
            body
        }
    };
    // Form relays answer with a redirect page unless JSON is requested.
    let resp = gloo_net::http::Request::post(&submission.action)
        .header("Accept", "application/json")
        .abort_signal(submission.abort_signal.as_ref())
        .body(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    Ok(resp.status())
}
