use std::cell::RefCell;
use std::sync::Once;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{Aborted, abortable};
use leptos::prelude::*;

use super::*;
use crate::state::contact::{FormPhase, StatusTone, ValidationError};

/// Records every submission and answers with a canned outcome.
struct RecordingTransport {
    calls: RefCell<Vec<ContactSubmission>>,
    reply: SubmitOutcome,
}

impl RecordingTransport {
    fn replying(reply: SubmitOutcome) -> Self {
        Self { calls: RefCell::new(Vec::new()), reply }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ContactTransport for RecordingTransport {
    fn post<'a>(&'a self, submission: &'a ContactSubmission) -> LocalBoxFuture<'a, SubmitOutcome> {
        self.calls.borrow_mut().push(submission.clone());
        let reply = self.reply.clone();
        Box::pin(async move { reply })
    }
}

/// Holds the response until the test releases it.
struct GatedTransport {
    rx: RefCell<Option<oneshot::Receiver<SubmitOutcome>>>,
}

impl ContactTransport for GatedTransport {
    fn post<'a>(&'a self, _submission: &'a ContactSubmission) -> LocalBoxFuture<'a, SubmitOutcome> {
        let rx = self.rx.borrow_mut().take();
        Box::pin(async move {
            match rx {
                Some(rx) => rx.await.unwrap_or(SubmitOutcome::TransportFailure("gate dropped".to_owned())),
                None => SubmitOutcome::TransportFailure("gate already used".to_owned()),
            }
        })
    }
}

/// Collects log records per thread, so parallel tests see only their own.
struct CaptureLog;

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl log::Log for CaptureLog {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        RECORDS.with(|records| records.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLog = CaptureLog;
static INSTALL_CAPTURE: Once = Once::new();

/// Run `f` and return what it logged on this thread.
fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(log::Level, String)>) {
    INSTALL_CAPTURE.call_once(|| {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
    let out = f();
    (out, RECORDS.with(RefCell::take))
}

fn logged_at(records: &[(log::Level, String)], level: log::Level, needle: &str) -> bool {
    records.iter().any(|(l, text)| *l == level && text.contains(needle))
}

const ENDPOINT: &str = "https://forms.example.com/f/abc123";

fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
    let mut s = ContactSubmission::new(ENDPOINT);
    s.push_entry("name".to_owned(), Some(name.to_owned()));
    s.push_entry("email".to_owned(), Some(email.to_owned()));
    s.push_entry("subject".to_owned(), Some("Hello".to_owned()));
    s.push_entry("message".to_owned(), Some(message.to_owned()));
    s
}

fn run(
    transport: &dyn ContactTransport,
    name: &str,
    email: &str,
    message: &str,
) -> (RwSignal<ContactFormState>, Result<SubmitOutcome, SubmitRejected>) {
    let form = RwSignal::new(ContactFormState::default());
    let fields = ContactFields::new(name, email, message);
    let result = block_on(submit_contact(
        form,
        transport,
        &fields,
        &submission(name, email, message),
        &ContactMessages::default(),
    ));
    (form, result)
}

// =============================================================
// SubmitOutcome
// =============================================================

#[test]
fn from_status_treats_2xx_as_success() {
    assert_eq!(SubmitOutcome::from_status(200), SubmitOutcome::Success);
    assert_eq!(SubmitOutcome::from_status(204), SubmitOutcome::Success);
    assert_eq!(SubmitOutcome::from_status(299), SubmitOutcome::Success);
}

#[test]
fn from_status_treats_everything_else_as_rejection() {
    for status in [0, 199, 300, 302, 400, 422, 500] {
        assert_eq!(SubmitOutcome::from_status(status), SubmitOutcome::ServerRejected { status });
    }
}

#[test]
fn diagnostic_carries_transport_detail() {
    let outcome = SubmitOutcome::TransportFailure("TypeError: Failed to fetch".to_owned());
    assert_eq!(outcome.diagnostic().as_deref(), Some("contact submission failed: TypeError: Failed to fetch"));
}

#[test]
fn diagnostic_formats_rejected_status() {
    let outcome = SubmitOutcome::ServerRejected { status: 422 };
    assert_eq!(outcome.diagnostic().as_deref(), Some("contact endpoint rejected submission: 422"));
    assert_eq!(SubmitOutcome::Success.diagnostic(), None);
}

#[test]
fn submission_field_lookup() {
    let s = submission("Ada", "ada@example.com", "Hi");
    assert_eq!(s.field("subject"), Some("Hello"));
    assert_eq!(s.field("phone"), None);
}

#[test]
fn non_text_entries_are_kept_as_attachments() {
    let mut s = submission("Ada", "ada@example.com", "Hi");
    s.push_entry("cv".to_owned(), None);

    assert_eq!(s.attachments, vec!["cv".to_owned()]);
    assert_eq!(s.field("cv"), None);
    assert_eq!(s.fields.len(), 4);
}

#[test]
fn attachments_reach_the_transport() {
    let transport = RecordingTransport::replying(SubmitOutcome::Success);
    let form = RwSignal::new(ContactFormState::default());
    let fields = ContactFields::new("Ada", "ada@example.com", "Hi");
    let mut payload = submission("Ada", "ada@example.com", "Hi");
    payload.push_entry("cv".to_owned(), None);

    let result = block_on(submit_contact(form, &transport, &fields, &payload, &ContactMessages::default()));

    assert_eq!(result, Ok(SubmitOutcome::Success));
    assert_eq!(transport.calls.borrow()[0].attachments, vec!["cv".to_owned()]);
}

// =============================================================
// submit_contact: validation never reaches the network
// =============================================================

#[test]
fn blank_fields_issue_no_request() {
    let messages = ContactMessages::default();
    for (name, email, message) in [("", "ada@example.com", "Hi"), ("Ada", "  ", "Hi"), ("Ada", "ada@example.com", "\n")] {
        let transport = RecordingTransport::replying(SubmitOutcome::Success);
        let (form, result) = run(&transport, name, email, message);

        assert_eq!(result, Err(SubmitRejected::Invalid(ValidationError::EmptyField)));
        assert_eq!(transport.call_count(), 0);
        let state = form.get_untracked();
        assert_eq!(state.phase, FormPhase::Idle);
        let status = state.status.unwrap();
        assert_eq!(status.text, messages.empty_field);
        assert_eq!(status.tone, StatusTone::Error);
    }
}

#[test]
fn malformed_email_issues_no_request() {
    let transport = RecordingTransport::replying(SubmitOutcome::Success);
    let (form, result) = run(&transport, "Ada", "not-an-email", "Hi");

    assert_eq!(result, Err(SubmitRejected::Invalid(ValidationError::InvalidEmail)));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(form.get_untracked().status.unwrap().text, ContactMessages::default().invalid_email);
}

// =============================================================
// submit_contact: outcomes
// =============================================================

#[test]
fn valid_submission_posts_once_with_every_field() {
    let transport = RecordingTransport::replying(SubmitOutcome::Success);
    let (_form, result) = run(&transport, "Ada", "ada@example.com", "Hello there");

    assert_eq!(result, Ok(SubmitOutcome::Success));
    let calls = transport.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].action, ENDPOINT);
    assert_eq!(calls[0].field("name"), Some("Ada"));
    assert_eq!(calls[0].field("email"), Some("ada@example.com"));
    assert_eq!(calls[0].field("message"), Some("Hello there"));
    assert_eq!(calls[0].field("subject"), Some("Hello"));
}

#[test]
fn success_reports_and_requests_field_reset() {
    let transport = RecordingTransport::replying(SubmitOutcome::Success);
    let (form, _) = run(&transport, "Ada", "ada@example.com", "Hi");

    let state = form.get_untracked();
    assert_eq!(state.phase, FormPhase::Idle);
    assert_eq!(state.reset_seq, 1);
    let status = state.status.unwrap();
    assert_eq!(status.text, ContactMessages::default().success);
    assert_eq!(status.tone, StatusTone::Success);
}

#[test]
fn rejection_keeps_fields_and_reports_failure() {
    let transport = RecordingTransport::replying(SubmitOutcome::ServerRejected { status: 500 });
    let (form, result) = run(&transport, "Ada", "ada@example.com", "Hi");

    assert_eq!(result, Ok(SubmitOutcome::ServerRejected { status: 500 }));
    let state = form.get_untracked();
    assert_eq!(state.phase, FormPhase::Idle);
    assert_eq!(state.reset_seq, 0);
    assert_eq!(state.status.unwrap().text, ContactMessages::default().rejected);
}

#[test]
fn rejection_is_logged_as_warning_with_status() {
    let transport = RecordingTransport::replying(SubmitOutcome::ServerRejected { status: 418 });
    let (_, records) = with_captured_logs(|| run(&transport, "Ada", "ada@example.com", "Hi"));

    assert!(logged_at(&records, log::Level::Warn, "contact endpoint rejected submission: 418"), "{records:?}");
    assert!(!records.iter().any(|(level, _)| *level == log::Level::Error));
}

#[test]
fn transport_failure_keeps_fields_and_logs_detail() {
    let transport = RecordingTransport::replying(SubmitOutcome::TransportFailure("offline".to_owned()));
    let ((form, result), records) = with_captured_logs(|| run(&transport, "Ada", "ada@example.com", "Hi"));

    let outcome = result.unwrap();
    assert_eq!(outcome.diagnostic().as_deref(), Some("contact submission failed: offline"));
    assert!(logged_at(&records, log::Level::Error, "contact submission failed: offline"), "{records:?}");
    let state = form.get_untracked();
    assert_eq!(state.phase, FormPhase::Idle);
    assert_eq!(state.reset_seq, 0);
    let status = state.status.unwrap();
    assert_eq!(status.text, ContactMessages::default().network);
    assert!(!status.text.contains("offline"));
}

// =============================================================
// submit_contact: mutual exclusion
// =============================================================

#[test]
fn second_submit_while_pending_is_rejected() {
    let (tx, rx) = oneshot::channel();
    let gated = GatedTransport { rx: RefCell::new(Some(rx)) };
    let recording = RecordingTransport::replying(SubmitOutcome::Success);
    let form = RwSignal::new(ContactFormState::default());
    let fields = ContactFields::new("Ada", "ada@example.com", "Hi");
    let payload = submission("Ada", "ada@example.com", "Hi");
    let messages = ContactMessages::default();

    let mut first = Box::pin(submit_contact(form, &gated, &fields, &payload, &messages));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(form.get_untracked().is_submitting());
    assert_eq!(form.get_untracked().status.unwrap().tone, StatusTone::Neutral);

    let second = block_on(submit_contact(form, &recording, &fields, &payload, &messages));
    assert_eq!(second, Err(SubmitRejected::InFlight));
    assert_eq!(recording.call_count(), 0);

    tx.send(SubmitOutcome::Success).unwrap();
    assert_eq!(block_on(first), Ok(SubmitOutcome::Success));
    assert!(!form.get_untracked().is_submitting());
}

// =============================================================
// PendingDelivery: cancellation
// =============================================================

#[test]
fn cancel_drops_the_transport_request_and_leaves_state_for_abandon() {
    let (tx, rx) = oneshot::channel();
    let gated = GatedTransport { rx: RefCell::new(Some(rx)) };
    let form = RwSignal::new(ContactFormState::default());
    let fields = ContactFields::new("Ada", "ada@example.com", "Hi");
    let payload = submission("Ada", "ada@example.com", "Hi");
    let messages = ContactMessages::default();

    begin_submission(form, &fields, &messages).unwrap();
    let (task, handle) = abortable(deliver(form, &gated, &payload, &messages));
    let mut task = Box::pin(task);
    assert!(task.as_mut().now_or_never().is_none());

    PendingDelivery::new(handle).cancel();

    assert_eq!(block_on(task), Err(Aborted));
    assert!(tx.send(SubmitOutcome::Success).is_err(), "transport future still alive");
    assert!(form.get_untracked().is_submitting());
    form.update(ContactFormState::abandon);
    assert!(!form.get_untracked().is_submitting());
    assert_eq!(form.get_untracked().status, None);
}
