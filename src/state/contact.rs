//! Contact form submission state machine.
//!
//! DESIGN
//! ======
//! `Idle → Validating → {rejected → Idle} | Submitting → {outcome → Idle}`.
//! Validation is synchronous and happens inside [`ContactFormState::begin`],
//! so the only observable phases are `Idle` and `Submitting`. Status copy is
//! resolved here from [`ContactMessages`] so rendering only maps a
//! [`StatusMessage`] onto the status element.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ContactMessages;
use crate::net::contact::SubmitOutcome;

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
    Ok(re) => Some(re),
    Err(e) => {
        log::error!("email pattern failed to compile: {e}");
        None
    }
});

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const MESSAGE_FIELD: &str = "message";

/// Trimmed values of the three validated fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self { name: name.trim().to_owned(), email: email.trim().to_owned(), message: message.trim().to_owned() }
    }

    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] when any field is blank, otherwise
    /// [`ValidationError::InvalidEmail`] when the email fails the address pattern.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ValidationError::EmptyField);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// One `@` with non-whitespace on both sides and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(email))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a required field is empty")]
    EmptyField,
    #[error("email address is malformed")]
    InvalidEmail,
}

/// Why a submit event did not start a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationError),
    #[error("a submission is already in flight")]
    InFlight,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusMessage {
    fn new(text: &str, tone: StatusTone) -> Self {
        Self { text: text.to_owned(), tone }
    }
}

/// Which label the submit button should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitLabel {
    Busy,
    /// Whatever markup the page rendered into the button.
    Original,
}

/// Label write needed when the busy flag moves from `prev` to `busy`.
///
/// `prev` is `None` on the first render. An idle button is left as the page
/// rendered it until it has been busy at least once.
pub fn submit_label_change(prev: Option<bool>, busy: bool) -> Option<SubmitLabel> {
    if prev.unwrap_or(false) == busy {
        return None;
    }
    Some(if busy { SubmitLabel::Busy } else { SubmitLabel::Original })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFormState {
    pub phase: FormPhase,
    pub status: Option<StatusMessage>,
    /// Bumped on every confirmed success; the form clears its fields on change.
    pub reset_seq: u64,
}

impl ContactFormState {
    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Validate `fields` and, if they pass, enter `Submitting`.
    ///
    /// # Errors
    ///
    /// [`SubmitRejected::InFlight`] leaves the state untouched.
    /// [`SubmitRejected::Invalid`] sets the matching error status and stays `Idle`.
    pub fn begin(&mut self, fields: &ContactFields, messages: &ContactMessages) -> Result<(), SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        if let Err(err) = fields.validate() {
            let text = match err {
                ValidationError::EmptyField => &messages.empty_field,
                ValidationError::InvalidEmail => &messages.invalid_email,
            };
            self.status = Some(StatusMessage::new(text, StatusTone::Error));
            return Err(err.into());
        }
        self.phase = FormPhase::Submitting;
        self.status = Some(StatusMessage::new(&messages.connecting, StatusTone::Neutral));
        Ok(())
    }

    /// Apply the request outcome and return to `Idle`.
    pub fn finish(&mut self, outcome: &SubmitOutcome, messages: &ContactMessages) {
        self.status = Some(match outcome {
            SubmitOutcome::Success => {
                self.reset_seq += 1;
                StatusMessage::new(&messages.success, StatusTone::Success)
            }
            SubmitOutcome::ServerRejected { .. } => StatusMessage::new(&messages.rejected, StatusTone::Error),
            SubmitOutcome::TransportFailure(_) => StatusMessage::new(&messages.network, StatusTone::Error),
        });
        self.phase = FormPhase::Idle;
    }

    /// Drop an aborted submission without reporting an outcome.
    pub fn abandon(&mut self) {
        self.status = None;
        self.phase = FormPhase::Idle;
    }
}
