//! Networking for the contact form.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page talks to exactly one external endpoint: the form relay named by
//! the contact form's `action`. Everything else is local.

pub mod contact;
