//! Client-side state models for the three page behaviors.
//!
//! DESIGN
//! ======
//! Each behavior gets its own small model (`navigation`, `filter`,
//! `contact`). Rendering reads these models and never the other way round,
//! so the models are testable without a browser.

pub mod contact;
pub mod filter;
pub mod navigation;
