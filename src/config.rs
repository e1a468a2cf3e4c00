//! Page-level configuration: selectors, attribute names, and user-facing copy.
//!
//! Every field has a default matching the stock portfolio markup. A page can
//! override any subset by embedding a JSON object in
//! `<script type="application/json" id="portfolio-ui-config">`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

/// Element id of the optional inline JSON config block.
pub const CONFIG_SCRIPT_ID: &str = "portfolio-ui-config";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config block was present but not valid JSON for [`UiConfig`].
    #[error("config parse failed: {0}")]
    Parse(String),

    /// `log_level` did not name a `log` level.
    #[error("unknown log level: {0}")]
    LogLevel(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub nav: NavConfig,
    pub filter: FilterConfig,
    pub contact: ContactConfig,
    /// Class marking the active member of a nav or filter group.
    pub active_class: String,
    pub log_level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            filter: FilterConfig::default(),
            contact: ContactConfig::default(),
            active_class: "active".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl UiConfig {
    /// Parse a (possibly partial) JSON override. Blank input yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid config object.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve `log_level` into a `log` level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LogLevel`] for names `log` does not recognize.
    pub fn level(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub control_selector: String,
    pub section_selector: String,
    /// Data attribute on a nav control naming the section id it shows.
    pub target_attr: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            control_selector: ".nav-link".to_owned(),
            section_selector: ".section".to_owned(),
            target_attr: "data-target".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub control_selector: String,
    pub card_selector: String,
    pub category_attr: String,
    /// Reserved category that shows every card.
    pub all_category: String,
    /// Inline `display` value for a shown card.
    pub shown_display: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            control_selector: ".filter-btn".to_owned(),
            card_selector: ".project-card".to_owned(),
            category_attr: "data-category".to_owned(),
            all_category: "all".to_owned(),
            shown_display: "block".to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_selector: String,
    pub status_selector: String,
    pub submit_selector: String,
    pub busy_label: String,
    pub success_color: String,
    pub error_color: String,
    /// Color for the neutral "connecting" status. Empty resets to the stylesheet.
    pub neutral_color: String,
    pub messages: ContactMessages,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_selector: "#contact-form".to_owned(),
            status_selector: "#form-status".to_owned(),
            submit_selector: "button[type=\"submit\"]".to_owned(),
            busy_label: "Sending...".to_owned(),
            success_color: "#10b981".to_owned(),
            error_color: "#ef4444".to_owned(),
            neutral_color: String::new(),
            messages: ContactMessages::default(),
        }
    }
}

/// User-facing status copy for every contact form outcome.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactMessages {
    pub empty_field: String,
    pub invalid_email: String,
    pub connecting: String,
    pub success: String,
    pub rejected: String,
    pub network: String,
}

impl Default for ContactMessages {
    fn default() -> Self {
        Self {
            empty_field: "Please fill in all fields.".to_owned(),
            invalid_email: "Please enter a valid email address.".to_owned(),
            connecting: "Sending your message...".to_owned(),
            success: "Thank you! Your message has been sent.".to_owned(),
            rejected: "Oops! Something went wrong. Please try again.".to_owned(),
            network: "Network error. Please check your connection and try again.".to_owned(),
        }
    }
}
