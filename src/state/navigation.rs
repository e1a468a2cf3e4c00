//! Section navigation model.
//!
//! DESIGN
//! ======
//! The active section is an explicit value rather than whatever element
//! happens to carry the active class. Section visibility and nav highlight
//! are both derived from that one value, so they cannot disagree.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    /// Section identifiers in document order.
    pub sections: Vec<String>,
    /// Last requested target. May name no section at all.
    pub active: Option<String>,
}

impl NavState {
    pub fn new(sections: Vec<String>) -> Self {
        Self { sections, active: None }
    }

    /// Select `initial` if it names a section, else the first section.
    pub fn with_initial(sections: Vec<String>, initial: Option<&str>) -> Self {
        let active = initial
            .filter(|id| sections.iter().any(|s| s == id))
            .map(str::to_owned)
            .or_else(|| sections.first().cloned());
        Self { sections, active }
    }

    /// Make `target` the active section.
    ///
    /// An unknown target is stored as-is; every section then renders hidden.
    pub fn activate(&mut self, target: &str) {
        self.active = Some(target.to_owned());
    }

    pub fn section_visible(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Whether a nav control pointing at `target` is highlighted.
    pub fn control_active(&self, target: &str) -> bool {
        self.section_visible(target)
    }

    /// Active id, if it names a known section.
    pub fn visible_section(&self) -> Option<&str> {
        self.active.as_deref().filter(|id| self.sections.iter().any(|s| s == id))
    }
}
