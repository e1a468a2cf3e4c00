//! Project card filter model.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

/// A filter selection: the reserved superset or one named category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Category {
    #[default]
    All,
    Named(String),
}

impl Category {
    /// Interpret a control's declared category, treating `all_token` as [`Category::All`].
    pub fn parse(raw: &str, all_token: &str) -> Self {
        if raw == all_token { Self::All } else { Self::Named(raw.to_owned()) }
    }

    /// Whether a card tagged `card_category` is shown under this selection.
    pub fn matches(&self, card_category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == card_category,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub active: Category,
}

impl FilterState {
    pub fn select(&mut self, category: Category) {
        self.active = category;
    }

    /// Highlight state for a control declaring `category`.
    pub fn control_active(&self, category: &Category) -> bool {
        &self.active == category
    }

    pub fn card_visible(&self, card_category: &str) -> bool {
        self.active.matches(card_category)
    }
}
