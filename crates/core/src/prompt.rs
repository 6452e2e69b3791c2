//! The interactive capabilities the edit loop needs from a terminal.
//!
//! Implementations signal an interrupt (Ctrl-C, Esc, ...) by returning
//! [`crate::error::Error::PromptCancelled`].

use crate::error::Result;

/// One line of a selection menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// What is shown.
    pub label: String,
    /// What the search box is matched against.
    pub search_key: String,
}

impl MenuItem {
    /// An item that is searched by its own label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            search_key: label.clone(),
            label,
        }
    }

    pub fn with_search_key(label: impl Into<String>, search_key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            search_key: search_key.into(),
        }
    }

    /// Case-insensitive substring match of `query` against the search key.
    ///
    /// An empty query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.search_key
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

pub trait Prompt {
    /// Lets the user pick one of `items`, returning its index.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::PromptCancelled`] on interrupt, or a terminal
    /// I/O error.
    fn select_one(&mut self, title: &str, items: &[MenuItem]) -> Result<usize>;

    /// Reads one line of text, pre-filled with `default`.
    ///
    /// With `masked` set the typed characters are not echoed back.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::PromptCancelled`] on interrupt, or a terminal
    /// I/O error.
    fn read_line(&mut self, label: &str, default: &str, masked: bool) -> Result<String>;

    /// Intermediate progress, which the caller may choose not to show.
    fn status(&mut self, message: &str);

    /// Outcomes and errors that must always reach the user.
    fn report(&mut self, message: &str);
}
