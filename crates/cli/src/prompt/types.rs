//! Type definitions for the selection menu and line editor state.

/// How a selection menu ended.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Index into the items the menu was opened with.
    Picked(usize),
    Cancelled,
}

/// How a key press affected the line being edited.
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    Submit,
    Cancel,
}

/// Direction to cycle through items in the selection UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// State for the UI viewport.
///
/// Tracks the visible portion of the list when there are more items than
/// can fit on screen.
#[derive(Clone, PartialEq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Complete UI state for the selection menu.
#[derive(Clone, PartialEq, Debug)]
pub struct UiState {
    /// Position of the highlighted row among the filtered items
    pub selected_index: usize,
    /// Viewport state for scrolling
    pub viewport: ViewportState,
    /// Whether the user is currently filtering/searching
    pub is_filtering: bool,
    /// Current filter/search text
    pub filter_text: String,
}

impl UiState {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            selected_index: 0,
            viewport: ViewportState {
                offset: 0,
                // Header and filter line
                height: height.saturating_sub(2),
                width,
            },
            is_filtering: false,
            filter_text: String::new(),
        }
    }

    /// Copy with a new filter text and the selection back at the top.
    #[must_use]
    pub fn with_filter(&self, filter_text: String) -> Self {
        let mut updated = self.clone();
        updated.filter_text = filter_text;
        updated.selected_index = 0;
        updated.viewport.offset = 0;
        updated
    }
}
