//! Terminal implementation of the interactive prompt.
//!
//! This module provides the crossterm-based user interface for ssm-edit: a
//! full screen, searchable selection menu and a single line editor with
//! optional masking.
//!
//! # User Interface
//!
//! The selection menu supports:
//! - Arrow keys, vim-style (j/k) or mouse wheel navigation
//! - Enter to select an item
//! - `/` to start filtering by key name, Esc to stop
//! - 'q', Escape or Ctrl-C to back out
//!
//! The line editor supports Left/Right/Home/End, Backspace/Delete, Ctrl-U,
//! Enter to submit and Esc or Ctrl-C to cancel.
//!
//! Messages are printed on the main screen, which the menu covers. The most
//! recent one is therefore carried over to the bottom row of the next menu.

pub mod input;
pub mod types;
pub mod ui;

use log::debug;
use ssm_edit_core::error::{Error, Result};
use ssm_edit_core::prompt::{MenuItem, Prompt};

pub use types::{LineAction, MenuOutcome};
pub use ui::prompt_for_choice;

/// [`Prompt`] on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    /// Last message not yet shown inside a menu.
    notice: Option<String>,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the pending message, at most once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn show(&mut self, message: &str) {
        println!("{message}");
        self.notice = Some(message.to_string());
    }
}

impl Prompt for TerminalPrompt {
    fn select_one(&mut self, title: &str, items: &[MenuItem]) -> Result<usize> {
        let notice = self.take_notice();
        match prompt_for_choice(title, items, notice.as_deref())? {
            MenuOutcome::Picked(index) => {
                debug!("Picked `{}`", items[index].label);
                Ok(index)
            }
            MenuOutcome::Cancelled => Err(Error::PromptCancelled),
        }
    }

    fn read_line(&mut self, label: &str, default: &str, masked: bool) -> Result<String> {
        // The line editor runs on the main screen, below the printed messages
        self.notice = None;
        input::read_line(label, default, masked)
    }

    fn status(&mut self, message: &str) {
        self.show(message);
    }

    fn report(&mut self, message: &str) {
        self.show(message);
    }
}
