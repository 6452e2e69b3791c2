use std::io::{stdout, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::queue;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::LineAction;
use ssm_edit_core::error::{Error, Result};

const MASK_CHAR: char = '*';

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Text being edited plus the cursor position, in chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    /// Starts with `initial` and the cursor at its end.
    pub fn new(initial: &str) -> Self {
        let chars: Vec<char> = initial.chars().collect();
        Self {
            cursor: chars.len(),
            chars,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// What to echo, `*` per char when masked.
    #[must_use]
    pub fn rendered(&self, masked: bool) -> String {
        if masked {
            std::iter::repeat(MASK_CHAR).take(self.chars.len()).collect()
        } else {
            self.text()
        }
    }

    /// Terminal columns covered by the echoed text left of the cursor.
    #[must_use]
    pub fn cursor_width(&self, masked: bool) -> usize {
        if masked {
            return self.cursor;
        }
        self.chars[..self.cursor]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    pub fn apply(&mut self, key_event: KeyEvent) -> LineAction {
        let control = key_event.modifiers.contains(KeyModifiers::CONTROL);

        match key_event.code {
            KeyCode::Enter => return LineAction::Submit,
            KeyCode::Esc => return LineAction::Cancel,
            KeyCode::Char('c') | KeyCode::Char('d') if control => return LineAction::Cancel,
            // Clear to start, as in readline
            KeyCode::Char('u') if control => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('a') if control => self.cursor = 0,
            KeyCode::Char('e') if control => self.cursor = self.chars.len(),
            KeyCode::Char(c) if !control => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            _ => {}
        }

        LineAction::Continue
    }
}

fn redraw_line(label: &str, buffer: &LineBuffer, masked: bool) -> Result<()> {
    let mut stdout = stdout();
    let prompt = format!("{label}: ");
    let cursor_column = prompt.width() + buffer.cursor_width(masked);

    queue!(
        stdout,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(buffer.rendered(masked)),
        MoveToColumn(u16::try_from(cursor_column).unwrap_or(u16::MAX)),
    )?;
    stdout.flush()?;
    Ok(())
}

/// Reads a line of input, pre-filled with `default`.
///
/// Enter submits, Esc or Ctrl-C cancels with [`Error::PromptCancelled`].
pub fn read_line(label: &str, default: &str, masked: bool) -> Result<String> {
    let mut buffer = LineBuffer::new(default);

    enable_raw_mode()?;
    let _raw_mode_guard = RawModeGuard;

    redraw_line(label, &buffer, masked)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match buffer.apply(key_event) {
            LineAction::Continue => redraw_line(label, &buffer, masked)?,
            LineAction::Submit => {
                queue!(stdout(), Print("\r\n"))?;
                stdout().flush()?;
                return Ok(buffer.text());
            }
            LineAction::Cancel => {
                queue!(stdout(), Print("\r\n"))?;
                stdout().flush()?;
                return Err(Error::PromptCancelled);
            }
        }
    }
}
