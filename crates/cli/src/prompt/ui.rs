use std::fmt::Display;
use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{
    DisableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::style::Color::{DarkBlue, DarkGreen, Reset, Yellow};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, event, execute, queue, terminal, ExecutableCommand};

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, MenuOutcome, UiState};
use ssm_edit_core::error::Result;
use ssm_edit_core::prompt::MenuItem;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

fn redraw_ui(
    title: &str,
    ui_state: &UiState,
    items: &[MenuItem],
    indexes_to_display: &[usize],
    notice: Option<&str>,
) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(title, ui_state, indexes_to_display.len())?;

    if indexes_to_display.is_empty() {
        queue!(
            stdout,
            MoveTo(0, 1),
            SetForegroundColor(Color::Red),
            Print("No matching parameters!".to_string()),
            SetAttribute(Attribute::Reset),
            cursor::MoveToNextLine(1)
        )?;
    } else {
        print_items_with_selection(ui_state, items, indexes_to_display)?;
    }

    if let Some(footer) = footer_text(ui_state, notice) {
        let footer: String = footer.chars().take(ui_state.viewport.width as usize).collect();
        queue!(
            stdout,
            MoveTo(0, ui_state.viewport.height.saturating_add(1)),
            SetAttribute(Attribute::Bold),
            Print(footer),
            SetAttribute(Attribute::Reset)
        )?;
    }

    stdout.flush()?;
    Ok(())
}

/// The bottom row: the filter while filtering, otherwise `notice` if any.
fn footer_text(ui_state: &UiState, notice: Option<&str>) -> Option<String> {
    if ui_state.is_filtering {
        Some(format!("Filter: {}", ui_state.filter_text))
    } else {
        notice.map(ToString::to_string)
    }
}

/// Shows `items` full screen and lets the user pick one.
///
/// `notice` is shown on the bottom row while the filter is not in use.
pub fn prompt_for_choice(
    title: &str,
    items: &[MenuItem],
    notice: Option<&str>,
) -> Result<MenuOutcome> {
    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode and mouse capture is disabled
    stdout.execute(event::EnableMouseCapture)?;

    let (width, height) = terminal::size()?;
    let mut ui_state = UiState::new(width, height);
    let mut indexes_to_display = filter_displayed_indexes(items, &ui_state.filter_text);
    redraw_ui(title, &ui_state, items, &indexes_to_display, notice)?;

    loop {
        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let mut new_ui_state: Option<UiState> = None;
        let mut index_change_direction: Option<CycleDirection> = None;

        match event::read()? {
            Event::Mouse(MouseEvent {
                kind, modifiers, ..
            }) if modifiers == KeyModifiers::NONE => match kind {
                MouseEventKind::ScrollDown => index_change_direction = Some(Down),
                MouseEventKind::ScrollUp => index_change_direction = Some(Up),
                _ => {}
            },
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                let (outcome, new_state, new_direction) =
                    handle_key_event(key_event, &ui_state, &indexes_to_display)?;

                if let Some(outcome) = outcome {
                    return Ok(outcome);
                }

                new_ui_state = new_state;
                index_change_direction = new_direction;
            }
            Event::Resize(width, height) => {
                new_ui_state = Some(handle_resize(
                    width,
                    height,
                    &ui_state,
                    &indexes_to_display,
                ));
            }
            _ => {}
        }

        if let Some(direction) = index_change_direction {
            new_ui_state = Some(move_selected_index(
                new_ui_state.as_ref().unwrap_or(&ui_state),
                indexes_to_display.len(),
                direction,
            ));
        }

        if let Some(state) = new_ui_state {
            if state != ui_state {
                if state.filter_text != ui_state.filter_text {
                    indexes_to_display = filter_displayed_indexes(items, &state.filter_text);
                }
                ui_state = state;
                redraw_ui(title, &ui_state, items, &indexes_to_display, notice)?;
            }
        }
    }
}

/// Handle keyboard events in the selection UI
fn handle_key_event(
    key_event: event::KeyEvent,
    ui_state: &UiState,
    indexes_to_display: &[usize],
) -> Result<(
    Option<MenuOutcome>,
    Option<UiState>,
    Option<CycleDirection>,
)> {
    match key_event.code {
        KeyCode::Up => Ok((None, None, Some(Up))),
        KeyCode::Down => Ok((None, None, Some(Down))),
        KeyCode::Enter => {
            if let Some(item_index) = indexes_to_display.get(ui_state.selected_index) {
                return Ok((Some(MenuOutcome::Picked(*item_index)), None, None));
            }
            execute!(stdout(), Print("\x07"))?;
            Ok((None, None, None))
        }
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Ok((Some(MenuOutcome::Cancelled), None, None))
        }
        KeyCode::Backspace if ui_state.is_filtering => {
            let mut filter_text = ui_state.filter_text.clone();
            if filter_text.pop().is_none() {
                return Ok((None, None, None));
            }
            Ok((None, Some(ui_state.with_filter(filter_text)), None))
        }
        KeyCode::Char(c) if ui_state.is_filtering => {
            let mut filter_text = ui_state.filter_text.clone();
            filter_text.push(c);
            Ok((None, Some(ui_state.with_filter(filter_text)), None))
        }
        KeyCode::Esc if ui_state.is_filtering => {
            let mut updated_state = ui_state.with_filter(String::new());
            updated_state.is_filtering = false;
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Char('/') => {
            let mut updated_state = ui_state.clone();
            updated_state.is_filtering = true;
            Ok((None, Some(updated_state), None))
        }
        KeyCode::Char('k') => Ok((None, None, Some(Up))),
        KeyCode::Char('j') => Ok((None, None, Some(Down))),
        KeyCode::Char('q') | KeyCode::Esc => Ok((Some(MenuOutcome::Cancelled), None, None)),
        _ => Ok((None, None, None)),
    }
}

/// Handle window resize events
fn handle_resize(
    width: u16,
    height: u16,
    ui_state: &UiState,
    indexes_to_display: &[usize],
) -> UiState {
    let new_height = height.saturating_sub(2);
    let mut ui_state = ui_state.clone();
    let selected_index = ui_state.selected_index;
    let mut new_viewport = ui_state.viewport.clone();
    new_viewport.width = width;

    // If growing taller, try to show more items above current selection
    match new_height.cmp(&ui_state.viewport.height) {
        std::cmp::Ordering::Greater if new_viewport.offset > 0 => {
            let height_increase = new_height - new_viewport.height;
            new_viewport.offset = new_viewport.offset.saturating_sub(height_increase as usize);
        }
        std::cmp::Ordering::Less if selected_index >= new_viewport.offset + new_height as usize => {
            new_viewport.offset = selected_index.saturating_sub((new_height as usize).saturating_sub(1));

            if new_viewport.offset + new_height as usize > indexes_to_display.len() {
                new_viewport.offset = indexes_to_display.len().saturating_sub(new_height as usize);
            }
        }
        _ => {}
    }

    new_viewport.height = new_height;
    ui_state.viewport = new_viewport;
    ui_state
}

/// Print the header for the selection UI
fn print_header(title: &str, ui_state: &UiState, display_count: usize) -> Result<()> {
    let mut stdout = stdout();
    let width = ui_state.viewport.width as usize;

    let left_padding_size = 2usize;

    let left_padding = " ".repeat(left_padding_size);

    let instructions = if ui_state.is_filtering {
        format!("{title}   |   <esc>: Stop Filtering")
    } else {
        format!(
            "{title}   |   /: Filter   |   {}/{}   |   q: Back",
            pad_to_width_of(ui_state.selected_index + 1, display_count),
            display_count
        )
    };

    let right_padding = " ".repeat(
        width
            .saturating_sub(left_padding_size)
            .saturating_sub(instructions.chars().count()),
    );

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(left_padding),
        Print(instructions),
        Print(right_padding),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = format!("{max_number}").len();
    format!("{:>width$}", value.to_string())
}

/// Clear and write one menu row
fn clear_and_write_row(row: u16, item: &MenuItem, is_selected: bool, width: u16) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, MoveTo(0, row), Clear(ClearType::CurrentLine))?;

    let content: String = item.label.chars().take(width as usize).collect();
    let padding = " ".repeat((width as usize).saturating_sub(content.chars().count()));

    if is_selected {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            SetBackgroundColor(DarkBlue),
            SetForegroundColor(Yellow),
        )?;
    }

    queue!(
        stdout,
        Print(content),
        Print(padding),
        SetAttribute(Attribute::Reset),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Print all visible items with the selected one highlighted
fn print_items_with_selection(
    ui_state: &UiState,
    items: &[MenuItem],
    indexes_to_display: &[usize],
) -> Result<()> {
    let viewport = &ui_state.viewport;

    let visible_items = indexes_to_display
        .iter()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (i, item_index) in visible_items.enumerate() {
        let is_selected = i + viewport.offset == ui_state.selected_index;

        clear_and_write_row(
            u16::try_from(i + 1).unwrap_or(u16::MAX),
            &items[*item_index],
            is_selected,
            viewport.width,
        )?;
    }

    Ok(())
}

/// Move the selected index in the given direction, wrapping around
fn move_selected_index(
    ui_state: &UiState,
    display_length: usize,
    direction: CycleDirection,
) -> UiState {
    if display_length == 0 {
        return ui_state.clone();
    }

    let mut new_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();
    let visible_rows = (ui_state.viewport.height as usize).max(1);

    match direction {
        Up => {
            if new_index == 0 {
                new_index = display_length - 1;
                ui_state.viewport.offset = new_index.saturating_sub(visible_rows - 1);
            } else {
                new_index -= 1;
                if new_index < ui_state.viewport.offset {
                    ui_state.viewport.offset = new_index;
                }
            }
        }
        Down => {
            new_index = (new_index + 1) % display_length;
            if new_index < ui_state.selected_index {
                ui_state.viewport.offset = 0;
            } else if new_index >= ui_state.viewport.offset + visible_rows {
                ui_state.viewport.offset = new_index + 1 - visible_rows;
            }
        }
    }

    ui_state.selected_index = new_index;
    ui_state
}

/// Indexes of the items matching the filter, in their original order
fn filter_displayed_indexes(items: &[MenuItem], filter: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches(filter))
        .map(|(i, _)| i)
        .collect()
}
