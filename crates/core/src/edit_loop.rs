//! The interactive edit loop.
//!
//! ```text
//! Listing -> Selecting -> Creating -> Persisting -> Listing
//!                     \-> Editing  -/
//!                     \-> Quit
//! ```
//!
//! Reads are fatal on failure, writes go through the [`RetryPolicy`]. The
//! most recent successful write is kept and folded into every listing so the
//! user never sees a stale value right after saving.

use log::{debug, info};

use crate::entry::{Entry, EntryKind, Prefix};
use crate::error::{Error, Result};
use crate::format::{display_value, format_listing, relative_name};
use crate::prompt::{MenuItem, Prompt};
use crate::reconcile::reconcile;
use crate::retry::RetryPolicy;
use crate::store::{ParameterStore, WriteMode};

pub const CREATE_LABEL: &str = "[+] Create new parameter";
pub const QUIT_LABEL: &str = "[q] Quit";

/// Session-wide options for the edit loop.
#[derive(Debug, Clone)]
pub struct Settings {
    pub prefix: Prefix,
    /// Hide values of secret entries, in the listing and while editing.
    pub secure: bool,
    /// Suppress intermediate status messages.
    pub quiet: bool,
}

#[derive(Debug)]
enum State {
    Listing,
    Selecting(Vec<Entry>),
    Creating,
    Editing(Entry),
    Persisting { entry: Entry, mode: WriteMode },
    Quit,
}

/// What the user picked from the main menu.
#[derive(Debug, PartialEq)]
enum MenuChoice {
    Create,
    Edit(usize),
    Quit,
}

pub struct EditLoop<S: ParameterStore, P: Prompt> {
    store: S,
    prompt: P,
    settings: Settings,
    retry: RetryPolicy,
    latest_write: Option<Entry>,
}

impl<S: ParameterStore, P: Prompt> EditLoop<S, P> {
    pub fn new(store: S, prompt: P, settings: Settings, retry: RetryPolicy) -> Self {
        Self {
            store,
            prompt,
            settings,
            retry,
            latest_write: None,
        }
    }

    /// The most recent write this session, if any.
    #[must_use]
    pub fn latest_write(&self) -> Option<&Entry> {
        self.latest_write.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    ///
    /// Returns the listing error, already reported, if the store cannot be
    /// read, or a terminal I/O error from the prompt. Write failures are
    /// reported and do not end the loop.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Listing;
        loop {
            state = match state {
                State::Listing => self.list()?,
                State::Selecting(entries) => self.select(entries)?,
                State::Creating => self.create()?,
                State::Editing(entry) => self.edit(entry)?,
                State::Persisting { entry, mode } => self.persist(entry, mode),
                State::Quit => {
                    debug!("Leaving edit loop");
                    return Ok(());
                }
            };
        }
    }

    fn status(&mut self, message: &str) {
        info!("{message}");
        if !self.settings.quiet {
            self.prompt.status(message);
        }
    }

    fn list(&mut self) -> Result<State> {
        let prefix = self.settings.prefix.clone();
        debug!("Fetching parameters under `{prefix}`");

        // Nothing useful to show without a listing, so this ends the loop
        match self.store.list(&prefix) {
            Ok(listing) => Ok(State::Selecting(reconcile(
                listing,
                self.latest_write.as_ref(),
            ))),
            Err(e) => {
                self.prompt
                    .report(&format!("Error fetching parameters: {e}"));
                Err(e)
            }
        }
    }

    fn menu_items(&self, entries: &[Entry]) -> Vec<MenuItem> {
        let prefix = &self.settings.prefix;
        let lines = format_listing(entries, prefix, self.settings.secure);
        let mut items = Vec::with_capacity(entries.len() + 2);
        items.push(MenuItem::new(CREATE_LABEL));
        items.extend(
            lines
                .into_iter()
                .zip(entries)
                .map(|(line, entry)| MenuItem::with_search_key(line, relative_name(entry, prefix))),
        );
        items.push(MenuItem::new(QUIT_LABEL));
        items
    }

    fn choose(&mut self, entries: &[Entry]) -> Result<MenuChoice> {
        let items = self.menu_items(entries);
        let title = format!("Parameters under {}", self.settings.prefix);

        let index = match self.prompt.select_one(&title, &items) {
            Ok(index) => index,
            Err(Error::PromptCancelled) => return Ok(MenuChoice::Quit),
            Err(e) => return Err(e),
        };

        Ok(match index {
            0 => MenuChoice::Create,
            i if i <= entries.len() => MenuChoice::Edit(i - 1),
            _ => MenuChoice::Quit,
        })
    }

    fn select(&mut self, entries: Vec<Entry>) -> Result<State> {
        Ok(match self.choose(&entries)? {
            MenuChoice::Create => State::Creating,
            MenuChoice::Edit(i) => State::Editing(entries[i].clone()),
            MenuChoice::Quit => {
                self.status("Quitting...");
                State::Quit
            }
        })
    }

    /// Asks for name, value and kind of a new entry.
    ///
    /// `Ok(None)` means the user backed out.
    fn read_new_entry(&mut self) -> Result<Option<Entry>> {
        let name = self.prompt.read_line("Name", "", false)?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let name = self.settings.prefix.qualify(name);

        // Kind is not known yet, so secure mode hides every new value.
        // Values are opaque and stored exactly as typed.
        let value = self.prompt.read_line("Value", "", self.settings.secure)?;

        let kind_items: Vec<MenuItem> = EntryKind::ALL
            .iter()
            .map(|kind| MenuItem::new(kind.to_string()))
            .collect();
        let kind_index = self.prompt.select_one("Parameter type", &kind_items)?;
        let kind = EntryKind::ALL
            .get(kind_index)
            .copied()
            .ok_or_else(|| Error::Misc(format!("No parameter type at index {kind_index}")))?;

        Ok(Some(Entry::new(name, value, kind)))
    }

    fn create(&mut self) -> Result<State> {
        match self.read_new_entry() {
            Ok(Some(entry)) => Ok(State::Persisting {
                entry,
                mode: WriteMode::Create,
            }),
            Ok(None) | Err(Error::PromptCancelled) => {
                self.status("Creation cancelled.");
                Ok(State::Listing)
            }
            Err(e) => Err(e),
        }
    }

    fn edit(&mut self, entry: Entry) -> Result<State> {
        let masked = self.settings.secure && entry.is_secret();
        let shown = display_value(&entry, self.settings.secure).to_string();
        self.prompt.report(&format!(
            "Current value of {}: {shown}",
            relative_name(&entry, &self.settings.prefix)
        ));

        // Never hand a hidden secret to the line editor
        let default = if masked { "" } else { entry.value.as_str() };

        let new_value = match self
            .prompt
            .read_line("New value (empty to cancel)", default, masked)
        {
            Ok(value) => value,
            Err(Error::PromptCancelled) => {
                self.status("Update cancelled.");
                return Ok(State::Listing);
            }
            Err(e) => return Err(e),
        };

        // Whitespace-only input counts as empty, anything else is kept verbatim
        if new_value == entry.value || new_value.trim().is_empty() {
            self.status("No changes.");
            return Ok(State::Listing);
        }

        Ok(State::Persisting {
            entry: entry.with_value(new_value),
            mode: WriteMode::Overwrite,
        })
    }

    fn persist(&mut self, entry: Entry, mode: WriteMode) -> State {
        let store = &self.store;
        let result = self.retry.run(&entry.name, |attempt| {
            debug!("Writing {entry}, attempt {attempt}");
            store.put(&entry, mode)
        });

        match result {
            Ok(()) => {
                let verb = match mode {
                    WriteMode::Create => "created",
                    WriteMode::Overwrite => "updated",
                };
                self.status(&format!("Parameter {} {verb} successfully.", entry.name));
                self.latest_write = Some(entry);
            }
            Err(e) => {
                self.prompt
                    .report(&format!("Error saving parameter: {e}"));
            }
        }

        State::Listing
    }
}
