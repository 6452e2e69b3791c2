//! An in-process [`ParameterStore`].
//!
//! Behaves like the remote store where it matters to the edit loop: listings
//! are paginated and only cover direct children of the prefix, creates refuse
//! to overwrite, and reads can be made to lag behind writes until
//! [`MemoryStore::converge`] is called.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use log::debug;

use crate::entry::{Entry, Prefix};
use crate::error::{Error, Result};
use crate::store::{Page, ParameterStore, WriteMode};

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug)]
pub struct MemoryStore {
    /// What readers see.
    visible: RefCell<BTreeMap<String, Entry>>,
    /// Accepted writes not yet visible to readers (only with read lag).
    pending: RefCell<BTreeMap<String, Entry>>,
    page_size: usize,
    read_lag: bool,
    failing_writes: Cell<u32>,
    failing_lists: Cell<bool>,
    write_attempts: Cell<u32>,
    list_calls: Cell<u32>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: RefCell::new(BTreeMap::new()),
            pending: RefCell::new(BTreeMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
            read_lag: false,
            failing_writes: Cell::new(0),
            failing_lists: Cell::new(false),
            write_attempts: Cell::new(0),
            list_calls: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let store = Self::new();
        store
            .visible
            .borrow_mut()
            .extend(entries.into_iter().map(|e| (e.name.clone(), e)));
        store
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Writes succeed but stay invisible to listings until [`Self::converge`].
    #[must_use]
    pub fn with_read_lag(mut self) -> Self {
        self.read_lag = true;
        self
    }

    /// The next `count` writes fail with a remote error.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.set(count);
    }

    pub fn fail_lists(&self, failing: bool) {
        self.failing_lists.set(failing);
    }

    /// Makes every accepted write visible.
    pub fn converge(&self) {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        self.visible.borrow_mut().extend(pending);
    }

    /// The latest accepted value for `name`, visible or not.
    #[must_use]
    pub fn stored(&self, name: &str) -> Option<Entry> {
        let pending = self.pending.borrow();
        let visible = self.visible.borrow();
        pending.get(name).or_else(|| visible.get(name)).cloned()
    }

    #[must_use]
    pub fn write_attempts(&self) -> u32 {
        self.write_attempts.get()
    }

    /// Number of full listings started (first page requests).
    #[must_use]
    pub fn list_calls(&self) -> u32 {
        self.list_calls.get()
    }

    fn is_direct_child(prefix: &Prefix, name: &str) -> bool {
        name.strip_prefix(prefix.as_str())
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
    }
}

impl ParameterStore for MemoryStore {
    fn fetch_page(&self, prefix: &Prefix, next_token: Option<String>) -> Result<Page> {
        if next_token.is_none() {
            self.list_calls.set(self.list_calls.get() + 1);
        }

        if self.failing_lists.get() {
            return Err(Error::remote(
                "list",
                prefix.as_str(),
                "simulated list failure",
            ));
        }

        let offset = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                Error::remote("list", prefix.as_str(), format!("bad token `{token}`"))
            })?,
            None => 0,
        };

        let children: Vec<Entry> = self
            .visible
            .borrow()
            .values()
            .filter(|e| Self::is_direct_child(prefix, &e.name))
            .cloned()
            .collect();

        let end = (offset + self.page_size).min(children.len());
        let entries = children.get(offset..end).unwrap_or_default().to_vec();
        let next_token = (end < children.len()).then(|| end.to_string());

        Ok(Page {
            entries,
            next_token,
        })
    }

    fn put(&self, entry: &Entry, mode: WriteMode) -> Result<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);

        let remaining_failures = self.failing_writes.get();
        if remaining_failures > 0 {
            self.failing_writes.set(remaining_failures - 1);
            return Err(Error::remote("put", &entry.name, "simulated write failure"));
        }

        if !mode.allows_overwrite() && self.stored(&entry.name).is_some() {
            return Err(Error::AlreadyExists {
                name: entry.name.clone(),
            });
        }

        debug!("Stored `{}` ({:?})", entry.name, mode);
        let target = if self.read_lag {
            &self.pending
        } else {
            &self.visible
        };
        target.borrow_mut().insert(entry.name.clone(), entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    fn plain(name: &str, value: &str) -> Entry {
        Entry::new(name, value, EntryKind::Plain)
    }

    #[test]
    fn test_list_only_direct_children() {
        let store = MemoryStore::with_entries([
            plain("/app/test/A", "1"),
            plain("/app/test/nested/B", "2"),
            plain("/app/other/C", "3"),
            plain("/app/test/D", "4"),
        ]);

        let names: Vec<String> = store
            .list(&Prefix::new("/app/test"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["/app/test/A", "/app/test/D"]);
    }

    #[test]
    fn test_list_paginates() {
        let store = MemoryStore::with_entries(
            (0..7).map(|i| plain(&format!("/p/k{i}"), &i.to_string())),
        )
        .with_page_size(3);

        let prefix = Prefix::new("/p");
        let first = store.fetch_page(&prefix, None).unwrap();
        assert_eq!(first.entries.len(), 3);
        assert_eq!(first.next_token.as_deref(), Some("3"));

        assert_eq!(store.list(&prefix).unwrap().len(), 7);
    }

    #[test]
    fn test_create_refuses_existing_name() {
        let store = MemoryStore::with_entries([plain("/p/A", "1")]);

        let result = store.put(&plain("/p/A", "2"), WriteMode::Create);
        assert!(matches!(result, Err(Error::AlreadyExists { .. })));
        assert_eq!(store.stored("/p/A").unwrap().value, "1");
    }

    #[test]
    fn test_read_lag_hides_writes_until_converged() {
        let store = MemoryStore::with_entries([plain("/p/A", "1")]).with_read_lag();
        let prefix = Prefix::new("/p");

        store
            .put(&plain("/p/A", "2"), WriteMode::Overwrite)
            .unwrap();
        assert_eq!(store.list(&prefix).unwrap()[0].value, "1");
        assert_eq!(store.stored("/p/A").unwrap().value, "2");

        store.converge();
        assert_eq!(store.list(&prefix).unwrap()[0].value, "2");
    }

    #[test]
    fn test_injected_write_failures_are_consumed() {
        let store = MemoryStore::new();
        store.fail_next_writes(2);

        assert!(store.put(&plain("/p/A", "1"), WriteMode::Create).is_err());
        assert!(store.put(&plain("/p/A", "1"), WriteMode::Create).is_err());
        assert!(store.put(&plain("/p/A", "1"), WriteMode::Create).is_ok());
        assert_eq!(store.write_attempts(), 3);
    }
}
