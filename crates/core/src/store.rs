//! Access to the remote parameter store.
//!
//! Backends implement two primitives: fetching one page of a listing and
//! writing one entry. Pagination is hidden behind [`Pages`], so callers of
//! [`ParameterStore::list`] only ever see one flat, ordered sequence.

use log::debug;

use crate::entry::{Entry, Prefix};
use crate::error::Result;

/// One page of a listing, as returned by the backing store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub entries: Vec<Entry>,
    /// Continuation token for the next page, `None` on the last page.
    pub next_token: Option<String>,
}

/// Whether a write may replace an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fails with [`crate::error::Error::AlreadyExists`] if the name is taken.
    Create,
    Overwrite,
}

impl WriteMode {
    #[must_use]
    pub fn allows_overwrite(&self) -> bool {
        matches!(self, WriteMode::Overwrite)
    }
}

pub trait ParameterStore {
    /// Fetches the direct children of `prefix`, decrypted, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Remote`] on any transport, auth or
    /// permission failure.
    fn fetch_page(&self, prefix: &Prefix, next_token: Option<String>) -> Result<Page>;

    /// Upserts a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::AlreadyExists`] when `mode` is
    /// [`WriteMode::Create`] and the name is taken, or
    /// [`crate::error::Error::Remote`] on any other failure.
    fn put(&self, entry: &Entry, mode: WriteMode) -> Result<()>;

    /// Lists every entry under `prefix`, following continuation tokens.
    ///
    /// All-or-nothing: the first failing page fails the whole listing.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`ParameterStore::fetch_page`].
    fn list(&self, prefix: &Prefix) -> Result<Vec<Entry>>
    where
        Self: Sized,
    {
        let mut entries = Vec::new();
        for page in Pages::new(self, prefix) {
            entries.extend(page?.entries);
        }
        debug!("Listed {} entries under `{}`", entries.len(), prefix);
        Ok(entries)
    }
}

/// Lazy sequence of pages, ending after the page without a continuation token
/// or after the first error.
pub struct Pages<'a, S: ParameterStore> {
    store: &'a S,
    prefix: &'a Prefix,
    next_token: Option<String>,
    done: bool,
}

impl<'a, S: ParameterStore> Pages<'a, S> {
    pub fn new(store: &'a S, prefix: &'a Prefix) -> Self {
        Self {
            store,
            prefix,
            next_token: None,
            done: false,
        }
    }
}

impl<S: ParameterStore> Iterator for Pages<'_, S> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.store.fetch_page(self.prefix, self.next_token.take());
        match &result {
            Ok(page) => {
                debug!(
                    "Fetched page of {} entries under `{}`",
                    page.entries.len(),
                    self.prefix
                );
                self.next_token = page.next_token.clone();
                self.done = self.next_token.is_none();
            }
            Err(_) => self.done = true,
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::error::Error;
    use std::cell::RefCell;

    /// Serves canned pages, recording which tokens it was asked for.
    struct CannedPages {
        pages: Vec<Result<Page>>,
        requested: RefCell<Vec<Option<String>>>,
    }

    impl CannedPages {
        fn new(pages: Vec<Result<Page>>) -> Self {
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl ParameterStore for CannedPages {
        fn fetch_page(&self, _prefix: &Prefix, next_token: Option<String>) -> Result<Page> {
            let index = next_token
                .as_deref()
                .map_or(0, |token| token.parse::<usize>().unwrap());
            self.requested.borrow_mut().push(next_token);
            match &self.pages[index] {
                Ok(page) => Ok(page.clone()),
                Err(_) => Err(Error::remote("list", "page", "boom")),
            }
        }

        fn put(&self, _entry: &Entry, _mode: WriteMode) -> Result<()> {
            unreachable!("not used by listing tests")
        }
    }

    fn page(names: &[&str], next_token: Option<&str>) -> Result<Page> {
        Ok(Page {
            entries: names
                .iter()
                .map(|name| Entry::new(*name, "v", EntryKind::Plain))
                .collect(),
            next_token: next_token.map(ToString::to_string),
        })
    }

    #[test]
    fn test_list_concatenates_pages_in_order() {
        let store = CannedPages::new(vec![
            page(&["/p/c", "/p/a"], Some("1")),
            page(&["/p/b"], Some("2")),
            page(&["/p/d"], None),
        ]);

        let names: Vec<String> = store
            .list(&Prefix::new("/p"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["/p/c", "/p/a", "/p/b", "/p/d"]);
        assert_eq!(
            *store.requested.borrow(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_list_is_all_or_nothing() {
        let store = CannedPages::new(vec![
            page(&["/p/a"], Some("1")),
            Err(Error::Misc("placeholder".to_string())),
            page(&["/p/never"], None),
        ]);

        let result = store.list(&Prefix::new("/p"));
        assert!(matches!(result, Err(Error::Remote { .. })));
        // Nothing fetched after the failure
        assert_eq!(store.requested.borrow().len(), 2);
    }

    #[test]
    fn test_pages_stops_after_error() {
        let store = CannedPages::new(vec![Err(Error::Misc("placeholder".to_string()))]);
        let prefix = Prefix::new("/p");
        let mut pages = Pages::new(&store, &prefix);

        assert!(pages.next().unwrap().is_err());
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_empty_listing() {
        let store = CannedPages::new(vec![page(&[], None)]);
        assert!(store.list(&Prefix::new("/p")).unwrap().is_empty());
    }

    #[test]
    fn test_write_mode_overwrite_flag() {
        assert!(WriteMode::Overwrite.allows_overwrite());
        assert!(!WriteMode::Create.allows_overwrite());
    }
}
