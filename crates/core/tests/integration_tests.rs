//! Integration tests for ssm-edit-core
//!
//! These drive the whole edit loop against the in-memory store with a
//! scripted prompt, checking complete sessions end-to-end.

use ssm_edit_core::{
    edit_loop::{EditLoop, Settings, CREATE_LABEL, QUIT_LABEL},
    entry::{Entry, EntryKind, Prefix},
    error::{Error, Result},
    format::MASK,
    memory::MemoryStore,
    prompt::{MenuItem, Prompt},
    retry::RetryPolicy,
    store::ParameterStore,
};
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted user action.
enum Action {
    /// Pick the menu item whose label starts with this text.
    Pick(&'static str),
    /// Pick by position.
    PickIndex(usize),
    Type(&'static str),
    Interrupt,
}

#[derive(Default)]
struct ScriptedPrompt {
    actions: VecDeque<Action>,
    menus: Vec<Vec<String>>,
    reports: Vec<String>,
    statuses: Vec<String>,
}

impl ScriptedPrompt {
    fn new(actions: Vec<Action>) -> Self {
        Self {
            actions: actions.into(),
            ..Self::default()
        }
    }

    /// Menu labels between the create and quit sentinels.
    fn listed(&self, menu: usize) -> Vec<String> {
        let labels = &self.menus[menu];
        labels[1..labels.len() - 1].to_vec()
    }
}

impl Prompt for ScriptedPrompt {
    fn select_one(&mut self, _title: &str, items: &[MenuItem]) -> Result<usize> {
        self.menus
            .push(items.iter().map(|item| item.label.clone()).collect());

        match self.actions.pop_front() {
            Some(Action::Pick(label)) => Ok(items
                .iter()
                .position(|item| item.label.starts_with(label))
                .unwrap_or_else(|| panic!("No menu item starting with `{label}`"))),
            Some(Action::PickIndex(index)) => Ok(index),
            Some(Action::Interrupt) | None => Err(Error::PromptCancelled),
            Some(Action::Type(text)) => panic!("Expected a selection, got text `{text}`"),
        }
    }

    fn read_line(&mut self, _label: &str, _default: &str, _masked: bool) -> Result<String> {
        match self.actions.pop_front() {
            Some(Action::Type(text)) => Ok(text.to_string()),
            Some(Action::Interrupt) | None => Err(Error::PromptCancelled),
            Some(_) => panic!("Expected text input, got a selection"),
        }
    }

    fn status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }

    fn report(&mut self, message: &str) {
        self.reports.push(message.to_string());
    }
}

fn plain(name: &str, value: &str) -> Entry {
    Entry::new(name, value, EntryKind::Plain)
}

fn session(
    store: MemoryStore,
    secure: bool,
    actions: Vec<Action>,
) -> EditLoop<MemoryStore, ScriptedPrompt> {
    EditLoop::new(
        store,
        ScriptedPrompt::new(actions),
        Settings {
            prefix: Prefix::new("/app/test"),
            secure,
            quiet: false,
        },
        RetryPolicy::new(5, Duration::ZERO),
    )
}

/// Edit B while the store lags behind, then quit.
#[test]
fn test_edit_shows_new_value_before_store_converges() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1"), plain("/app/test/B", "2")])
        .with_read_lag();

    let mut edit_loop = session(
        store,
        false,
        vec![Action::Pick("B ="), Action::Type("3"), Action::Pick(QUIT_LABEL)],
    );
    edit_loop.run().unwrap();

    let prompt = edit_loop.prompt();
    assert_eq!(prompt.listed(0), vec!["A = 1", "B = 2"]);
    // Store has not converged yet, the listing still shows the new value
    assert_eq!(prompt.listed(1), vec!["A = 1", "B = 3"]);

    // One write, no further writes after quitting
    assert_eq!(edit_loop.store().write_attempts(), 1);
    assert_eq!(edit_loop.store().list_calls(), 2);
    assert_eq!(edit_loop.latest_write(), Some(&plain("/app/test/B", "3")));

    let raw = edit_loop.store().list(&Prefix::new("/app/test")).unwrap();
    assert_eq!(raw[1].value, "2");
}

#[test]
fn test_no_op_edits_never_write() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);

    let mut edit_loop = session(
        store,
        false,
        vec![
            // Empty input
            Action::Pick("A ="),
            Action::Type(""),
            // Unchanged value
            Action::Pick("A ="),
            Action::Type("1"),
            // Whitespace only
            Action::Pick("A ="),
            Action::Type("   "),
            Action::Pick(QUIT_LABEL),
        ],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 0);
    assert!(edit_loop.latest_write().is_none());
    assert_eq!(
        edit_loop
            .prompt()
            .statuses
            .iter()
            .filter(|s| s.as_str() == "No changes.")
            .count(),
        3
    );
}

/// The line editor is pre-filled with the current value, submitting it as is
/// must not write even when the value carries surrounding whitespace.
#[test]
fn test_unchanged_padded_value_never_writes() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "  padded ")]);

    let mut edit_loop = session(
        store,
        false,
        vec![
            Action::Pick("A ="),
            Action::Type("  padded "),
            Action::Pick(QUIT_LABEL),
        ],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 0);
    assert_eq!(edit_loop.store().stored("/app/test/A").unwrap().value, "  padded ");
    assert!(edit_loop
        .prompt()
        .statuses
        .iter()
        .any(|s| s.as_str() == "No changes."));
}

#[test]
fn test_retry_budget_exhausted() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);
    store.fail_next_writes(u32::MAX);

    let mut edit_loop = session(
        store,
        false,
        vec![Action::Pick("A ="), Action::Type("2"), Action::Pick(QUIT_LABEL)],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 5);
    assert!(edit_loop.latest_write().is_none());

    let prompt = edit_loop.prompt();
    assert!(prompt
        .reports
        .iter()
        .any(|r| r.contains("after 5 attempts")));
    // Loop continued with the stale value
    assert_eq!(prompt.listed(1), vec!["A = 1"]);
}

#[test]
fn test_transient_write_failure_is_retried() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);
    store.fail_next_writes(2);

    let mut edit_loop = session(
        store,
        false,
        vec![Action::Pick("A ="), Action::Type("2"), Action::Pick(QUIT_LABEL)],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 3);
    assert_eq!(edit_loop.store().stored("/app/test/A").unwrap().value, "2");
    assert_eq!(edit_loop.prompt().listed(1), vec!["A = 2"]);
}

#[test]
fn test_create_duplicate_leaves_existing_value() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);

    let mut edit_loop = session(
        store,
        false,
        vec![
            Action::Pick(CREATE_LABEL),
            Action::Type("A"),
            Action::Type("overwritten"),
            Action::Pick("String"),
            Action::Pick(QUIT_LABEL),
        ],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().stored("/app/test/A").unwrap().value, "1");
    // Not retried
    assert_eq!(edit_loop.store().write_attempts(), 1);
    assert!(edit_loop.latest_write().is_none());
    assert!(edit_loop
        .prompt()
        .reports
        .iter()
        .any(|r| r.contains("already exists")));
}

#[test]
fn test_create_new_secret() {
    let mut edit_loop = session(
        MemoryStore::new(),
        true,
        vec![
            Action::Pick(CREATE_LABEL),
            Action::Type("TOKEN"),
            Action::Type("hunter2"),
            Action::Pick("SecureString"),
            Action::Pick(QUIT_LABEL),
        ],
    );
    edit_loop.run().unwrap();

    let stored = edit_loop.store().stored("/app/test/TOKEN").unwrap();
    assert_eq!(stored.kind, EntryKind::Secret);
    assert_eq!(stored.value, "hunter2");
    assert_eq!(
        edit_loop.prompt().listed(2),
        vec![format!("TOKEN = {MASK}")]
    );
}

#[test]
fn test_interrupt_during_creation_returns_to_listing() {
    let mut edit_loop = session(
        MemoryStore::new(),
        false,
        vec![
            Action::Pick(CREATE_LABEL),
            Action::Type("NAME"),
            Action::Type("value"),
            // Kind menu
            Action::Interrupt,
            Action::Pick(QUIT_LABEL),
        ],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 0);
    assert_eq!(edit_loop.store().list_calls(), 2);
}

#[test]
fn test_interrupt_during_edit_returns_to_listing() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);

    let mut edit_loop = session(
        store,
        false,
        vec![Action::Pick("A ="), Action::Interrupt, Action::PickIndex(0), Action::Interrupt, Action::Interrupt],
    );
    edit_loop.run().unwrap();

    assert_eq!(edit_loop.store().write_attempts(), 0);
    // Listed after the edit and after the create were both abandoned
    assert_eq!(edit_loop.store().list_calls(), 3);
}

#[test]
fn test_listing_failure_is_fatal() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);
    store.fail_lists(true);

    let mut edit_loop = session(store, false, vec![Action::Pick(QUIT_LABEL)]);
    let result = edit_loop.run();

    match result {
        Err(Error::Remote {
            operation, target, ..
        }) => {
            assert_eq!(operation, "list");
            assert_eq!(target, "/app/test/");
        }
        other => panic!("Expected a remote error, got {other:?}"),
    }
    assert!(edit_loop.prompt().menus.is_empty());
    assert!(edit_loop.prompt().reports[0].starts_with("Error fetching parameters"));
}

#[test]
fn test_secure_mode_masks_listing_and_edit_prompt() {
    let store = MemoryStore::with_entries([
        Entry::new("/app/test/TOKEN", "hunter2", EntryKind::Secret),
        plain("/app/test/HOST", "example.com"),
    ]);

    let mut edit_loop = session(
        store,
        true,
        vec![Action::Pick("TOKEN"), Action::Type(""), Action::Pick(QUIT_LABEL)],
    );
    edit_loop.run().unwrap();

    let prompt = edit_loop.prompt();
    assert_eq!(
        prompt.listed(0),
        vec!["HOST = example.com".to_string(), format!("TOKEN = {MASK}")]
    );
    assert!(prompt.reports.iter().all(|r| !r.contains("hunter2")));
}

#[test]
fn test_listing_spans_many_pages() {
    let store = MemoryStore::with_entries(
        (0..25).map(|i| plain(&format!("/app/test/K{i:02}"), &i.to_string())),
    )
    .with_page_size(4);

    let mut edit_loop = session(store, false, vec![Action::Pick(QUIT_LABEL)]);
    edit_loop.run().unwrap();

    let listed = edit_loop.prompt().listed(0);
    assert_eq!(listed.len(), 25);
    assert_eq!(listed[0], "K00 = 0");
    assert_eq!(listed[24], "K24 = 24");
}

#[test]
fn test_quiet_mode_suppresses_status() {
    let store = MemoryStore::with_entries([plain("/app/test/A", "1")]);
    let mut edit_loop = EditLoop::new(
        store,
        ScriptedPrompt::new(vec![Action::Pick("A ="), Action::Type("1"), Action::Pick(QUIT_LABEL)]),
        Settings {
            prefix: Prefix::new("/app/test"),
            secure: false,
            quiet: true,
        },
        RetryPolicy::new(5, Duration::ZERO),
    );
    edit_loop.run().unwrap();

    let prompt = edit_loop.prompt();
    assert!(prompt.statuses.is_empty());
    // The current value is still reported
    assert_eq!(prompt.reports.len(), 1);
}
