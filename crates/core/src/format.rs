//! Rendering of entries as `<key> = <value>` menu lines.

use crate::entry::{Entry, Prefix};

/// Shown in place of secret values while secure mode is on.
pub const MASK: &str = "********";

/// The entry name with the session prefix removed.
///
/// Names outside the prefix are returned whole.
#[must_use]
pub fn relative_name<'a>(entry: &'a Entry, prefix: &Prefix) -> &'a str {
    entry
        .name
        .strip_prefix(prefix.as_str())
        .unwrap_or(&entry.name)
}

/// The value as it may be shown on screen.
#[must_use]
pub fn display_value(entry: &Entry, secure: bool) -> &str {
    if secure && entry.is_secret() {
        MASK
    } else {
        &entry.value
    }
}

#[must_use]
pub fn format_entry(entry: &Entry, prefix: &Prefix, secure: bool) -> String {
    format!(
        "{} = {}",
        relative_name(entry, prefix),
        display_value(entry, secure)
    )
}

/// One line per entry, in order. Entries that render alike are all kept.
#[must_use]
pub fn format_listing(entries: &[Entry], prefix: &Prefix, secure: bool) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format_entry(entry, prefix, secure))
        .collect()
}
