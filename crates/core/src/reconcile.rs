//! Hides read-after-write lag from the user.
//!
//! The parameter store is eventually consistent: a listing fetched right
//! after a successful write may still carry the old value. The last local
//! write is folded back into every fresh listing.

use itertools::Itertools;
use log::debug;

use crate::entry::Entry;

/// Replaces the entry named like `latest` with `latest`, then sorts by name.
///
/// If nothing in `listing` carries that name the result is just the sorted
/// listing.
#[must_use]
pub fn reconcile(listing: Vec<Entry>, latest: Option<&Entry>) -> Vec<Entry> {
    listing
        .into_iter()
        .map(|entry| match latest {
            Some(latest) if latest.name == entry.name => {
                if latest.value != entry.value {
                    debug!("Listing is behind for `{}`, using local write", entry.name);
                }
                latest.clone()
            }
            _ => entry,
        })
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect()
}
