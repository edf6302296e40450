//! Splits a fetched batch into new and already-seen entries.

use crate::seen::SeenSet;
use crate::source::FeedItem;

/// Outcome of [`reconcile`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Entries whose identity was not in the seen-set, in feed order.
    pub items: Vec<FeedItem>,
    pub has_new_items: bool,
}

/// Keep only the entries of `raw_items` not yet in `seen`, and record them.
///
/// Walks the batch in order and checks each [`FeedItem::identity`] against
/// the store as it goes, so a repeated identity inside the same batch counts
/// once.  Already-seen entries are dropped.
pub fn reconcile(raw_items: Vec<FeedItem>, seen: &mut SeenSet) -> Reconciled {
    let items: Vec<FeedItem> = raw_items
        .into_iter()
        .filter(|item| seen.insert(item.identity()))
        .collect();

    Reconciled {
        has_new_items: !items.is_empty(),
        items,
    }
}
