//! Filtering and searching over a village snapshot.
//!
//! Pure derivations: given a snapshot, a free-text query, and a status
//! filter, produce the display list. Cheap enough to recompute on every
//! snapshot or filter change at the expected data volumes (tens to low
//! thousands of records), so nothing is cached.

use crate::types::{Status, Village};

/// Status criterion for the map and dashboard lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Match every status, including unknown ones.
    #[default]
    All,
    /// Match exactly one status.
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

/// Sort order for the parent-contact directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    VillageName,
    /// First contact's name; villages without contacts sort first.
    ParentName,
}

/// Lowercased search needle. Only a whitespace-only query collapses to
/// empty; otherwise the query is matched as typed, padding included.
fn search_needle(query: &str) -> String {
    if query.trim().is_empty() {
        String::new()
    } else {
        query.to_lowercase()
    }
}

/// The ordered sub-sequence of `villages` whose name contains `query` as a
/// case-insensitive substring and whose status passes `filter`.
///
/// A whitespace-only query matches everything. Original order is preserved.
pub fn filter_villages(villages: &[Village], query: &str, filter: StatusFilter) -> Vec<Village> {
    let needle = search_needle(query);
    villages
        .iter()
        .filter(|v| filter.matches(v.status))
        .filter(|v| needle.is_empty() || v.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Directory search: matches the query against the village name or any
/// parent's name or contact, then sorts by `sort` (stable, ties keep
/// original order).
pub fn directory_search(villages: &[Village], query: &str, sort: SortKey) -> Vec<Village> {
    let needle = search_needle(query);
    let mut results: Vec<Village> = villages
        .iter()
        .filter(|v| needle.is_empty() || matches_directory(v, &needle))
        .cloned()
        .collect();

    // sort_by_cached_key is stable, which keeps equal keys in snapshot order.
    results.sort_by_cached_key(|v| sort_field(v, sort).to_lowercase());
    results
}

fn matches_directory(village: &Village, needle: &str) -> bool {
    village.name.to_lowercase().contains(needle)
        || village.parents.iter().any(|p| {
            p.name.to_lowercase().contains(needle) || p.contact.to_lowercase().contains(needle)
        })
}

fn sort_field(village: &Village, sort: SortKey) -> &str {
    match sort {
        SortKey::VillageName => &village.name,
        SortKey::ParentName => village
            .parents
            .first()
            .map(|p| p.name.as_str())
            .unwrap_or(""),
    }
}

/// The most recently visited villages for the activity feed: those with a
/// last-interaction date, newest first, at most `limit`.
///
/// ISO dates order lexicographically, so no date parsing is needed; ties
/// keep snapshot order (stable sort).
pub fn recent_activity(villages: &[Village], limit: usize) -> Vec<Village> {
    let mut recent: Vec<Village> = villages
        .iter()
        .filter(|v| v.last_interaction.as_deref().is_some_and(|d| !d.is_empty()))
        .cloned()
        .collect();
    recent.sort_by(|a, b| b.last_interaction.cmp(&a.last_interaction));
    recent.truncate(limit);
    recent
}

/// Every date the interaction calendar marks: last interactions and next
/// visit targets across the snapshot, deduplicated and sorted.
pub fn marked_dates(villages: &[Village]) -> Vec<String> {
    let mut dates: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
    for village in villages {
        for date in [&village.last_interaction, &village.next_visit_target] {
            if let Some(date) = date.as_deref() {
                if !date.is_empty() {
                    dates.insert(date);
                }
            }
        }
    }
    dates.into_iter().map(str::to_string).collect()
}
