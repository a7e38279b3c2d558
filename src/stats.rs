//! Count-by-status aggregation for the dashboard cards.

use crate::types::{Status, Village};
use serde::Serialize;

/// Aggregate counts over a snapshot.
///
/// Records with an unrecognized status count toward `total` but toward none
/// of the per-status buckets; they are visible as the gap reported by
/// [`StatusCounts::unknown`], never silently re-bucketed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub visited: usize,
    pub planned: usize,
    pub not_visited: usize,
}

impl StatusCounts {
    /// Records whose status fell outside the recognized enum.
    pub fn unknown(&self) -> usize {
        self.total - (self.visited + self.planned + self.not_visited)
    }
}

/// Derive counts from a snapshot.
pub fn count_statuses(villages: &[Village]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: villages.len(),
        ..StatusCounts::default()
    };

    for village in villages {
        match village.status {
            Status::Visited => counts.visited += 1,
            Status::Planned => counts.planned += 1,
            Status::NotVisited => counts.not_visited += 1,
            Status::Unknown => {}
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VillageId;

    fn village(id: &str, name: &str, status: Status) -> Village {
        let mut v = Village::new(name, [1.0, 2.0]);
        v.id = VillageId::new(id);
        v.status = status;
        v
    }

    #[test]
    fn test_counts_two_record_snapshot() {
        let villages = vec![
            village("1", "Alpha", Status::Visited),
            village("2", "Beta", Status::Planned),
        ];
        let counts = count_statuses(&villages);
        assert_eq!(
            counts,
            StatusCounts {
                total: 2,
                visited: 1,
                planned: 1,
                not_visited: 0,
            }
        );
        assert_eq!(counts.unknown(), 0);
    }

    #[test]
    fn test_unknown_status_counts_toward_total_only() {
        let villages = vec![
            village("1", "Alpha", Status::Visited),
            village("2", "Beta", Status::Unknown),
        ];
        let counts = count_statuses(&villages);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.visited, 1);
        assert_eq!(counts.planned + counts.not_visited, 0);
        assert_eq!(counts.unknown(), 1);
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(count_statuses(&[]), StatusCounts::default());
    }
}
