//! Dashboard snapshot assembly.
//!
//! Turns the four fetched collections into the read model a view renders.
//! This is a pure transform: callers fetch, this module only sorts, slices
//! and sums. Being stateless it is safe to call with a stale collection from
//! an older refresh; the result is merely stale too.

use crate::macros::{aggregate_macros, ReportingWindow};
use crate::progress::goal_progress;
use crate::types::{DashboardCollections, DashboardSnapshot};
use chrono::{DateTime, Utc};

/// How many records of each kind the snapshot keeps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotLimits {
    pub recent_exercises: usize,
    pub recent_nutrition: usize,
    pub recent_progress: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self {
            recent_exercises: 5,
            recent_nutrition: 10,
            recent_progress: 10,
        }
    }
}

/// Build a snapshot from already-fetched collections
///
/// Daily macros are computed over every fetched nutrition entry inside
/// `window`, before the nutrition slice is cut.
pub fn assemble_snapshot(
    collections: DashboardCollections,
    window: &ReportingWindow,
    limits: &SnapshotLimits,
) -> DashboardSnapshot {
    let DashboardCollections {
        recent_exercises,
        recent_nutrition,
        active_goals,
        recent_progress,
    } = collections;

    let daily_macros = aggregate_macros(&recent_nutrition, window);

    let snapshot = DashboardSnapshot {
        daily_macros,
        recent_exercises: most_recent(recent_exercises, limits.recent_exercises, |e| e.logged_at),
        recent_nutrition: most_recent(recent_nutrition, limits.recent_nutrition, |n| n.logged_at),
        active_goals: active_goals.into_iter().map(goal_progress).collect(),
        recent_progress: most_recent(recent_progress, limits.recent_progress, |p| p.logged_at),
    };

    tracing::debug!(
        "Assembled snapshot: {} exercises, {} meals, {} goals, {} progress samples",
        snapshot.recent_exercises.len(),
        snapshot.recent_nutrition.len(),
        snapshot.active_goals.len(),
        snapshot.recent_progress.len()
    );

    snapshot
}

/// Newest first, ties kept in input order, cut to `limit`
fn most_recent<T, F>(mut records: Vec<T>, limit: usize, logged_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    // sort_by is stable, so equal timestamps keep their original order
    records.sort_by(|a, b| logged_at(b).cmp(&logged_at(a)));
    records.truncate(limit);
    records
}
