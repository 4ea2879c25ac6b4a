//! Requests to the advice service.
//!
//! The payload holds exactly the snapshot's four recent slices plus the
//! category. Nothing else from the user's history is shared, and empty slices
//! are sent as empty arrays so the service always sees the same shape.

use crate::types::{DashboardSnapshot, InsightCategory, InsightRequest, InsightUserData};

/// Shown in place of advice when the service cannot answer
pub const FALLBACK_ADVICE: &str =
    "Unable to generate insights at this time. Please try again later.";

/// Build the advice request for `category` from a snapshot
pub fn build_insight_request(
    snapshot: &DashboardSnapshot,
    category: InsightCategory,
) -> InsightRequest {
    InsightRequest {
        request_type: category,
        user_data: InsightUserData {
            recent_exercises: snapshot.recent_exercises.clone(),
            recent_nutrition: snapshot.recent_nutrition.clone(),
            goals: snapshot.active_goals.clone(),
            progress: snapshot.recent_progress.clone(),
        },
    }
}
