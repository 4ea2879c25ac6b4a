//! Goal completion ratios.

use crate::types::{Goal, GoalProgress};

/// Completion of `current` towards `target`, clamped to `[0, 1]`
///
/// Overshooting a target reads as complete and a negative quotient reads as
/// no progress. The normalizer guarantees a non-zero target; if one slips
/// through anyway the quotient is not finite and the ratio is 0.
pub fn progress_ratio(current: f64, target: f64) -> f64 {
    let ratio = current / target;
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }
    ratio.min(1.0)
}

/// Ratio scaled to a percentage for display
pub fn as_percent(ratio: f64) -> f64 {
    ratio * 100.0
}

/// Annotate a goal with its progress ratio
pub fn goal_progress(goal: Goal) -> GoalProgress {
    let progress_ratio = progress_ratio(goal.current_value, goal.target_value);
    GoalProgress {
        goal,
        progress_ratio,
    }
}
