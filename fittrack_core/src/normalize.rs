//! Draft → record normalization, one pure function per record kind.
//!
//! Normalization never touches the network and never reads the clock: the
//! timestamp stamped onto the record is passed in. A draft either becomes a
//! complete record or is rejected with a [`ValidationError`] naming the field.
//!
//! Field rules per kind:
//! - **Exercise**: only the selected kind's numeric fields survive. Empty or
//!   absent fields are left out entirely rather than written as zero, so a
//!   blank weight never overwrites a real one downstream.
//! - **Nutrition**: empty macros become 0, because the daily totals sum over
//!   every entry.
//! - **Goal**: a target that coerces to zero is rejected; progress is a
//!   division by it.
//! - **Progress**: value is required.

use chrono::{DateTime, Utc};

use crate::coerce::{coerce_count, coerce_non_negative, coerce_number, coerce_positive, non_empty};
use crate::draft::{Draft, ExerciseDraft, GoalDraft, NutritionDraft, ProgressDraft};
use crate::error::{ValidationError, ValidationReason};
use crate::types::{
    Exercise, ExerciseDetails, ExerciseKind, FoodCandidate, Goal, GoalKind, Macros, MealType,
    MetricKind, NutritionEntry, ProgressSample, Record, ServingUnit,
};
use crate::wire;

type Normalized<T> = std::result::Result<T, ValidationError>;

const DEFAULT_UNIT: &str = "kg";

/// Normalize a draft of any kind into a submittable record
pub fn normalize(draft: &Draft, now: DateTime<Utc>) -> Normalized<Record> {
    match draft {
        Draft::Exercise(d) => normalize_exercise(d, now).map(Record::Exercise),
        Draft::Nutrition(d) => normalize_nutrition(d, now).map(Record::Nutrition),
        Draft::Goal(d) => normalize_goal(d, now).map(Record::Goal),
        Draft::Progress(d) => normalize_progress(d, now).map(Record::Progress),
    }
}

pub fn normalize_exercise(draft: &ExerciseDraft, now: DateTime<Utc>) -> Normalized<Exercise> {
    let name = required_text("name", draft.name.as_deref())?;
    let kind = required_variant("type", draft.kind.as_deref(), ExerciseKind::parse)?;

    let details = match kind {
        ExerciseKind::Strength => {
            strip_fields(kind, &[("duration", &draft.duration_minutes), ("distance", &draft.distance_km)]);
            ExerciseDetails::Strength {
                sets: coerce_count("sets", draft.sets.as_deref())?,
                reps: coerce_count("reps", draft.reps.as_deref())?,
                weight: coerce_non_negative("weight", draft.weight.as_deref())?,
            }
        }
        ExerciseKind::Cardio => {
            strip_fields(
                kind,
                &[("sets", &draft.sets), ("reps", &draft.reps), ("weight", &draft.weight)],
            );
            ExerciseDetails::Cardio {
                duration_minutes: coerce_count("duration", draft.duration_minutes.as_deref())?,
                distance_km: coerce_non_negative("distance", draft.distance_km.as_deref())?,
            }
        }
        ExerciseKind::Flexibility => {
            strip_fields(
                kind,
                &[
                    ("sets", &draft.sets),
                    ("reps", &draft.reps),
                    ("weight", &draft.weight),
                    ("duration", &draft.duration_minutes),
                    ("distance", &draft.distance_km),
                ],
            );
            ExerciseDetails::Flexibility
        }
    };

    Ok(Exercise {
        name,
        details,
        calories_burned: coerce_non_negative("calories_burned", draft.calories_burned.as_deref())?,
        notes: non_empty(draft.notes.as_deref()).map(str::to_string),
        logged_at: now,
    })
}

pub fn normalize_nutrition(draft: &NutritionDraft, now: DateTime<Utc>) -> Normalized<NutritionEntry> {
    let food_name = required_text("food_name", draft.food_name.as_deref())?;
    let serving_size = coerce_positive("serving_size", draft.serving_size.as_deref())?
        .ok_or_else(|| ValidationError::missing("serving_size"))?;
    let serving_unit = match non_empty(draft.serving_unit.as_deref()) {
        Some(raw) => ServingUnit::parse(raw).ok_or_else(|| unknown("serving_unit", raw))?,
        None => ServingUnit::G,
    };
    let meal_type = required_variant("meal_type", draft.meal_type.as_deref(), MealType::parse)?;

    let m = &draft.macros;
    let macros = Macros {
        calories: coerce_non_negative("calories", m.calories.as_deref())?.unwrap_or(0.0),
        protein: coerce_non_negative("protein", m.protein.as_deref())?.unwrap_or(0.0),
        carbohydrates: coerce_non_negative("carbohydrates", m.carbohydrates.as_deref())?
            .unwrap_or(0.0),
        fat: coerce_non_negative("fat", m.fat.as_deref())?.unwrap_or(0.0),
    };

    Ok(NutritionEntry {
        food_name,
        serving_size,
        serving_unit,
        meal_type,
        macros,
        logged_at: now,
    })
}

pub fn normalize_goal(draft: &GoalDraft, now: DateTime<Utc>) -> Normalized<Goal> {
    let kind = required_variant("type", draft.kind.as_deref(), GoalKind::parse)?;
    let current_value = coerce_number("current_value", draft.current_value.as_deref())?
        .ok_or_else(|| ValidationError::missing("current_value"))?;
    let target_value = coerce_number("target_value", draft.target_value.as_deref())?
        .ok_or_else(|| ValidationError::missing("target_value"))?;

    if target_value == 0.0 {
        return Err(ValidationError::new("target_value", ValidationReason::Zero));
    }

    let target_date = match non_empty(draft.target_date.as_deref()) {
        Some(raw) => Some(wire::parse_date(raw).ok_or_else(|| {
            ValidationError::new("target_date", ValidationReason::InvalidDate(raw.to_string()))
        })?),
        None => None,
    };

    Ok(Goal {
        kind,
        current_value,
        target_value,
        unit: unit_or_default(draft.unit.as_deref()),
        target_date,
        created_at: now,
    })
}

pub fn normalize_progress(draft: &ProgressDraft, now: DateTime<Utc>) -> Normalized<ProgressSample> {
    let metric_kind = required_variant("metric_type", draft.metric_kind.as_deref(), MetricKind::parse)?;
    let value = coerce_number("value", draft.value.as_deref())?
        .ok_or_else(|| ValidationError::missing("value"))?;

    Ok(ProgressSample {
        metric_kind,
        value,
        unit: unit_or_default(draft.unit.as_deref()),
        logged_at: now,
    })
}

/// Pre-fill a nutrition draft from a food search result
///
/// Search results carry macros per 100 g. They are copied as-is; nothing is
/// rescaled by the draft's serving size.
pub fn apply_food_candidate(draft: &mut NutritionDraft, food: &FoodCandidate) {
    draft.food_name = Some(food.name.clone());
    draft.macros.calories = Some(food.calories_per_100g.to_string());
    draft.macros.protein = Some(food.protein.to_string());
    draft.macros.carbohydrates = Some(food.carbs.to_string());
    draft.macros.fat = Some(food.fat.to_string());
}

fn required_text(field: &'static str, raw: Option<&str>) -> Normalized<String> {
    non_empty(raw)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::missing(field))
}

fn required_variant<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Normalized<T> {
    let raw = non_empty(raw).ok_or_else(|| ValidationError::missing(field))?;
    parse(raw).ok_or_else(|| unknown(field, raw))
}

fn unknown(field: &'static str, raw: &str) -> ValidationError {
    ValidationError::new(field, ValidationReason::UnknownVariant(raw.to_string()))
}

fn unit_or_default(raw: Option<&str>) -> String {
    non_empty(raw).unwrap_or(DEFAULT_UNIT).to_string()
}

fn strip_fields(kind: ExerciseKind, fields: &[(&str, &Option<String>)]) {
    for (name, value) in fields {
        if non_empty(value.as_deref()).is_some() {
            tracing::debug!("Dropping `{}` from {:?} exercise", name, kind);
        }
    }
}
