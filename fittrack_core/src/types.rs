//! Core domain types for FitTrack.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise, nutrition, goal and progress records
//! - The four collections fetched from the remote store
//! - The derived dashboard snapshot
//! - Advice service request/response shapes

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::wire;

// ============================================================================
// Exercise
// ============================================================================

/// Type of exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Strength,
    Cardio,
    Flexibility,
}

impl ExerciseKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Some(ExerciseKind::Strength),
            "cardio" => Some(ExerciseKind::Cardio),
            "flexibility" => Some(ExerciseKind::Flexibility),
            _ => None,
        }
    }
}

/// Kind-specific exercise fields
///
/// Only the fields meaningful for a kind exist on its variant, so a cardio
/// record can never carry a weight. Unset fields are left out of the JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseDetails {
    Strength {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sets: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reps: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
    Cardio {
        #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
        duration_minutes: Option<u32>,
        #[serde(rename = "distance", default, skip_serializing_if = "Option::is_none")]
        distance_km: Option<f64>,
    },
    Flexibility,
}

impl ExerciseDetails {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseDetails::Strength { .. } => ExerciseKind::Strength,
            ExerciseDetails::Cardio { .. } => ExerciseKind::Cardio,
            ExerciseDetails::Flexibility => ExerciseKind::Flexibility,
        }
    }
}

/// A logged exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(flatten)]
    pub details: ExerciseDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "date", deserialize_with = "wire::timestamp")]
    pub logged_at: DateTime<Utc>,
}

impl Exercise {
    pub fn kind(&self) -> ExerciseKind {
        self.details.kind()
    }
}

// ============================================================================
// Nutrition
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServingUnit {
    G,
    Oz,
    Cup,
    Piece,
}

impl ServingUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(ServingUnit::G),
            "oz" => Some(ServingUnit::Oz),
            "cup" | "cups" => Some(ServingUnit::Cup),
            "piece" | "pieces" => Some(ServingUnit::Piece),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// Macro-nutrient content of one nutrition entry
///
/// Unset values are real zeros here: the daily totals sum over them.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub calories: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub carbohydrates: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub fat: f64,
}

/// A logged food item
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionEntry {
    pub food_name: String,
    pub serving_size: f64,
    pub serving_unit: ServingUnit,
    pub meal_type: MealType,
    pub macros: Macros,
    #[serde(rename = "date", deserialize_with = "wire::timestamp")]
    pub logged_at: DateTime<Utc>,
}

/// A food search result, macros given per 100 g
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodCandidate {
    pub name: String,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub calories_per_100g: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub protein: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "wire::null_as_zero")]
    pub fat: f64,
}

// ============================================================================
// Goals and progress
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    WeightLoss,
    MuscleGain,
    Endurance,
    Strength,
}

impl GoalKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "weight_loss" => Some(GoalKind::WeightLoss),
            "muscle_gain" => Some(GoalKind::MuscleGain),
            "endurance" => Some(GoalKind::Endurance),
            "strength" => Some(GoalKind::Strength),
            _ => None,
        }
    }
}

/// A body-metric or performance goal
///
/// `target_value` is never zero for a goal built by the normalizer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::date_as_midnight",
        deserialize_with = "wire::opt_date"
    )]
    pub target_date: Option<NaiveDate>,
    #[serde(deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Weight,
    BodyFat,
    MuscleMass,
}

impl MetricKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "weight" => Some(MetricKind::Weight),
            "body_fat" => Some(MetricKind::BodyFat),
            "muscle_mass" => Some(MetricKind::MuscleMass),
            _ => None,
        }
    }
}

/// A single body-metric measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressSample {
    #[serde(rename = "metric_type")]
    pub metric_kind: MetricKind,
    pub value: f64,
    pub unit: String,
    #[serde(rename = "date", deserialize_with = "wire::timestamp")]
    pub logged_at: DateTime<Utc>,
}

// ============================================================================
// Records and collections
// ============================================================================

/// A normalized record ready for submission
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Record {
    Exercise(Exercise),
    Nutrition(NutritionEntry),
    Goal(Goal),
    Progress(ProgressSample),
}

impl Record {
    /// Collection path on the remote service
    pub fn endpoint(&self) -> &'static str {
        match self {
            Record::Exercise(_) => "exercises",
            Record::Nutrition(_) => "nutrition",
            Record::Goal(_) => "goals",
            Record::Progress(_) => "progress",
        }
    }
}

/// The four raw collections returned by the remote dashboard endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DashboardCollections {
    #[serde(default, alias = "exercises")]
    pub recent_exercises: Vec<Exercise>,
    #[serde(default, alias = "nutrition")]
    pub recent_nutrition: Vec<NutritionEntry>,
    #[serde(default, alias = "goals")]
    pub active_goals: Vec<Goal>,
    #[serde(default, alias = "progress")]
    pub recent_progress: Vec<ProgressSample>,
}

// ============================================================================
// Derived read model
// ============================================================================

/// Summed macros for a reporting window
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyMacros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A goal annotated with its clamped completion ratio
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_ratio: f64,
}

/// Read model for one dashboard render
///
/// Rebuilt from fetched collections on every load; never stored.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct DashboardSnapshot {
    pub daily_macros: DailyMacros,
    pub recent_exercises: Vec<Exercise>,
    pub recent_nutrition: Vec<NutritionEntry>,
    pub active_goals: Vec<GoalProgress>,
    pub recent_progress: Vec<ProgressSample>,
}

// ============================================================================
// Advice service
// ============================================================================

/// What the advice service is asked about
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    WorkoutRecommendation,
    NutritionAdvice,
    ProgressAnalysis,
}

impl InsightCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "workout_recommendation" | "workout" => Some(InsightCategory::WorkoutRecommendation),
            "nutrition_advice" | "nutrition" => Some(InsightCategory::NutritionAdvice),
            "progress_analysis" | "progress" => Some(InsightCategory::ProgressAnalysis),
            _ => None,
        }
    }
}

/// The recent-activity slices shared with the advice service
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InsightUserData {
    pub recent_exercises: Vec<Exercise>,
    pub recent_nutrition: Vec<NutritionEntry>,
    pub goals: Vec<GoalProgress>,
    pub progress: Vec<ProgressSample>,
}

/// Request body for the advice service
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InsightRequest {
    pub request_type: InsightCategory,
    pub user_data: InsightUserData,
}

/// Response body from the advice service
#[derive(Clone, Debug, Deserialize)]
pub struct InsightResponse {
    pub advice: String,
    /// Set when the service itself could not produce advice
    #[serde(default)]
    pub error: bool,
}
