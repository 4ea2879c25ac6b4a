//! Raw, partially-filled user input for each record kind.
//!
//! Every field is kept as the string the user typed. `None` means the field
//! was never provided, `Some("")` means it was left empty; the normalizer
//! treats both the same way.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExerciseDraft {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
    #[serde(rename = "duration")]
    pub duration_minutes: Option<String>,
    #[serde(rename = "distance")]
    pub distance_km: Option<String>,
    pub calories_burned: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MacrosDraft {
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbohydrates: Option<String>,
    pub fat: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionDraft {
    pub food_name: Option<String>,
    pub serving_size: Option<String>,
    pub serving_unit: Option<String>,
    pub meal_type: Option<String>,
    pub macros: MacrosDraft,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GoalDraft {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub current_value: Option<String>,
    pub target_value: Option<String>,
    pub unit: Option<String>,
    pub target_date: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressDraft {
    #[serde(rename = "metric_type")]
    pub metric_kind: Option<String>,
    pub value: Option<String>,
    pub unit: Option<String>,
}

/// A draft of any record kind
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Draft {
    Exercise(ExerciseDraft),
    Nutrition(NutritionDraft),
    Goal(GoalDraft),
    Progress(ProgressDraft),
}

impl Draft {
    pub fn label(&self) -> &'static str {
        match self {
            Draft::Exercise(_) => "exercise",
            Draft::Nutrition(_) => "nutrition entry",
            Draft::Goal(_) => "goal",
            Draft::Progress(_) => "progress sample",
        }
    }
}
