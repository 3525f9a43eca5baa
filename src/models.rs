//! Core data models used throughout FitGenie.
//!
//! These types represent the exercises, profiles, and generated workouts that
//! flow between the catalog, the generator, the coach, and the HTTP layer.
//! JSON field names follow the exercise dataset's column names.

use serde::{Deserialize, Deserializer, Serialize};

/// A single exercise from the catalog.
///
/// Immutable once loaded. Fields missing from the source data are empty
/// strings or empty lists, never errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub force: String,
    pub level: String,
    pub mechanic: String,
    pub equipment: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub instructions: Vec<String>,
    pub category: String,
    pub images: Vec<String>,
}

impl ExerciseRecord {
    /// Whether the exercise is a multi-joint movement.
    pub fn is_compound(&self) -> bool {
        self.mechanic == "compound"
    }

    /// Whether the exercise is a single-joint movement.
    pub fn is_isolation(&self) -> bool {
        self.mechanic == "isolation"
    }

    /// Text summary fed to the embedding provider for this exercise.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.category,
            self.primary_muscles.join(" "),
            self.equipment
        )
    }
}

/// Conjunctive filter for listing exercises.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseFilter {
    pub equipment: Option<String>,
    pub level: Option<String>,
    pub muscle: Option<String>,
    /// An empty value (`?limit=`) means the default of 50.
    #[serde(default = "default_limit", deserialize_with = "deserialize_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

fn deserialize_limit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default_limit()),
        Some(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

impl Default for ExerciseFilter {
    fn default() -> Self {
        Self {
            equipment: None,
            level: None,
            muscle: None,
            limit: default_limit(),
        }
    }
}

/// Request body for workout generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub goal: String,
    pub level: String,
    pub equipment: Vec<String>,
    /// Session length in minutes.
    pub duration: u32,
    pub split_type: String,
    #[serde(default)]
    pub day: Option<String>,
    /// Free text; not used by generation.
    #[serde(default)]
    pub limitations: Option<String>,
    /// Body weight, required for the calorie estimate.
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// One prescribed exercise inside a [`Workout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: u32,
    pub equipment: String,
    #[serde(rename = "primaryMuscles")]
    pub primary_muscles: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A generated workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    pub description: String,
    pub goal: String,
    pub level: String,
    /// The PPL day when one was requested, otherwise the split type.
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration: u32,
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_calories: Option<u32>,
}

/// Request body for `POST /api/ask-coach`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachRequest {
    pub query: String,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

/// Coach answer. `relevant_exercises` is only present when the answer was
/// produced by embedding retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_exercises: Option<Vec<ExerciseRecord>>,
}
