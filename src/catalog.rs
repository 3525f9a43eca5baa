//! In-memory exercise catalog.
//!
//! Loaded once at startup and never mutated afterwards. All queries are
//! linear scans in catalog order; position in the catalog is also the
//! position of the exercise's vector in the [`EmbeddingIndex`](crate::index::EmbeddingIndex).

use std::collections::BTreeSet;

use crate::error::FitError;
use crate::models::{ExerciseFilter, ExerciseRecord};

/// Read-only list of exercises.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: Vec<ExerciseRecord>,
}

impl Catalog {
    pub fn new(exercises: Vec<ExerciseRecord>) -> Self {
        Self { exercises }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// All exercises in catalog order.
    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    /// Returns exercises matching every set field of `filter`, truncated to
    /// `filter.limit`. Empty strings count as unset.
    ///
    /// Equipment and level compare for exact equality; the muscle must be a
    /// member of `primaryMuscles`.
    pub fn list_exercises(&self, filter: &ExerciseFilter) -> Vec<&ExerciseRecord> {
        let equipment = non_empty(&filter.equipment);
        let level = non_empty(&filter.level);
        let muscle = non_empty(&filter.muscle);

        self.exercises
            .iter()
            .filter(|ex| equipment.map_or(true, |eq| ex.equipment == eq))
            .filter(|ex| level.map_or(true, |lvl| ex.level == lvl))
            .filter(|ex| muscle.map_or(true, |m| ex.primary_muscles.iter().any(|pm| pm == m)))
            .take(filter.limit)
            .collect()
    }

    /// Looks up an exercise by its identifier.
    pub fn get_exercise(&self, id: &str) -> Result<&ExerciseRecord, FitError> {
        self.exercises
            .iter()
            .find(|ex| ex.id == id)
            .ok_or_else(|| FitError::NotFound("Exercise not found".to_string()))
    }

    /// Distinct non-empty equipment values, sorted.
    pub fn equipment_types(&self) -> Vec<String> {
        self.exercises
            .iter()
            .map(|ex| ex.equipment.as_str())
            .filter(|eq| !eq.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct non-empty primary muscle names, sorted.
    pub fn muscle_groups(&self) -> Vec<String> {
        self.exercises
            .iter()
            .flat_map(|ex| ex.primary_muscles.iter().map(String::as_str))
            .filter(|m| !m.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
