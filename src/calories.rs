//! Calorie estimate for a generated workout, based on MET values.
//!
//! `calories = MET × weight_kg × hours`, where the MET value depends on the
//! kind of training and the trainee's level and is adjusted for exercise
//! variety, age, and gender.

use crate::workout::Goal;

/// Kind of training used to pick a MET row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    Strength,
    Cardio,
    Mixed,
    GeneralFitness,
}

impl From<Goal> for ExerciseType {
    fn from(goal: Goal) -> Self {
        match goal {
            Goal::Strength | Goal::Hypertrophy => ExerciseType::Strength,
            Goal::Endurance => ExerciseType::Cardio,
            Goal::FatLoss => ExerciseType::Mixed,
            Goal::Other => ExerciseType::GeneralFitness,
        }
    }
}

/// Inputs to [`estimate_calories`].
#[derive(Debug, Clone, Default)]
pub struct CalorieInput<'a> {
    pub duration_minutes: u32,
    pub exercise_count: usize,
    pub level: &'a str,
    pub weight_kg: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<&'a str>,
}

/// MET value for beginner / intermediate / advanced / expert.
fn base_met(kind: ExerciseType, level: &str) -> f64 {
    let row = match kind {
        ExerciseType::Strength => [3.0, 4.5, 6.0, 6.0],
        ExerciseType::Cardio => [4.0, 7.0, 10.0, 10.0],
        ExerciseType::Mixed => [3.5, 5.5, 8.0, 8.0],
        ExerciseType::GeneralFitness => [3.5, 5.0, 6.5, 6.5],
    };
    match level {
        "intermediate" => row[1],
        "advanced" => row[2],
        "expert" => row[3],
        _ => row[0],
    }
}

/// Estimated kcal burned, or `None` without a body weight or with a zero
/// duration.
pub fn estimate_calories(kind: ExerciseType, input: &CalorieInput<'_>) -> Option<u32> {
    let weight = input.weight_kg.filter(|w| *w > 0.0)?;
    if input.duration_minutes == 0 {
        return None;
    }

    let variety_bonus = (input.exercise_count as f64 * 0.05).min(1.0);

    let age_adjustment = match input.age {
        Some(age) if age > 50 => 0.9,
        Some(age) if age > 40 => 0.95,
        _ => 1.0,
    };

    let gender_adjustment = match input.gender {
        Some(g) if g.eq_ignore_ascii_case("female") => 0.9,
        _ => 1.0,
    };

    let met =
        base_met(kind, input.level) * (1.0 + variety_bonus) * age_adjustment * gender_adjustment;
    let hours = f64::from(input.duration_minutes) / 60.0;

    Some((met * weight * hours).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(level: &str) -> CalorieInput<'_> {
        CalorieInput {
            duration_minutes: 60,
            exercise_count: 0,
            level,
            weight_kg: Some(80.0),
            age: None,
            gender: None,
        }
    }

    #[test]
    fn test_requires_weight() {
        let mut i = input("beginner");
        i.weight_kg = None;
        assert_eq!(estimate_calories(ExerciseType::Strength, &i), None);
    }

    #[test]
    fn test_zero_duration() {
        let mut i = input("beginner");
        i.duration_minutes = 0;
        assert_eq!(estimate_calories(ExerciseType::Strength, &i), None);
    }

    #[test]
    fn test_base_met_times_weight_times_hours() {
        // 4.5 MET × 80 kg × 1 h
        assert_eq!(estimate_calories(ExerciseType::Strength, &input("intermediate")), Some(360));
    }

    #[test]
    fn test_unknown_level_uses_beginner() {
        // 4.0 MET × 80 kg × 1 h
        assert_eq!(estimate_calories(ExerciseType::Cardio, &input("elite")), Some(320));
    }

    #[test]
    fn test_adjustments_compound() {
        let i = CalorieInput {
            exercise_count: 4,
            age: Some(45),
            gender: Some("female"),
            ..input("advanced")
        };
        // 8.0 × 1.2 × 0.95 × 0.9 × 80 × 1 = 656.64
        assert_eq!(estimate_calories(ExerciseType::Mixed, &i), Some(657));
    }

    #[test]
    fn test_variety_bonus_capped() {
        let i = CalorieInput {
            exercise_count: 40,
            ..input("beginner")
        };
        // 3.5 × 2.0 × 80 × 1
        assert_eq!(estimate_calories(ExerciseType::GeneralFitness, &i), Some(560));
    }

    #[test]
    fn test_goal_mapping() {
        assert_eq!(ExerciseType::from(Goal::Hypertrophy), ExerciseType::Strength);
        assert_eq!(ExerciseType::from(Goal::Endurance), ExerciseType::Cardio);
        assert_eq!(ExerciseType::from(Goal::FatLoss), ExerciseType::Mixed);
        assert_eq!(ExerciseType::from(Goal::Other), ExerciseType::GeneralFitness);
    }
}
