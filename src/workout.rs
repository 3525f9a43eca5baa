//! Rule-based workout generation.
//!
//! Given a [`UserProfile`], selects exercises from the catalog and prescribes
//! sets, reps, and rest for each one.
//!
//! # Selection Pipeline
//!
//! ```text
//! equipment + level filter ──▶ PPL day narrowing ──▶ < 5 left? ──▶ level-only pool
//!                                                                       │
//!        ┌──────────────────────────────────────────────────────────────┘
//!        ▼
//! compound / isolation split (60 / 40 of target) ──▶ sample ──▶ backfill ──▶ shuffle
//!        │
//!        └──▶ nothing selected? sample the whole catalog
//! ```
//!
//! The target count is `duration / 10` clamped to `[3, 8]`. All randomness
//! comes from the caller's [`Rng`], so a seeded generator gives a
//! reproducible workout.
//!
//! Backfill draws are independent of the first draws, so when a subset is
//! small the same exercise can appear twice.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::calories::{estimate_calories, CalorieInput, ExerciseType};
use crate::catalog::Catalog;
use crate::error::FitError;
use crate::models::{ExerciseRecord, UserProfile, Workout, WorkoutExercise};

const LEG_MUSCLES: [&str; 4] = ["quadriceps", "hamstrings", "calves", "glutes"];

/// Below this many candidates the equipment constraint is dropped.
const MIN_POOL_SIZE: usize = 5;

const MIN_EXERCISES: u32 = 3;
const MAX_EXERCISES: u32 = 8;
const MINUTES_PER_EXERCISE: u32 = 10;

const PUSH_DESCRIPTION: &str = "Focus on chest, shoulders, and triceps with movements that involve pushing weight away from your body.";
const PULL_DESCRIPTION: &str =
    "Focus on back and biceps with movements that involve pulling weight toward your body.";
const LEGS_DESCRIPTION: &str = "Focus on quadriceps, hamstrings, glutes, and calves to build lower body strength and power.";

/// Training goal, parsed case-insensitively from the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Strength,
    /// "muscle building" or "hypertrophy".
    Hypertrophy,
    FatLoss,
    Endurance,
    Other,
}

impl Goal {
    pub fn parse(goal: &str) -> Self {
        match goal.to_lowercase().as_str() {
            "strength" => Goal::Strength,
            "muscle building" | "hypertrophy" => Goal::Hypertrophy,
            "fat loss" => Goal::FatLoss,
            "endurance" => Goal::Endurance,
            _ => Goal::Other,
        }
    }
}

/// Sets, reps, and rest for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub sets: u32,
    pub reps: &'static str,
    pub rest_seconds: u32,
}

/// Looks up the prescription for a goal and mechanic. Anything that is not
/// a compound movement uses the isolation row.
pub fn prescribe(goal: Goal, compound: bool) -> Prescription {
    let (sets, reps, rest_seconds) = match (goal, compound) {
        (Goal::Strength, true) => (5, "4-6", 180),
        (Goal::Strength, false) => (3, "6-8", 120),
        (Goal::Hypertrophy, true) => (4, "8-12", 90),
        (Goal::Hypertrophy, false) => (3, "8-12", 60),
        (Goal::FatLoss, _) => (3, "12-15", 45),
        (Goal::Endurance, _) => (3, "15-20", 30),
        (Goal::Other, _) => (3, "10-12", 60),
    };
    Prescription {
        sets,
        reps,
        rest_seconds,
    }
}

/// Number of exercises for a session of `duration` minutes.
pub fn target_exercise_count(duration: u32) -> usize {
    (duration / MINUTES_PER_EXERCISE).clamp(MIN_EXERCISES, MAX_EXERCISES) as usize
}

/// Desired (compound, isolation) counts: 60% compound rounded down, at
/// least one.
pub fn split_counts(target: usize) -> (usize, usize) {
    let compound = (target * 6 / 10).max(1);
    (compound, target.saturating_sub(compound))
}

/// Generate a workout for `profile` from `catalog`.
///
/// # Errors
///
/// Returns [`FitError::Workout`] for a zero duration. No partial workout is
/// ever returned.
pub fn generate_workout<R: Rng + ?Sized>(
    catalog: &Catalog,
    profile: &UserProfile,
    rng: &mut R,
) -> Result<Workout, FitError> {
    if profile.duration == 0 {
        return Err(FitError::Workout(
            "duration must be a positive number of minutes".to_string(),
        ));
    }

    let goal_text = profile.goal.to_lowercase();
    let level = profile.level.to_lowercase();
    let split_type = profile.split_type.to_lowercase();
    let day = profile
        .day
        .as_deref()
        .map(str::to_lowercase)
        .filter(|d| !d.is_empty());
    let goal = Goal::parse(&goal_text);

    let mut pool = narrow_by_day(
        catalog
            .exercises()
            .iter()
            .filter(|ex| profile.equipment.contains(&ex.equipment) && ex.level == level)
            .collect(),
        &split_type,
        day.as_deref(),
    );

    if pool.len() < MIN_POOL_SIZE {
        tracing::debug!(
            matched = pool.len(),
            "too few exercises for equipment; using level-only pool"
        );
        pool = narrow_by_day(
            catalog
                .exercises()
                .iter()
                .filter(|ex| ex.level == level)
                .collect(),
            &split_type,
            day.as_deref(),
        );
    }

    let target = target_exercise_count(profile.duration);
    let mut selected = select_exercises(&pool, target, rng);

    if selected.is_empty() {
        tracing::debug!("no candidates selected; sampling the whole catalog");
        selected = catalog
            .exercises()
            .choose_multiple(rng, target)
            .collect();
    }

    let exercises: Vec<WorkoutExercise> = selected
        .into_iter()
        .map(|ex| to_workout_exercise(ex, goal))
        .collect();

    let title = match &day {
        Some(d) => capitalize(d),
        None => capitalize(&split_type),
    };
    let name = format!("{} Workout for {}", title, capitalize(&goal_text));
    let description = match day.as_deref() {
        Some("push") => PUSH_DESCRIPTION.to_string(),
        Some("pull") => PULL_DESCRIPTION.to_string(),
        Some("legs") => LEGS_DESCRIPTION.to_string(),
        _ => format!(
            "A {} workout designed to help you achieve your {} goals.",
            split_type, goal_text
        ),
    };

    let estimated_calories = estimate_calories(
        ExerciseType::from(goal),
        &CalorieInput {
            duration_minutes: profile.duration,
            exercise_count: exercises.len(),
            level: &level,
            weight_kg: profile.weight_kg,
            age: profile.age,
            gender: profile.gender.as_deref(),
        },
    );

    tracing::debug!(
        pool = pool.len(),
        target,
        selected = exercises.len(),
        "workout generated"
    );

    Ok(Workout {
        name,
        description,
        goal: goal_text,
        level,
        workout_type: day.unwrap_or(split_type),
        duration: profile.duration,
        exercises,
        estimated_calories,
    })
}

/// Restrict a PPL pool to the requested day. Other splits and unknown days
/// pass through unchanged.
fn narrow_by_day<'a>(
    pool: Vec<&'a ExerciseRecord>,
    split_type: &str,
    day: Option<&str>,
) -> Vec<&'a ExerciseRecord> {
    if split_type != "ppl" {
        return pool;
    }
    match day {
        Some("push") => pool.into_iter().filter(|ex| ex.force == "push").collect(),
        Some("pull") => pool.into_iter().filter(|ex| ex.force == "pull").collect(),
        Some("legs") => pool
            .into_iter()
            .filter(|ex| {
                ex.primary_muscles
                    .iter()
                    .any(|m| LEG_MUSCLES.contains(&m.as_str()))
            })
            .collect(),
        _ => pool,
    }
}

/// Sample the compound/isolation split from `pool`, backfill shortfalls from
/// the other subset (compound first), and shuffle.
fn select_exercises<'a, R: Rng + ?Sized>(
    pool: &[&'a ExerciseRecord],
    target: usize,
    rng: &mut R,
) -> Vec<&'a ExerciseRecord> {
    let compound: Vec<&ExerciseRecord> =
        pool.iter().copied().filter(|ex| ex.is_compound()).collect();
    let isolation: Vec<&ExerciseRecord> =
        pool.iter().copied().filter(|ex| ex.is_isolation()).collect();

    let (want_compound, want_isolation) = split_counts(target);

    let mut picked_compound = sample(&compound, want_compound, rng);
    let mut picked_isolation = sample(&isolation, want_isolation, rng);

    if picked_compound.len() < want_compound && !isolation.is_empty() {
        let shortfall = want_compound - picked_compound.len();
        picked_compound.extend(sample(&isolation, shortfall, rng));
    }

    if picked_isolation.len() < want_isolation && !compound.is_empty() {
        let shortfall = want_isolation - picked_isolation.len();
        picked_isolation.extend(sample(&compound, shortfall, rng));
    }

    let mut selected = picked_compound;
    selected.extend(picked_isolation);
    selected.shuffle(rng);
    selected
}

fn sample<'a, R: Rng + ?Sized>(
    items: &[&'a ExerciseRecord],
    amount: usize,
    rng: &mut R,
) -> Vec<&'a ExerciseRecord> {
    items.choose_multiple(rng, amount).copied().collect()
}

fn to_workout_exercise(ex: &ExerciseRecord, goal: Goal) -> WorkoutExercise {
    let p = prescribe(goal, ex.is_compound());
    WorkoutExercise {
        id: ex.id.clone(),
        name: ex.name.clone(),
        sets: p.sets,
        reps: p.reps.to_string(),
        rest_seconds: p.rest_seconds,
        equipment: ex.equipment.clone(),
        primary_muscles: ex.primary_muscles.clone(),
        instructions: ex.instructions.clone(),
        images: ex.images.clone(),
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
