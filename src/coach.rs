//! Fitness coach answers.
//!
//! Two modes, chosen by whether the service has an embedding index:
//!
//! - **Rule-based**: an ordered keyword table; the first rule whose
//!   keywords all occur in the lower-cased query wins.
//! - **Retrieval**: the query is embedded, the closest catalog exercises
//!   are found by cosine similarity, and the answer is templated from them.

use crate::context::AppContext;
use crate::embedding::embed_query;
use crate::error::FitError;
use crate::models::{CoachResponse, ExerciseRecord};

/// A keyword rule: every `all` keyword must occur, and at least one `any`
/// keyword when `any` is non-empty.
struct Rule {
    all: &'static [&'static str],
    any: &'static [&'static str],
    response: &'static str,
}

impl Rule {
    fn matches(&self, query: &str) -> bool {
        self.all.iter().all(|k| query.contains(k))
            && (self.any.is_empty() || self.any.iter().any(|k| query.contains(k)))
    }
}

pub const CHEST_ADVICE: &str =
    "Bench press, push-ups, and dumbbell flyes are excellent exercises for chest development.";
pub const BACK_ADVICE: &str =
    "Pull-ups, rows, and deadlifts are some of the best exercises for building a strong back.";
pub const LEGS_ADVICE: &str =
    "Squats, deadlifts, and lunges are fundamental exercises for leg strength and growth.";
pub const MUSCLE_GROUP_ADVICE: &str = "For most muscle groups, compound exercises that allow progressive overload are typically most effective.";
pub const SETS_ADVICE: &str = "For most goals, 3-5 sets per exercise is effective. Strength training typically uses fewer sets (3-5) with heavier weights, while hypertrophy training often uses more volume (3-4 sets of multiple exercises).";
pub const REPS_ADVICE: &str = "Rep ranges depend on your goal: Strength: 1-5 reps, Hypertrophy: 8-12 reps, Endurance: 15+ reps. These are guidelines, as there's overlap between adaptations.";
pub const REST_ADVICE: &str = "Rest periods should be based on your goal: Strength: 3-5 minutes, Hypertrophy: 1-2 minutes, Endurance: 30-60 seconds between sets.";
pub const PROTEIN_ADVICE: &str = "Most research suggests consuming 1.6-2.2g of protein per kg of bodyweight for those training regularly. Spacing protein intake throughout the day (every 3-4 hours) may be optimal for muscle protein synthesis.";
pub const FAT_LOSS_ADVICE: &str = "Fat loss requires a caloric deficit - consuming fewer calories than you burn. This is best achieved through a combination of moderate calorie reduction (300-500 calories below maintenance) and increased physical activity. Strength training helps preserve muscle mass during weight loss.";
pub const MUSCLE_GAIN_ADVICE: &str = "Building muscle requires a combination of progressive resistance training, adequate protein intake (1.6-2.2g/kg), sufficient calories (slight surplus for optimal gains), and appropriate recovery between workouts.";
pub const FALLBACK_ADVICE: &str = "As your AI fitness coach, I'd be happy to help with specific questions about training, nutrition, or recovery strategies. Could you provide more details about what you're looking to learn?";

pub const FORM_CUE: &str = "When performing any exercise, focus on proper form, controlled movements, and appropriate weight for your experience level.";

const RULES: &[Rule] = &[
    Rule { all: &["best exercise for", "chest"], any: &[], response: CHEST_ADVICE },
    Rule { all: &["best exercise for", "back"], any: &[], response: BACK_ADVICE },
    Rule { all: &["best exercise for", "legs"], any: &[], response: LEGS_ADVICE },
    Rule { all: &["best exercise for"], any: &[], response: MUSCLE_GROUP_ADVICE },
    Rule { all: &["how many", "sets"], any: &[], response: SETS_ADVICE },
    Rule { all: &["how many", "rep"], any: &[], response: REPS_ADVICE },
    Rule { all: &["rest", "between"], any: &[], response: REST_ADVICE },
    Rule { all: &["protein"], any: &[], response: PROTEIN_ADVICE },
    Rule { all: &[], any: &["lose weight", "fat loss"], response: FAT_LOSS_ADVICE },
    Rule { all: &["build muscle"], any: &[], response: MUSCLE_GAIN_ADVICE },
];

/// Answer from the static keyword table.
pub fn rule_based_response(query: &str) -> &'static str {
    let query = query.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&query))
        .map(|rule| rule.response)
        .unwrap_or(FALLBACK_ADVICE)
}

/// Answer templated from the exercises closest to the query, best first.
pub fn retrieval_response(query: &str, matches: &[&ExerciseRecord]) -> String {
    let query = query.to_lowercase();
    let suggestions = matches
        .iter()
        .take(3)
        .map(|ex| ex.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if query.contains("best exercise for") {
        return format!(
            "Based on your question, some effective exercises for {} include {}. \
             These exercises are great for targeting these muscle groups with proper form and progressive overload.",
            top_muscles(matches, 2).join(", "),
            suggestions
        );
    }

    if query.contains("how to") {
        if let Some(ex) = matches
            .iter()
            .find(|ex| query.contains(&ex.name.to_lowercase()))
        {
            if ex.instructions.is_empty() {
                return FORM_CUE.to_string();
            }
            return format!("To perform {}: \n- {}", ex.name, ex.instructions.join("\n- "));
        }
    }

    if query.contains("alternative") || query.contains("substitute") {
        return format!(
            "Some alternative exercises you might consider include {}. \
             When selecting alternatives, look for exercises that target similar muscle groups and match the movement pattern as closely as possible.",
            suggestions
        );
    }

    format!(
        "Based on your question, you might want to consider exercises like {}. \
         These can be effective additions to your workout routine, depending on your specific goals and fitness level.",
        suggestions
    )
}

/// The `n` most frequent primary muscles across `matches`; ties go to the
/// muscle seen first.
fn top_muscles<'a>(matches: &[&'a ExerciseRecord], n: usize) -> Vec<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for muscle in matches.iter().flat_map(|ex| ex.primary_muscles.iter()) {
        match counts.iter_mut().find(|(m, _)| *m == muscle.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((muscle.as_str(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(m, _)| m).collect()
}

/// Answer a free-text question.
///
/// Without an embedding index the rule table answers and no exercises are
/// returned. With one, the top `coach.top_k` matches are returned alongside
/// the templated answer.
///
/// # Errors
///
/// Returns [`FitError::Coach`] if the query cannot be embedded.
pub async fn ask_coach(ctx: &AppContext, query: &str) -> Result<CoachResponse, FitError> {
    let Some(retrieval) = ctx.retrieval() else {
        return Ok(CoachResponse {
            response: rule_based_response(query).to_string(),
            relevant_exercises: None,
        });
    };

    let query_vec = embed_query(retrieval.provider.as_ref(), query)
        .await
        .map_err(|e| FitError::Coach(e.to_string()))?;

    let exercises = ctx.catalog().exercises();
    let matches: Vec<&ExerciseRecord> = retrieval
        .index
        .nearest(&query_vec, ctx.config().coach.top_k)
        .into_iter()
        .filter_map(|i| exercises.get(i))
        .collect();

    tracing::debug!(
        matches = matches.len(),
        model = retrieval.provider.model_name(),
        "coach retrieval"
    );

    Ok(CoachResponse {
        response: retrieval_response(query, &matches),
        relevant_exercises: Some(matches.into_iter().cloned().collect()),
    })
}
