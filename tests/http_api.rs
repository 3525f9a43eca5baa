//! End-to-end tests for the HTTP API, driven through the router with
//! `oneshot` so no socket is bound.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot()

use fitgenie::catalog::Catalog;
use fitgenie::coach::SETS_ADVICE;
use fitgenie::config::Config;
use fitgenie::context::{AppContext, Retrieval};
use fitgenie::embedding::EmbeddingProvider;
use fitgenie::index::EmbeddingIndex;
use fitgenie::loader::load_catalog;
use fitgenie::server::build_router;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/exercises.csv");

/// Bag-of-words over muscle names.
struct MuscleEmbedder;

const VOCAB: [&str; 8] = [
    "chest",
    "quadriceps",
    "biceps",
    "triceps",
    "back",
    "lats",
    "hamstrings",
    "shoulders",
];

#[async_trait]
impl EmbeddingProvider for MuscleEmbedder {
    fn model_name(&self) -> &str {
        "muscles"
    }
    fn dims(&self) -> usize {
        VOCAB.len()
    }
    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                VOCAB.iter().map(|w| t.matches(w).count() as f32).collect()
            })
            .collect())
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.workout.seed = Some(42);
    config
}

fn catalog() -> Catalog {
    load_catalog(FIXTURE.as_ref()).unwrap()
}

fn rule_based_router() -> Router {
    build_router(Arc::new(AppContext::new(config(), catalog(), None)))
}

async fn retrieval_router() -> Router {
    let catalog = catalog();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(MuscleEmbedder);
    let index = EmbeddingIndex::build(&catalog, provider.as_ref(), 4)
        .await
        .unwrap();
    let retrieval = Retrieval { provider, index };
    build_router(Arc::new(AppContext::new(config(), catalog, Some(retrieval))))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn ids(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|ex| ex["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(rule_based_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "message": "FitGenieAI API is running"})
    );
}

#[tokio::test]
async fn test_list_exercises_with_filters() {
    let (status, body) = send(
        rule_based_router(),
        get("/api/exercises?equipment=barbell&level=beginner"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        vec![
            "Barbell_Squat",
            "Barbell_Bench_Press",
            "Barbell_Row",
            "Barbell_Curl",
            "Barbell_Deadlift",
            "Lying_Triceps_Extension",
        ]
    );
}

#[tokio::test]
async fn test_list_exercises_muscle_and_limit() {
    let (_, body) = send(rule_based_router(), get("/api/exercises?muscle=chest&limit=2")).await;
    assert_eq!(ids(&body), vec!["Barbell_Bench_Press", "Dumbbell_Flyes"]);
}

#[tokio::test]
async fn test_list_exercises_default_returns_catalog() {
    let (_, body) = send(rule_based_router(), get("/api/exercises")).await;
    assert_eq!(body.as_array().unwrap().len(), 13);
    assert_eq!(body[0]["primaryMuscles"], json!(["quadriceps"]));
    assert_eq!(
        body[0]["instructions"].as_array().unwrap().len(),
        3,
        "bracketed list literal should be parsed"
    );
}

#[tokio::test]
async fn test_distinct_equipment_and_muscles() {
    let (_, equipment) = send(rule_based_router(), get("/api/exercises/equipment")).await;
    assert_eq!(equipment, json!(["barbell", "body only", "dumbbell", "machine"]));

    let (_, muscles) = send(rule_based_router(), get("/api/exercises/muscles")).await;
    let muscles = muscles.as_array().unwrap();
    assert_eq!(muscles.first(), Some(&json!("biceps")));
    assert!(muscles.contains(&json!("middle back")));
}

#[tokio::test]
async fn test_get_exercise() {
    let (status, body) = send(rule_based_router(), get("/api/exercise/Pushups")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Pushups");
    assert_eq!(body["equipment"], "body only");
}

#[tokio::test]
async fn test_get_missing_exercise_is_404() {
    let (status, body) = send(rule_based_router(), get("/api/exercise/Nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Exercise not found"}));
}

#[tokio::test]
async fn test_generate_workout() {
    let profile = json!({
        "goal": "strength",
        "level": "beginner",
        "equipment": ["barbell"],
        "duration": 30,
        "split_type": "full body"
    });
    let (status, body) =
        send(rule_based_router(), post_json("/api/generate-workout", profile)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Full body Workout for Strength");
    assert_eq!(body["type"], "full body");
    assert_eq!(body["duration"], 30);
    assert!(body.get("estimated_calories").is_none());

    let exercises = body["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 3);
    for ex in exercises {
        assert_eq!(ex["equipment"], "barbell");
    }
    // One compound and two isolation movements, in shuffled order.
    let compound: Vec<&Value> = exercises.iter().filter(|ex| ex["sets"] == 5).collect();
    assert_eq!(compound.len(), 1);
    assert_eq!(compound[0]["reps"], "4-6");
    assert_eq!(compound[0]["rest_seconds"], 180);
    let isolation: Vec<&Value> = exercises.iter().filter(|ex| ex["sets"] == 3).collect();
    assert_eq!(isolation.len(), 2);
    for ex in isolation {
        assert_eq!(ex["reps"], "6-8");
        assert_eq!(ex["rest_seconds"], 120);
    }
}

#[tokio::test]
async fn test_generate_ppl_day_with_calories() {
    let profile = json!({
        "goal": "hypertrophy",
        "level": "beginner",
        "equipment": ["barbell", "dumbbell", "body only", "machine"],
        "duration": 40,
        "split_type": "PPL",
        "day": "legs",
        "weight_kg": 80.0
    });
    let (status, body) =
        send(rule_based_router(), post_json("/api/generate-workout", profile)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Legs Workout for Hypertrophy");
    assert_eq!(body["type"], "legs");
    assert!(body["estimated_calories"].as_u64().unwrap() > 0);

    let legs = ["quadriceps", "hamstrings", "calves", "glutes"];
    for ex in body["exercises"].as_array().unwrap() {
        let primary = ex["primaryMuscles"].as_array().unwrap();
        assert!(primary.iter().any(|m| legs.contains(&m.as_str().unwrap())));
    }
}

#[tokio::test]
async fn test_generate_workout_zero_duration_is_500() {
    let profile = json!({
        "goal": "strength",
        "level": "beginner",
        "equipment": ["barbell"],
        "duration": 0,
        "split_type": "full body"
    });
    let (status, body) =
        send(rule_based_router(), post_json("/api/generate-workout", profile)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error generating workout:"));
}

#[tokio::test]
async fn test_ask_coach_rule_based() {
    let (status, body) = send(
        rule_based_router(),
        post_json("/api/ask-coach", json!({"query": "How many sets should I do?"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": SETS_ADVICE}));
}

#[tokio::test]
async fn test_ask_coach_retrieval() {
    let (status, body) = send(
        retrieval_router().await,
        post_json(
            "/api/ask-coach",
            json!({"query": "What is the best exercise for chest?", "user_profile": null}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let relevant = body["relevant_exercises"].as_array().unwrap();
    assert_eq!(relevant.len(), 5);
    assert_eq!(
        ids(&body["relevant_exercises"])[..3].to_vec(),
        vec!["Barbell_Bench_Press", "Dumbbell_Flyes", "Pushups"]
    );
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Based on your question, some effective exercises for chest"));
}

#[tokio::test]
async fn test_ask_coach_how_to_lists_instructions() {
    let (_, body) = send(
        retrieval_router().await,
        post_json("/api/ask-coach", json!({"query": "how to do dumbbell flyes for chest"})),
    )
    .await;
    assert_eq!(
        body["response"],
        "To perform Dumbbell Flyes: \n- Lie on a bench with arms extended.\n- Open your arms in a wide arc."
    );
}

#[tokio::test]
async fn test_empty_query_values_fall_back_to_defaults() {
    let (status, body) = send(rule_based_router(), get("/api/exercises?equipment=&limit=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn test_bad_limit_is_json_detail() {
    let (status, body) = send(rule_based_router(), get("/api/exercises?limit=many")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_invalid_workout_body_is_json_detail() {
    let profile = json!({
        "goal": "strength",
        "level": "beginner",
        "equipment": ["barbell"],
        "duration": -5,
        "split_type": "full body"
    });
    let (status, body) =
        send(rule_based_router(), post_json("/api/generate-workout", profile)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("duration"));
}

#[tokio::test]
async fn test_coach_body_without_json_content_type_is_json_detail() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/ask-coach")
        .body(Body::from(r#"{"query": "protein?"}"#))
        .unwrap();
    let (status, body) = send(rule_based_router(), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}
