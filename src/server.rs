//! HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Liveness check |
//! | `GET`  | `/api/exercises` | Filtered catalog listing |
//! | `GET`  | `/api/exercises/equipment` | Distinct equipment types |
//! | `GET`  | `/api/exercises/muscles` | Distinct primary muscles |
//! | `GET`  | `/api/exercise/{id}` | One exercise by id |
//! | `POST` | `/api/generate-workout` | Generate a workout for a profile |
//! | `POST` | `/api/ask-coach` | Ask the coach a question |
//!
//! # Error Contract
//!
//! Errors are returned as `{ "detail": "<message>" }`. A missing exercise is
//! `404`; failures in workout generation or the coach are `500`. Malformed
//! query strings and bodies keep axum's rejection status (`400`, `415`,
//! `422`) with the rejection text as the detail.
//!
//! # CORS
//!
//! Origins come from `[server].cors_origins`. A `"*"` entry allows any origin
//! without credentials; otherwise the listed origins are allowed with
//! credentials and the request's method and headers are mirrored.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::coach::ask_coach;
use crate::config::{Config, ServerConfig};
use crate::context::AppContext;
use crate::error::FitError;
use crate::models::{
    CoachRequest, CoachResponse, ExerciseFilter, ExerciseRecord, UserProfile, Workout,
};
use crate::workout::generate_workout;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
type AppState = Arc<AppContext>;

/// Starts the HTTP server.
///
/// Loads the catalog and embedding index, then binds to `[server].bind` and
/// serves until the process is terminated.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let ctx = Arc::new(AppContext::initialize(config).await);

    let app = build_router(ctx);

    tracing::info!("FitGenieAI API listening on http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes, CORS, and request tracing over an already-initialised context.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let cors = cors_layer(&ctx.config().server);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/exercises", get(handle_list_exercises))
        .route("/api/exercises/equipment", get(handle_equipment_types))
        .route("/api/exercises/muscles", get(handle_muscle_groups))
        .route("/api/exercise/{id}", get(handle_get_exercise))
        .route("/api/generate-workout", post(handle_generate_workout))
        .route("/api/ask-coach", post(handle_ask_coach))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.message })).into_response()
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        let status = if err.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            tracing::error!("{}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        AppError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "FitGenieAI API is running",
    })
}

// ============ GET /api/exercises ============

/// Exercises matching every supplied filter, in catalog order, at most
/// `limit` (default 50).
async fn handle_list_exercises(
    State(ctx): State<AppState>,
    query: Result<Query<ExerciseFilter>, QueryRejection>,
) -> Result<Json<Vec<ExerciseRecord>>, AppError> {
    let Query(filter) = query?;
    Ok(Json(
        ctx.catalog()
            .list_exercises(&filter)
            .into_iter()
            .cloned()
            .collect(),
    ))
}

async fn handle_equipment_types(State(ctx): State<AppState>) -> Json<Vec<String>> {
    Json(ctx.catalog().equipment_types())
}

async fn handle_muscle_groups(State(ctx): State<AppState>) -> Json<Vec<String>> {
    Json(ctx.catalog().muscle_groups())
}

// ============ GET /api/exercise/{id} ============

async fn handle_get_exercise(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExerciseRecord>, AppError> {
    let exercise = ctx.catalog().get_exercise(&id)?;
    Ok(Json(exercise.clone()))
}

// ============ POST /api/generate-workout ============

/// Each request draws from its own RNG, so concurrent requests never share
/// sampling state.
async fn handle_generate_workout(
    State(ctx): State<AppState>,
    body: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<Workout>, AppError> {
    let Json(profile) = body?;
    let mut rng = ctx.workout_rng();
    let workout = generate_workout(ctx.catalog(), &profile, &mut rng)?;
    Ok(Json(workout))
}

// ============ POST /api/ask-coach ============

/// `user_profile` is accepted but does not influence the answer.
async fn handle_ask_coach(
    State(ctx): State<AppState>,
    body: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachResponse>, AppError> {
    let Json(request) = body?;
    let answer = ask_coach(&ctx, &request.query).await?;
    Ok(Json(answer))
}
