//! services/api/src/web/workouts.rs
//!
//! Workout scheduling and lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use fitness_core::domain::{NewWorkout, Workout};
use fitness_core::sleep::{format_date, parse_date};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{check_length, port_failure, state::AppState, HandlerError, MAX_LABEL_LEN};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub workout_type: String,
    pub difficulty: String,
    /// Minutes.
    pub duration: i32,
    /// `YYYY-MM-DD`; defaults to today (UTC).
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub workout_type: String,
    pub difficulty: String,
    pub duration: i32,
    pub date: String,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            workout_type: workout.workout_type,
            difficulty: workout.difficulty,
            duration: workout.duration_minutes,
            date: format_date(workout.date),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = CreateWorkoutRequest,
    responses(
        (status = 201, description = "Workout scheduled", body = WorkoutResponse),
        (status = 400, description = "Invalid workout")
    )
)]
pub async fn create_workout_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if req.workout_type.trim().is_empty() || req.difficulty.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "workoutType and difficulty are required".to_string(),
        ));
    }
    check_length("workoutType", req.workout_type.trim(), MAX_LABEL_LEN)?;
    check_length("difficulty", req.difficulty.trim(), MAX_LABEL_LEN)?;
    if req.duration <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "duration must be a positive number of minutes".to_string(),
        ));
    }
    let date = match req.date.as_deref() {
        Some(raw) => parse_date(raw).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => Utc::now().date_naive(),
    };

    let new_workout = NewWorkout {
        workout_type: req.workout_type.trim().to_string(),
        difficulty: req.difficulty.trim().to_string(),
        duration_minutes: req.duration,
        date,
    };

    let workout = state
        .db
        .create_workout(user_id, &new_workout)
        .await
        .map_err(|e| port_failure("schedule workout", e))?;
    info!("Scheduled workout {} for user {}", workout.id, user_id);

    Ok((StatusCode::CREATED, Json(WorkoutResponse::from(workout))))
}

#[utoipa::path(
    get,
    path = "/api/workouts",
    responses((status = 200, description = "Workouts, newest first", body = [WorkoutResponse]))
)]
pub async fn list_workouts_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let workouts = state
        .db
        .list_workouts(user_id)
        .await
        .map_err(|e| port_failure("list workouts", e))?;

    let body: Vec<WorkoutResponse> = workouts.into_iter().map(WorkoutResponse::from).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/workouts/{id}",
    params(("id" = Uuid, Path, description = "Workout id")),
    responses(
        (status = 200, description = "The workout", body = WorkoutResponse),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn get_workout_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(workout_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let workout = state
        .db
        .get_workout(user_id, workout_id)
        .await
        .map_err(|e| port_failure("load workout", e))?;
    Ok(Json(WorkoutResponse::from(workout)))
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}",
    params(("id" = Uuid, Path, description = "Workout id")),
    responses(
        (status = 204, description = "Workout deleted"),
        (status = 404, description = "Workout not found")
    )
)]
pub async fn delete_workout_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(workout_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .db
        .delete_workout(user_id, workout_id)
        .await
        .map_err(|e| port_failure("delete workout", e))?;
    Ok(StatusCode::NO_CONTENT)
}
