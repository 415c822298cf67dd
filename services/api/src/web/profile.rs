//! services/api/src/web/profile.rs
//!
//! Read and edit the signed-in user's profile.

use axum::{extract::State, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use fitness_core::domain::{ProfileUpdate, User};
use fitness_core::sleep::format_date;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::{
    check_length, port_failure, state::AppState, HandlerError, MAX_EMAIL_LEN, MAX_GOAL_LEN,
    MAX_NAME_LEN,
};

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: String,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: format_date(user.date_of_birth),
            weight: user.weight,
            height: user.height,
            goal: user.goal,
            created_at: user.created_at,
        }
    }
}

/// Only the fields that are present and non-empty are changed.
#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub goal: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "The current user's profile", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = state
        .db
        .get_user(user_id)
        .await
        .map_err(|e| port_failure("load profile", e))?;
    Ok(Json(ProfileResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Field too long"),
        (status = 409, description = "Email already in use"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let email = req.email.map(|email| email.trim().to_lowercase());
    let limits = [
        ("first_name", req.first_name.as_deref(), MAX_NAME_LEN),
        ("last_name", req.last_name.as_deref(), MAX_NAME_LEN),
        ("email", email.as_deref(), MAX_EMAIL_LEN),
        ("goal", req.goal.as_deref(), MAX_GOAL_LEN),
    ];
    for (field, value, max) in limits {
        if let Some(value) = value {
            check_length(field, value, max)?;
        }
    }

    let current = state
        .db
        .get_user(user_id)
        .await
        .map_err(|e| port_failure("load profile", e))?;

    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        email,
        weight: req.weight,
        height: req.height,
        goal: req.goal,
    };

    let updated = state
        .db
        .update_user(&update.apply(current))
        .await
        .map_err(|e| port_failure("update profile", e))?;

    Ok(Json(ProfileResponse::from(updated)))
}
