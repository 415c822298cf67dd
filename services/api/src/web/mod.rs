pub mod auth;
pub mod meals;
pub mod middleware;
pub mod nutrition;
pub mod profile;
pub mod rest;
pub mod sleep;
pub mod state;
pub mod workouts;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use fitness_core::ports::PortError;
use std::sync::Arc;
use tracing::error;

pub use middleware::require_auth;
use state::AppState;

/// The error half of every handler's `Result`.
pub type HandlerError = (StatusCode, String);

/// Maps a port failure onto an HTTP status, logging anything unexpected.
pub(crate) fn port_failure(action: &str, e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Conflict(message) => (StatusCode::CONFLICT, message),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(message) => {
            error!("Failed to {}: {}", action, message);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to {}", action))
        }
    }
}

// Column widths from the initial schema.
pub(crate) const MAX_NAME_LEN: usize = 50;
pub(crate) const MAX_EMAIL_LEN: usize = 120;
pub(crate) const MAX_GOAL_LEN: usize = 200;
pub(crate) const MAX_LABEL_LEN: usize = 50;
pub(crate) const MAX_FOOD_NAME_LEN: usize = 100;

/// Rejects text longer than its column with a 400 instead of letting the insert fail.
pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<(), HandlerError> {
    if value.chars().count() > max {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} must be at most {} characters", field, max),
        ));
    }
    Ok(())
}

/// Builds every `/api` route. Protected routes sit behind `require_auth`.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/health", get(rest::health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(profile::get_profile_handler).put(profile::update_profile_handler),
        )
        .route(
            "/workouts",
            post(workouts::create_workout_handler).get(workouts::list_workouts_handler),
        )
        .route(
            "/workouts/{id}",
            get(workouts::get_workout_handler).delete(workouts::delete_workout_handler),
        )
        .route(
            "/sleep",
            post(sleep::create_sleep_handler).get(sleep::list_sleep_handler),
        )
        .route(
            "/sleep/{id}",
            get(sleep::get_sleep_handler)
                .put(sleep::update_sleep_handler)
                .delete(sleep::delete_sleep_handler),
        )
        .route(
            "/meals",
            post(meals::create_meal_handler).get(meals::list_meals_handler),
        )
        .route(
            "/meals/{id}",
            get(meals::get_meal_handler)
                .put(meals::update_meal_handler)
                .delete(meals::delete_meal_handler),
        )
        .route("/nutrition", post(nutrition::analyze_meal_text_handler))
        .route("/nutrition/lookup", post(nutrition::lookup_nutrition_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new().nest("/api", api_routes).with_state(app_state)
}
