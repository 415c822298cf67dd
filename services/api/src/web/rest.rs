//! services/api/src/web/rest.rs
//!
//! The health probe and the master definition for the OpenAPI specification.

use axum::response::{IntoResponse, Json};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::web::{auth, meals, nutrition, profile, sleep, workouts};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        profile::get_profile_handler,
        profile::update_profile_handler,
        workouts::create_workout_handler,
        workouts::list_workouts_handler,
        workouts::get_workout_handler,
        workouts::delete_workout_handler,
        sleep::create_sleep_handler,
        sleep::list_sleep_handler,
        sleep::get_sleep_handler,
        sleep::update_sleep_handler,
        sleep::delete_sleep_handler,
        meals::create_meal_handler,
        meals::list_meals_handler,
        meals::get_meal_handler,
        meals::update_meal_handler,
        meals::delete_meal_handler,
        nutrition::analyze_meal_text_handler,
        nutrition::lookup_nutrition_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            profile::ProfileResponse,
            profile::UpdateProfileRequest,
            workouts::CreateWorkoutRequest,
            workouts::WorkoutResponse,
            sleep::CreateSleepRequest,
            sleep::UpdateSleepRequest,
            sleep::SleepResponse,
            meals::CreateMealRequest,
            meals::UpdateMealRequest,
            meals::MealResponse,
            nutrition::AnalyzeMealRequest,
            nutrition::FoodAnalysis,
            nutrition::LookupNutritionRequest,
            nutrition::LookupNutritionResponse,
        )
    ),
    tags(
        (name = "Fitness Tracker API", description = "Sleep, workout and meal logging with nutrition lookup.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe; does not touch the database.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
