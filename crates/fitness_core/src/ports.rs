//! crates/fitness_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    FoodNutrition, Meal, NewMeal, NewUser, NewWorkout, SleepRecord, User, UserCredentials, Workout,
};
use crate::sleep::SleepInterval;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence for every record the service owns.
///
/// Record lookups are scoped by the owning user; a row owned by someone else
/// is reported as `NotFound`.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users & Auth ---
    async fn create_user(&self, new_user: &NewUser) -> PortResult<User>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn update_user(&self, user: &User) -> PortResult<User>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Workouts ---
    async fn create_workout(&self, user_id: Uuid, workout: &NewWorkout) -> PortResult<Workout>;

    async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> PortResult<Workout>;

    async fn list_workouts(&self, user_id: Uuid) -> PortResult<Vec<Workout>>;

    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> PortResult<()>;

    // --- Sleep ---
    async fn create_sleep_record(
        &self,
        user_id: Uuid,
        interval: &SleepInterval,
    ) -> PortResult<SleepRecord>;

    async fn get_sleep_record(&self, user_id: Uuid, record_id: Uuid) -> PortResult<SleepRecord>;

    /// Records whose date falls inside the inclusive range, newest first.
    async fn list_sleep_records(
        &self,
        user_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> PortResult<Vec<SleepRecord>>;

    /// Overwrites all interval fields, including the already-recomputed duration.
    async fn update_sleep_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        interval: &SleepInterval,
    ) -> PortResult<SleepRecord>;

    async fn delete_sleep_record(&self, user_id: Uuid, record_id: Uuid) -> PortResult<()>;

    // --- Meals ---
    async fn create_meal(&self, user_id: Uuid, meal: &NewMeal) -> PortResult<Meal>;

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> PortResult<Meal>;

    async fn list_meals(&self, user_id: Uuid, date: Option<NaiveDate>) -> PortResult<Vec<Meal>>;

    async fn update_meal(&self, meal: &Meal) -> PortResult<Meal>;

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait NutritionLookupService: Send + Sync {
    /// Looks up per-100g nutrition for a food name. `Ok(None)` means no match.
    async fn lookup(&self, food_name: &str) -> PortResult<Option<FoodNutrition>>;
}
