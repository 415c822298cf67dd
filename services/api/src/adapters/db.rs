//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from `fitness_core`. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fitness_core::domain::{
    Meal, MealType, NewMeal, NewUser, NewWorkout, NutritionFacts, SleepRecord, User,
    UserCredentials, Workout,
};
use fitness_core::ports::{DatabaseService, PortError, PortResult};
use fitness_core::sleep::SleepInterval;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a missing row to `NotFound` and everything else to `Unexpected`.
fn lookup_error(e: sqlx::Error, what: impl FnOnce() -> String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map_or(false, |db_err| db_err.is_unique_violation())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    date_of_birth: NaiveDate,
    weight: Option<i32>,
    height: Option<i32>,
    goal: Option<String>,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            weight: self.weight,
            height: self.height,
            goal: self.goal,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct WorkoutRecord {
    id: Uuid,
    user_id: Uuid,
    workout_type: String,
    difficulty: String,
    duration_minutes: i32,
    date: NaiveDate,
}
impl WorkoutRecord {
    fn to_domain(self) -> Workout {
        Workout {
            id: self.id,
            user_id: self.user_id,
            workout_type: self.workout_type,
            difficulty: self.difficulty,
            duration_minutes: self.duration_minutes,
            date: self.date,
        }
    }
}

// The stored duration column is a cache for reporting queries; the domain
// value is always rebuilt from the raw times.
#[derive(FromRow)]
struct SleepRecordRow {
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    bed_time: NaiveTime,
    wake_time: NaiveTime,
}
impl SleepRecordRow {
    fn to_domain(self) -> SleepRecord {
        SleepRecord {
            id: self.id,
            user_id: self.user_id,
            interval: SleepInterval::new(self.date, self.bed_time, self.wake_time),
        }
    }
}

#[derive(FromRow)]
struct MealRecord {
    id: Uuid,
    user_id: Uuid,
    meal_type: String,
    food_name: String,
    quantity_grams: f64,
    date: NaiveDate,
    calories: f64,
    protein: f64,
    fat: f64,
    carbohydrates: f64,
}
impl MealRecord {
    fn to_domain(self) -> PortResult<Meal> {
        let meal_type = self
            .meal_type
            .parse::<MealType>()
            .map_err(PortError::Unexpected)?;
        Ok(Meal {
            id: self.id,
            user_id: self.user_id,
            meal_type,
            food_name: self.food_name,
            quantity_grams: self.quantity_grams,
            date: self.date,
            nutrition: NutritionFacts {
                calories: self.calories,
                protein: self.protein,
                fat: self.fat,
                carbohydrates: self.carbohydrates,
            },
        })
    }
}

const USER_COLUMNS: &str =
    "user_id, first_name, last_name, email, date_of_birth, weight, height, goal, created_at";
const WORKOUT_COLUMNS: &str = "id, user_id, workout_type, difficulty, duration_minutes, date";
const SLEEP_COLUMNS: &str = "id, user_id, date, bed_time, wake_time";
const MEAL_COLUMNS: &str =
    "id, user_id, meal_type, food_name, quantity_grams, date, calories, protein, fat, carbohydrates";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    // --- Users & Auth ---

    async fn create_user(&self, new_user: &NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (user_id, first_name, last_name, email, password_hash, date_of_birth, weight, height, goal) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(new_user.date_of_birth)
        .bind(new_user.weight)
        .bind(new_user.height)
        .bind(&new_user.goal)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!("User already exists with email {}", new_user.email))
            } else {
                unexpected(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("User with email {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn update_user(&self, user: &User) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET first_name = $2, last_name = $3, email = $4, weight = $5, height = $6, goal = $7 \
             WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.weight)
        .bind(user.height)
        .bind(&user.goal)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict(format!("Email {} is already in use", user.email))
            } else {
                lookup_error(e, || format!("User {} not found", user.user_id))
            }
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Uuid = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => unexpected(e),
        })?;
        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    // --- Workouts ---

    async fn create_workout(&self, user_id: Uuid, workout: &NewWorkout) -> PortResult<Workout> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "INSERT INTO workouts (id, user_id, workout_type, difficulty, duration_minutes, date) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {WORKOUT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&workout.workout_type)
        .bind(&workout.difficulty)
        .bind(workout.duration_minutes)
        .bind(workout.date)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> PortResult<Workout> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(workout_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("Workout {} not found", workout_id)))?;
        Ok(record.to_domain())
    }

    async fn list_workouts(&self, user_id: Uuid) -> PortResult<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let workouts = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(workouts)
    }

    async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Workout {} not found", workout_id)));
        }
        Ok(())
    }

    // --- Sleep ---

    async fn create_sleep_record(
        &self,
        user_id: Uuid,
        interval: &SleepInterval,
    ) -> PortResult<SleepRecord> {
        let record = sqlx::query_as::<_, SleepRecordRow>(&format!(
            "INSERT INTO sleep_records (id, user_id, date, bed_time, wake_time, duration_hours) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SLEEP_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(interval.date())
        .bind(interval.bed_time())
        .bind(interval.wake_time())
        .bind(interval.duration_hours() as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_sleep_record(&self, user_id: Uuid, record_id: Uuid) -> PortResult<SleepRecord> {
        let record = sqlx::query_as::<_, SleepRecordRow>(&format!(
            "SELECT {SLEEP_COLUMNS} FROM sleep_records WHERE id = $1 AND user_id = $2"
        ))
        .bind(record_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("Sleep record {} not found", record_id)))?;
        Ok(record.to_domain())
    }

    async fn list_sleep_records(
        &self,
        user_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> PortResult<Vec<SleepRecord>> {
        let records = sqlx::query_as::<_, SleepRecordRow>(&format!(
            "SELECT {SLEEP_COLUMNS} FROM sleep_records \
             WHERE user_id = $1 \
               AND ($2::date IS NULL OR date >= $2) \
               AND ($3::date IS NULL OR date <= $3) \
             ORDER BY date DESC"
        ))
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let sleep_records = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(sleep_records)
    }

    async fn update_sleep_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        interval: &SleepInterval,
    ) -> PortResult<SleepRecord> {
        let record = sqlx::query_as::<_, SleepRecordRow>(&format!(
            "UPDATE sleep_records SET date = $3, bed_time = $4, wake_time = $5, duration_hours = $6 \
             WHERE id = $1 AND user_id = $2 RETURNING {SLEEP_COLUMNS}"
        ))
        .bind(record_id)
        .bind(user_id)
        .bind(interval.date())
        .bind(interval.bed_time())
        .bind(interval.wake_time())
        .bind(interval.duration_hours() as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("Sleep record {} not found", record_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_sleep_record(&self, user_id: Uuid, record_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM sleep_records WHERE id = $1 AND user_id = $2")
            .bind(record_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Sleep record {} not found",
                record_id
            )));
        }
        Ok(())
    }

    // --- Meals ---

    async fn create_meal(&self, user_id: Uuid, meal: &NewMeal) -> PortResult<Meal> {
        let record = sqlx::query_as::<_, MealRecord>(&format!(
            "INSERT INTO meals (id, user_id, meal_type, food_name, quantity_grams, date, calories, protein, fat, carbohydrates) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {MEAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(meal.meal_type.as_str())
        .bind(&meal.food_name)
        .bind(meal.quantity_grams)
        .bind(meal.date)
        .bind(meal.nutrition.calories)
        .bind(meal.nutrition.protein)
        .bind(meal.nutrition.fat)
        .bind(meal.nutrition.carbohydrates)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> PortResult<Meal> {
        let record = sqlx::query_as::<_, MealRecord>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2"
        ))
        .bind(meal_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("Meal {} not found", meal_id)))?;
        record.to_domain()
    }

    async fn list_meals(&self, user_id: Uuid, date: Option<NaiveDate>) -> PortResult<Vec<Meal>> {
        let records = sqlx::query_as::<_, MealRecord>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals \
             WHERE user_id = $1 AND ($2::date IS NULL OR date = $2) \
             ORDER BY date DESC"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn update_meal(&self, meal: &Meal) -> PortResult<Meal> {
        let record = sqlx::query_as::<_, MealRecord>(&format!(
            "UPDATE meals SET meal_type = $3, food_name = $4, quantity_grams = $5, date = $6, \
             calories = $7, protein = $8, fat = $9, carbohydrates = $10 \
             WHERE id = $1 AND user_id = $2 RETURNING {MEAL_COLUMNS}"
        ))
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(meal.meal_type.as_str())
        .bind(&meal.food_name)
        .bind(meal.quantity_grams)
        .bind(meal.date)
        .bind(meal.nutrition.calories)
        .bind(meal.nutrition.protein)
        .bind(meal.nutrition.fat)
        .bind(meal.nutrition.carbohydrates)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| lookup_error(e, || format!("Meal {} not found", meal.id)))?;
        record.to_domain()
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Meal {} not found", meal_id)));
        }
        Ok(())
    }
}
