//! services/api/src/web/meals.rs
//!
//! Meal log CRUD. Nutrition values are stored as the client sends them,
//! typically taken from a prior `/nutrition` analysis.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use fitness_core::domain::{Meal, MealType, MealUpdate, NewMeal, NutritionFacts};
use fitness_core::sleep::{format_date, parse_date};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::{check_length, port_failure, state::AppState, HandlerError, MAX_FOOD_NAME_LEN};

#[derive(Deserialize, ToSchema)]
pub struct CreateMealRequest {
    /// breakfast, lunch, dinner or snack
    #[serde(rename = "type")]
    pub meal_type: String,
    pub food_name: String,
    /// Grams.
    pub quantity: f64,
    /// `YYYY-MM-DD`; defaults to today (UTC).
    pub date: Option<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbohydrates: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateMealRequest {
    #[serde(rename = "type")]
    pub meal_type: Option<String>,
    pub food_name: Option<String>,
    pub quantity: Option<f64>,
    pub date: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MealDateQuery {
    /// Only meals on this day, `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MealResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub meal_type: String,
    pub food_name: String,
    pub quantity: f64,
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            meal_type: meal.meal_type.to_string(),
            food_name: meal.food_name,
            quantity: meal.quantity_grams,
            date: format_date(meal.date),
            calories: meal.nutrition.calories,
            protein: meal.nutrition.protein,
            carbohydrates: meal.nutrition.carbohydrates,
            fat: meal.nutrition.fat,
        }
    }
}

fn bad_request(message: impl ToString) -> HandlerError {
    (StatusCode::BAD_REQUEST, message.to_string())
}

fn check_quantity(quantity: f64) -> Result<f64, HandlerError> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(quantity)
    } else {
        Err(bad_request("quantity must be a positive number of grams"))
    }
}

impl UpdateMealRequest {
    fn into_update(self) -> Result<MealUpdate, HandlerError> {
        let meal_type = self
            .meal_type
            .as_deref()
            .map(str::parse::<MealType>)
            .transpose()
            .map_err(bad_request)?;
        let date = self
            .date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(bad_request)?;
        let quantity_grams = self.quantity.map(check_quantity).transpose()?;
        let food_name = self
            .food_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if let Some(name) = food_name.as_deref() {
            check_length("food_name", name, MAX_FOOD_NAME_LEN)?;
        }

        Ok(MealUpdate {
            meal_type,
            food_name,
            quantity_grams,
            date,
            calories: self.calories,
            protein: self.protein,
            fat: self.fat,
            carbohydrates: self.carbohydrates,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal logged", body = MealResponse),
        (status = 400, description = "Invalid meal")
    )
)]
pub async fn create_meal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateMealRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let meal_type: MealType = req.meal_type.parse().map_err(bad_request)?;
    let food_name = req.food_name.trim().to_string();
    if food_name.is_empty() {
        return Err(bad_request("food_name is required"));
    }
    check_length("food_name", &food_name, MAX_FOOD_NAME_LEN)?;
    let quantity_grams = check_quantity(req.quantity)?;
    let date = match req.date.as_deref() {
        Some(raw) => parse_date(raw).map_err(bad_request)?,
        None => Utc::now().date_naive(),
    };

    let new_meal = NewMeal {
        meal_type,
        food_name,
        quantity_grams,
        date,
        nutrition: NutritionFacts {
            calories: req.calories,
            protein: req.protein,
            fat: req.fat,
            carbohydrates: req.carbohydrates,
        },
    };

    let meal = state
        .db
        .create_meal(user_id, &new_meal)
        .await
        .map_err(|e| port_failure("log meal", e))?;
    info!("Logged {} '{}' for user {}", meal.meal_type, meal.food_name, user_id);

    Ok((StatusCode::CREATED, Json(MealResponse::from(meal))))
}

#[utoipa::path(
    get,
    path = "/api/meals",
    params(MealDateQuery),
    responses(
        (status = 200, description = "Meals, newest first", body = [MealResponse]),
        (status = 400, description = "Malformed date filter")
    )
)]
pub async fn list_meals_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<MealDateQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let date = query
        .date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(bad_request)?;

    let meals = state
        .db
        .list_meals(user_id, date)
        .await
        .map_err(|e| port_failure("list meals", e))?;

    let body: Vec<MealResponse> = meals.into_iter().map(MealResponse::from).collect();
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal id")),
    responses(
        (status = 200, description = "The meal", body = MealResponse),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn get_meal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(meal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let meal = state
        .db
        .get_meal(user_id, meal_id)
        .await
        .map_err(|e| port_failure("load meal", e))?;
    Ok(Json(MealResponse::from(meal)))
}

#[utoipa::path(
    put,
    path = "/api/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal id")),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal updated", body = MealResponse),
        (status = 400, description = "Invalid meal"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn update_meal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(meal_id): Path<Uuid>,
    Json(req): Json<UpdateMealRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let update = req.into_update()?;

    let existing = state
        .db
        .get_meal(user_id, meal_id)
        .await
        .map_err(|e| port_failure("load meal", e))?;

    let meal = state
        .db
        .update_meal(&update.apply(existing))
        .await
        .map_err(|e| port_failure("update meal", e))?;

    Ok(Json(MealResponse::from(meal)))
}

#[utoipa::path(
    delete,
    path = "/api/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal id")),
    responses(
        (status = 204, description = "Meal deleted"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn delete_meal_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(meal_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .db
        .delete_meal(user_id, meal_id)
        .await
        .map_err(|e| port_failure("delete meal", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_parses_known_fields() {
        let req = UpdateMealRequest {
            meal_type: Some("Dinner".to_string()),
            quantity: Some(250.0),
            food_name: Some("  ".to_string()),
            ..Default::default()
        };

        let update = req.into_update().unwrap();

        assert_eq!(update.meal_type, Some(MealType::Dinner));
        assert_eq!(update.quantity_grams, Some(250.0));
        assert_eq!(update.food_name, None);
    }

    #[test]
    fn test_update_request_rejects_unknown_meal_type() {
        let req = UpdateMealRequest {
            meal_type: Some("brunch".to_string()),
            ..Default::default()
        };

        let (status, _) = req.into_update().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        assert!(check_quantity(0.0).is_err());
        assert!(check_quantity(f64::NAN).is_err());
        assert_eq!(check_quantity(120.5).unwrap(), 120.5);
    }

    #[test]
    fn test_update_request_rejects_long_food_name() {
        let req = UpdateMealRequest {
            food_name: Some("b".repeat(MAX_FOOD_NAME_LEN + 1)),
            ..Default::default()
        };

        let (status, message) = req.into_update().unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("food_name"));
    }
}
