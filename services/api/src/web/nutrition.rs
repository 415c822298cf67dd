//! services/api/src/web/nutrition.rs
//!
//! Free-text meal analysis and single-food nutrition lookup.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use fitness_core::domain::{FoodNutrition, NutritionFacts};
use fitness_core::meal_parser::{tokenize, TokenizedFoodItem};
use fitness_core::ports::NutritionLookupService;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::web::{port_failure, state::AppState, HandlerError};

const DEFAULT_LOOKUP_GRAMS: f64 = 100.0;

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeMealRequest {
    /// e.g. "today i ate 2 cups of rice and an apple"
    pub text: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LookupNutritionRequest {
    pub food_name: String,
    /// Grams; defaults to 100.
    pub quantity: Option<f64>,
}

/// Nutrition for one food mention, scaled to its estimated weight.
#[derive(Serialize, ToSchema, Debug, PartialEq)]
pub struct FoodAnalysis {
    pub food_name: String,
    pub measurement_type: String,
    pub estimated_grams: f64,
    /// False when the nutrition database had no match or could not be reached.
    pub found: bool,
    pub description: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
}

impl FoodAnalysis {
    fn new(item: &TokenizedFoodItem, hit: Option<FoodNutrition>) -> Self {
        let (description, facts) = match hit {
            Some(food) => (Some(food.description), food.per_100g.scaled_to(item.estimated_grams)),
            None => (None, NutritionFacts::default()),
        };
        Self {
            food_name: item.food_name.clone(),
            measurement_type: item.measurement_type().to_string(),
            estimated_grams: item.estimated_grams,
            found: description.is_some(),
            description,
            calories: facts.calories,
            protein: facts.protein,
            fat: facts.fat,
            carbohydrates: facts.carbohydrates,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LookupNutritionResponse {
    pub food_name: String,
    pub description: String,
    pub quantity: f64,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
}

/// Looks up one item. Lookup failures are logged and reported as not found so
/// that a single bad food does not sink the whole analysis.
async fn analyze_item(lookup: &dyn NutritionLookupService, item: TokenizedFoodItem) -> FoodAnalysis {
    if item.food_name.is_empty() {
        return FoodAnalysis::new(&item, None);
    }
    let hit = match lookup.lookup(&item.food_name).await {
        Ok(hit) => hit,
        Err(e) => {
            warn!(food_name = %item.food_name, "Nutrition lookup failed: {}", e);
            None
        }
    };
    FoodAnalysis::new(&item, hit)
}

#[utoipa::path(
    post,
    path = "/api/nutrition",
    request_body = AnalyzeMealRequest,
    responses(
        (status = 200, description = "One entry per food mentioned, in sentence order", body = [FoodAnalysis]),
        (status = 400, description = "The text contains an unreadable quantity")
    )
)]
pub async fn analyze_meal_text_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeMealRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let items = tokenize(&req.text).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    info!("Analyzing meal text with {} food mention(s)", items.len());

    let lookup = state.nutrition.as_ref();
    let analysis = join_all(items.into_iter().map(|item| analyze_item(lookup, item))).await;

    Ok(Json(analysis))
}

#[utoipa::path(
    post,
    path = "/api/nutrition/lookup",
    request_body = LookupNutritionRequest,
    responses(
        (status = 200, description = "Nutrition scaled to the quantity", body = LookupNutritionResponse),
        (status = 400, description = "Missing food name or bad quantity"),
        (status = 404, description = "No matching food")
    )
)]
pub async fn lookup_nutrition_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LookupNutritionRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let food_name = req.food_name.trim().to_lowercase();
    if food_name.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "food_name is required".to_string()));
    }
    let quantity = req.quantity.unwrap_or(DEFAULT_LOOKUP_GRAMS);
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "quantity must be a positive number of grams".to_string(),
        ));
    }

    let food = state
        .nutrition
        .lookup(&food_name)
        .await
        .map_err(|e| port_failure("look up nutrition", e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No nutrition data found for '{}'", food_name),
            )
        })?;

    let facts = food.per_100g.scaled_to(quantity);
    Ok(Json(LookupNutritionResponse {
        food_name,
        description: food.description,
        quantity,
        calories: facts.calories,
        protein: facts.protein,
        fat: facts.fat,
        carbohydrates: facts.carbohydrates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_core::meal_parser::ServingUnit;

    fn item(food_name: &str, unit: Option<ServingUnit>, grams: f64) -> TokenizedFoodItem {
        TokenizedFoodItem {
            food_name: food_name.to_string(),
            quantity: 1.0,
            unit,
            estimated_grams: grams,
        }
    }

    #[test]
    fn test_analysis_scales_hit_to_estimated_grams() {
        let hit = FoodNutrition {
            description: "Rice, white, cooked".to_string(),
            per_100g: NutritionFacts {
                calories: 130.0,
                protein: 2.7,
                fat: 0.3,
                carbohydrates: 28.0,
            },
        };

        let analysis = FoodAnalysis::new(&item("rice", Some(ServingUnit::Cup), 480.0), Some(hit));

        assert!(analysis.found);
        assert_eq!(analysis.measurement_type, "cup");
        assert_eq!(analysis.calories, 624.0);
        assert_eq!(analysis.carbohydrates, 134.4);
        assert_eq!(analysis.description.as_deref(), Some("Rice, white, cooked"));
    }

    #[test]
    fn test_analysis_without_hit_is_zeroed() {
        let analysis = FoodAnalysis::new(&item("dragonfruit", None, 100.0), None);

        assert!(!analysis.found);
        assert_eq!(analysis.measurement_type, "");
        assert_eq!(analysis.calories, 0.0);
        assert_eq!(analysis.description, None);
    }
}
