//! services/api/src/adapters/usda.rs
//!
//! This module contains the adapter for the USDA FoodData Central search API.
//! It implements the `NutritionLookupService` port from `fitness_core`.

use async_trait::async_trait;
use fitness_core::domain::{FoodNutrition, NutritionFacts};
use fitness_core::ports::{NutritionLookupService, PortError, PortResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

//=========================================================================================
// Response Payloads
//=========================================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodHit {
    description: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodNutrient {
    nutrient_name: String,
    unit_name: Option<String>,
    #[serde(default)]
    value: f64,
}

impl FoodHit {
    /// Value of the named nutrient, 0 when the food does not list it.
    fn nutrient(&self, name: &str) -> f64 {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_name == name)
            .map(|n| n.value)
            .unwrap_or(0.0)
    }

    /// Energy is reported in both kcal and kJ for some foods; prefer kcal.
    fn calories(&self) -> f64 {
        self.food_nutrients
            .iter()
            .filter(|n| n.nutrient_name == "Energy")
            .find(|n| {
                n.unit_name
                    .as_deref()
                    .map_or(false, |unit| unit.eq_ignore_ascii_case("kcal"))
            })
            .map(|n| n.value)
            .unwrap_or_else(|| self.nutrient("Energy"))
    }

    fn into_domain(self) -> FoodNutrition {
        let per_100g = NutritionFacts {
            calories: self.calories(),
            protein: self.nutrient("Protein"),
            fat: self.nutrient("Total lipid (fat)"),
            carbohydrates: self.nutrient("Carbohydrate, by difference"),
        };
        FoodNutrition {
            description: self.description.unwrap_or_else(|| "Unknown".to_string()),
            per_100g,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `NutritionLookupService` against FoodData Central.
#[derive(Clone)]
pub struct UsdaNutritionAdapter {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UsdaNutritionAdapter {
    pub fn new(base_url: String, api_key: String) -> Result<Self, PortError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

//=========================================================================================
// `NutritionLookupService` Trait Implementation
//=========================================================================================

#[async_trait]
impl NutritionLookupService for UsdaNutritionAdapter {
    /// Takes the top search hit for the food name, or `None` when the search is empty.
    async fn lookup(&self, food_name: &str) -> PortResult<Option<FoodNutrition>> {
        let params = [
            ("api_key", self.api_key.as_str()),
            ("query", food_name),
            ("pageSize", "1"),
        ];

        debug!(food_name, "Querying USDA FoodData Central");

        let response = self
            .http_client
            .get(format!("{}/foods/search", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, food_name, "USDA search request failed");
            return Err(PortError::Unexpected(format!(
                "USDA search returned status {}",
                status
            )));
        }

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(search.foods.into_iter().next().map(FoodHit::into_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_first_food_hit() {
        let body = r#"{
            "totalHits": 2,
            "foods": [
                {
                    "description": "Apples, raw, with skin",
                    "foodNutrients": [
                        {"nutrientName": "Protein", "unitName": "G", "value": 0.26},
                        {"nutrientName": "Total lipid (fat)", "unitName": "G", "value": 0.17},
                        {"nutrientName": "Carbohydrate, by difference", "unitName": "G", "value": 13.8},
                        {"nutrientName": "Energy", "unitName": "kJ", "value": 218.0},
                        {"nutrientName": "Energy", "unitName": "KCAL", "value": 52.0}
                    ]
                },
                {"description": "Apple juice", "foodNutrients": []}
            ]
        }"#;

        let search: SearchResponse = serde_json::from_str(body).unwrap();
        let food = search.foods.into_iter().next().unwrap().into_domain();

        assert_eq!(food.description, "Apples, raw, with skin");
        assert_eq!(food.per_100g.calories, 52.0);
        assert_eq!(food.per_100g.protein, 0.26);
        assert_eq!(food.per_100g.fat, 0.17);
        assert_eq!(food.per_100g.carbohydrates, 13.8);
    }

    #[test]
    fn test_missing_nutrients_default_to_zero() {
        let body = r#"{"foods": [{"foodNutrients": [{"nutrientName": "Energy", "value": 40}]}]}"#;

        let search: SearchResponse = serde_json::from_str(body).unwrap();
        let food = search.foods.into_iter().next().unwrap().into_domain();

        assert_eq!(food.description, "Unknown");
        assert_eq!(food.per_100g.calories, 40.0);
        assert_eq!(food.per_100g.protein, 0.0);
        assert_eq!(food.per_100g.carbohydrates, 0.0);
    }

    #[test]
    fn test_empty_search_has_no_foods() {
        let search: SearchResponse = serde_json::from_str(r#"{"totalHits": 0}"#).unwrap();
        assert!(search.foods.is_empty());
    }
}
