//! crates/fitness_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::sleep::SleepInterval;

//=========================================================================================
// Users
//=========================================================================================

/// Represents a registered user and their profile.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// Everything needed to register a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hashed_password: String,
    pub date_of_birth: NaiveDate,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub goal: Option<String>,
}

/// A partial profile edit. Absent, blank or zero values leave the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub goal: Option<String>,
}

impl ProfileUpdate {
    /// Returns `user` with every provided field overwritten.
    pub fn apply(&self, mut user: User) -> User {
        if let Some(first_name) = non_blank(&self.first_name) {
            user.first_name = first_name;
        }
        if let Some(last_name) = non_blank(&self.last_name) {
            user.last_name = last_name;
        }
        if let Some(email) = non_blank(&self.email) {
            user.email = email;
        }
        if let Some(weight) = self.weight.filter(|w| *w != 0) {
            user.weight = Some(weight);
        }
        if let Some(height) = self.height.filter(|h| *h != 0) {
            user.height = Some(height);
        }
        if let Some(goal) = non_blank(&self.goal) {
            user.goal = Some(goal);
        }
        user
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

//=========================================================================================
// Workouts
//=========================================================================================

/// A scheduled or completed workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_type: String,
    pub difficulty: String,
    pub duration_minutes: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub workout_type: String,
    pub difficulty: String,
    pub duration_minutes: i32,
    pub date: NaiveDate,
}

//=========================================================================================
// Sleep
//=========================================================================================

/// A stored night of sleep. The duration lives inside the interval and is never set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub interval: SleepInterval,
}

//=========================================================================================
// Meals & Nutrition
//=========================================================================================

/// Macronutrient totals for some amount of food.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
}

impl NutritionFacts {
    /// Scales per-100g values to `grams`, rounded to two decimal places.
    pub fn scaled_to(&self, grams: f64) -> NutritionFacts {
        let factor = grams / 100.0;
        NutritionFacts {
            calories: round2(self.calories * factor),
            protein: round2(self.protein * factor),
            fat: round2(self.fat * factor),
            carbohydrates: round2(self.carbohydrates * factor),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A nutrition database hit, expressed per 100 grams.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodNutrition {
    pub description: String,
    pub per_100g: NutritionFacts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type '{}'", other)),
        }
    }
}

/// A logged meal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: MealType,
    pub food_name: String,
    pub quantity_grams: f64,
    pub date: NaiveDate,
    pub nutrition: NutritionFacts,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub meal_type: MealType,
    pub food_name: String,
    pub quantity_grams: f64,
    pub date: NaiveDate,
    pub nutrition: NutritionFacts,
}

/// A partial meal edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MealUpdate {
    pub meal_type: Option<MealType>,
    pub food_name: Option<String>,
    pub quantity_grams: Option<f64>,
    pub date: Option<NaiveDate>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
}

impl MealUpdate {
    pub fn apply(&self, mut meal: Meal) -> Meal {
        if let Some(meal_type) = self.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(food_name) = &self.food_name {
            meal.food_name = food_name.clone();
        }
        if let Some(quantity) = self.quantity_grams {
            meal.quantity_grams = quantity;
        }
        if let Some(date) = self.date {
            meal.date = date;
        }
        if let Some(calories) = self.calories {
            meal.nutrition.calories = calories;
        }
        if let Some(protein) = self.protein {
            meal.nutrition.protein = protein;
        }
        if let Some(fat) = self.fat {
            meal.nutrition.fat = fat;
        }
        if let Some(carbohydrates) = self.carbohydrates {
            meal.nutrition.carbohydrates = carbohydrates;
        }
        meal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            user_id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "test@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            weight: Some(70),
            height: None,
            goal: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_update_skips_blank_and_zero_fields() {
        let user = sample_user();
        let update = ProfileUpdate {
            first_name: Some("   ".to_string()),
            last_name: Some("Smith".to_string()),
            weight: Some(0),
            height: Some(180),
            ..Default::default()
        };

        let updated = update.apply(user.clone());

        assert_eq!(updated.first_name, "Test");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.weight, Some(70));
        assert_eq!(updated.height, Some(180));
        assert_eq!(updated.email, user.email);
    }

    #[test]
    fn test_nutrition_scaling_rounds_to_two_places() {
        let per_100g = NutritionFacts {
            calories: 52.0,
            protein: 0.3,
            fat: 0.2,
            carbohydrates: 13.333,
        };

        let scaled = per_100g.scaled_to(150.0);
        assert_eq!(scaled.calories, 78.0);
        assert_eq!(scaled.protein, 0.45);
        assert_eq!(scaled.fat, 0.3);

        let unscaled = per_100g.scaled_to(100.0);
        assert_eq!(unscaled.carbohydrates, 13.33);
    }

    #[test]
    fn test_meal_type_parsing_is_case_insensitive() {
        assert_eq!("Lunch".parse::<MealType>(), Ok(MealType::Lunch));
        assert_eq!(" snack ".parse::<MealType>(), Ok(MealType::Snack));
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_meal_update_keeps_unset_fields() {
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meal_type: MealType::Lunch,
            food_name: "apple".to_string(),
            quantity_grams: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
            nutrition: NutritionFacts {
                calories: 52.0,
                protein: 0.3,
                fat: 0.2,
                carbohydrates: 14.0,
            },
        };
        let update = MealUpdate {
            meal_type: Some(MealType::Dinner),
            food_name: Some("chicken breast".to_string()),
            quantity_grams: Some(150.0),
            calories: Some(165.0),
            ..Default::default()
        };

        let updated = update.apply(meal.clone());

        assert_eq!(updated.meal_type, MealType::Dinner);
        assert_eq!(updated.food_name, "chicken breast");
        assert_eq!(updated.quantity_grams, 150.0);
        assert_eq!(updated.date, meal.date);
        assert_eq!(updated.nutrition.calories, 165.0);
        assert_eq!(updated.nutrition.protein, 0.3);
    }
}
