pub mod domain;
pub mod meal_parser;
pub mod ports;
pub mod sleep;

pub use domain::{
    FoodNutrition, Meal, MealType, MealUpdate, NewMeal, NewUser, NewWorkout, NutritionFacts,
    ProfileUpdate, SleepRecord, User, UserCredentials, Workout,
};
pub use meal_parser::{tokenize, tokenize_with, MealParseError, TokenizedFoodItem};
pub use ports::{DatabaseService, NutritionLookupService, PortError, PortResult};
pub use sleep::{compute_duration, SleepInterval, TimeParseError};
