pub mod db;
pub mod usda;

pub use db::DbAdapter;
pub use usda::UsdaNutritionAdapter;
