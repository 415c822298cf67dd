//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use fitness_core::ports::{DatabaseService, NutritionLookupService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub nutrition: Arc<dyn NutritionLookupService>,
    pub config: Arc<Config>,
}
