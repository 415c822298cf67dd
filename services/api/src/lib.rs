//! services/api/src/lib.rs
//!
//! HTTP service for the fitness tracker: auth, profile, workouts, sleep,
//! meals and nutrition lookup on top of the `fitness_core` ports.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
