//! Shared identifiers, errors, and configuration for Bursar.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for schedules, budget plans, products and categories
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
