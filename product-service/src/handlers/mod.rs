//! HTTP handlers for product-service.

pub mod health;
pub mod products;

pub use health::{health_check, metrics_endpoint, readiness_check};
