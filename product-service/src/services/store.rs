use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

use crate::models::{NewProduct, Product, ProductChanges};

/// Persistence boundary for products. The store assigns ids and timestamps.
///
/// Lookups by id return `Ok(None)` when nothing matches; every other failure is
/// an `AppError` that the handlers pass through unchanged.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, input: NewProduct) -> Result<Product, AppError>;

    /// All products in insertion order.
    async fn find_all(&self) -> Result<Vec<Product>, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError>;

    /// Applies `changes` and returns the document as it is after the update.
    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError>;

    /// Removes the product and returns its last state.
    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
