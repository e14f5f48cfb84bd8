use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{NewProduct, Product, ProductChanges};
use crate::services::ProductStore;

/// Process-local store for development runs and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, input: NewProduct) -> Result<Product, AppError> {
        let product = Product::new(input);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply(changes);
            product.clone()
        }))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;
        let removed = products
            .iter()
            .position(|p| p.id == id)
            .map(|index| products.remove(index));
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
