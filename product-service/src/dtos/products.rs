use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Product, ProductChanges};

/// Body of `POST /api/products` and `PUT /api/products/:id`. Every field is
/// optional here; presence rules are applied by `ProductChanges`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl From<ProductRequest> for ProductChanges {
    fn from(req: ProductRequest) -> Self {
        ProductChanges::new(req.name, req.price, req.category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_hex(),
            name: product.name,
            price: product.price,
            category: product.category,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub message: String,
    pub product: ProductResponse,
}

impl ProductEnvelope {
    pub fn new(message: &str, product: Product) -> Self {
        Self {
            message: message.to_string(),
            product: product.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub message: String,
    pub count: usize,
    pub products: Vec<ProductResponse>,
}
