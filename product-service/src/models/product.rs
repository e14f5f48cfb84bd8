use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

pub const PRODUCTS_COLLECTION: &str = "products";

const AT_LEAST_ONE_FIELD: &str = "At least one field (name, price, or category) must be provided";

/// Persisted product document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: NewProduct) -> Self {
        let now = store_timestamp();
        Self {
            id: ObjectId::new(),
            name: input.name,
            price: input.price,
            category: input.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the supplied fields and refreshes `updated_at`.
    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        self.updated_at = store_timestamp();
    }
}

/// Current time truncated to the millisecond precision BSON dates keep.
pub fn store_timestamp() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

/// A fully validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
}

/// Normalized product fields as supplied by a client. Create and update both
/// run through these rules.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductChanges {
    #[validate(length(min = 1, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "Product category cannot be empty"))]
    pub category: Option<String>,
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

impl ProductChanges {
    pub fn new(name: Option<String>, price: Option<f64>, category: Option<String>) -> Self {
        Self {
            name: name.map(|s| s.trim().to_string()),
            price,
            category: category.map(|s| s.trim().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none()
    }

    /// Validates for creation: every field present and every rule satisfied.
    /// All failures are reported together.
    pub fn into_new_product(self) -> Result<NewProduct, AppError> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        // Presence, not truthiness: `price: 0` is a valid product.
        let required = [
            ("name", self.name.is_none(), "Product name is required"),
            ("price", self.price.is_none(), "Product price is required"),
            ("category", self.category.is_none(), "Product category is required"),
        ];
        for (field, missing, message) in required {
            if missing {
                errors.add(field, validation_error("required", message));
            }
        }

        match (self.name, self.price, self.category) {
            (Some(name), Some(price), Some(category)) if errors.errors().is_empty() => {
                Ok(NewProduct {
                    name,
                    price,
                    category,
                })
            }
            _ => Err(AppError::ValidationError(errors)),
        }
    }

    /// Validates for a partial update: at least one field, and each supplied
    /// field satisfies the same rules as on create.
    pub fn validate_update(&self) -> Result<(), AppError> {
        if self.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("__all__", validation_error("at_least_one", AT_LEAST_ONE_FIELD));
            return Err(AppError::ValidationError(errors));
        }

        self.validate()?;
        Ok(())
    }
}
