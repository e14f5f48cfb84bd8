//! Product CRUD handlers.
//!
//! Identifier and payload checks run before the store is touched; a missing
//! document after a store call becomes a 404.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

use crate::dtos::{
    MessageResponse, ProductEnvelope, ProductListResponse, ProductRequest, ProductResponse,
};
use crate::models::ProductChanges;
use crate::services::metrics;
use crate::startup::AppState;

fn parse_product_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidIdentifier("Invalid product ID format".to_string()))
}

fn product_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Product not found"))
}

fn read_body(
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<ProductRequest, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))
}

pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to Product CRUD API".to_string(),
    })
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductEnvelope>), AppError> {
    let input = ProductChanges::from(read_body(payload)?).into_new_product()?;

    let product = state.store.insert(input).await?;

    tracing::info!(
        product_id = %product.id,
        category = %product.category,
        price = product.price,
        "Product created"
    );
    metrics::record_product_created();

    Ok((
        StatusCode::CREATED,
        Json(ProductEnvelope::new("Product created successfully", product)),
    ))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    let products: Vec<ProductResponse> = state
        .store
        .find_all()
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    tracing::debug!(count = products.len(), "Listing products");

    Ok(Json(ProductListResponse {
        message: "Products retrieved successfully".to_string(),
        count: products.len(),
        products,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, AppError> {
    let id = parse_product_id(&id)?;

    let product = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(product_not_found)?;

    Ok(Json(ProductEnvelope::new("Product retrieved successfully", product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductEnvelope>, AppError> {
    let id = parse_product_id(&id)?;
    let changes = ProductChanges::from(read_body(payload)?);
    changes.validate_update()?;

    tracing::info!(product_id = %id, changes = ?changes, "Updating product");

    let product = state
        .store
        .update_by_id(id, changes)
        .await?
        .ok_or_else(product_not_found)?;

    metrics::record_product_updated();

    Ok(Json(ProductEnvelope::new("Product updated successfully", product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductEnvelope>, AppError> {
    let id = parse_product_id(&id)?;

    let product = state
        .store
        .delete_by_id(id)
        .await?
        .ok_or_else(product_not_found)?;

    tracing::info!(product_id = %id, "Product deleted");
    metrics::record_product_deleted();

    Ok(Json(ProductEnvelope::new("Product deleted successfully", product)))
}
