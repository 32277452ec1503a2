use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use super::caller_body;
use crate::app::AppState;
use crate::error::ApiError;
use crate::database::models::Product;
use crate::middleware::{ApiResponse, ApiResult, CallerIdentity};
use crate::services::{Deleted, ProductInput};

/// GET /api/products/my - Products owned by the caller
pub async fn mine(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<Vec<Product>> {
    let products = state.products.list_mine(identity.caller()).await?;
    Ok(ApiResponse::success(products))
}

/// POST /api/products - Create a product owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "Lamp", "description": "Desk lamp", "imageUrl": "https://..." }
/// ```
/// All three fields are required. Answers 201 with the stored product.
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Product> {
    let input = caller_body(&identity, payload)?;
    let product = state.products.create(identity.caller(), input).await?;
    Ok(ApiResponse::created(product))
}

/// PUT /api/products/:id - Partial update, owner only
///
/// A malformed body is reported only to the owner; everyone else gets the
/// gate's answer (401, 404 or 403).
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<Product> {
    let input = payload.map(|Json(input)| input).map_err(ApiError::from);
    let product = state.products.update(identity.caller(), &id, input).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/products/:id - Delete a product and its comments, owner only
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.products.delete(identity.caller(), &id).await?;
    Ok(ApiResponse::success(deleted))
}
