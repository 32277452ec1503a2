use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::{Product, ProductDetail};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/products - All products, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state.products.list_all().await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/products/:id - One product with its owner and comments
///
/// Unknown and malformed ids both answer 404.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ProductDetail> {
    let detail = state.products.detail(&id).await?;
    Ok(ApiResponse::success(detail))
}
