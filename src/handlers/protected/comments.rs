use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use super::caller_body;
use crate::app::AppState;
use crate::database::models::Comment;
use crate::middleware::{ApiResponse, ApiResult, CallerIdentity};
use crate::services::{CommentInput, Deleted};

/// POST /api/comments/:product_id - Comment on a product as the caller
///
/// Expected Input:
/// ```json
/// { "content": "Nice!" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(product_id): Path<String>,
    payload: Result<Json<CommentInput>, JsonRejection>,
) -> ApiResult<Comment> {
    let input = caller_body(&identity, payload)?;
    let comment = state.comments.create(identity.caller(), &product_id, input).await?;
    Ok(ApiResponse::created(comment))
}

/// DELETE /api/comments/:comment_id - Author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(comment_id): Path<String>,
) -> ApiResult<Deleted> {
    let deleted = state.comments.delete(identity.caller(), &comment_id).await?;
    Ok(ApiResponse::success(deleted))
}
