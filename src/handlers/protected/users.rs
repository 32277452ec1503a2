use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use super::caller_body;
use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CallerIdentity};
use crate::services::UserInput;

/// POST /api/users/sync - Create or refresh the caller's profile
///
/// Expected Input:
/// ```json
/// { "email": "a@x.com", "name": "Alice", "imageUrl": "https://..." }
/// ```
/// The user id always comes from the session token, never from the body.
pub async fn sync(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<User> {
    let input = caller_body(&identity, payload)?;
    let user = state.users.sync(identity.caller(), input).await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/users/me - The caller's stored profile
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<User> {
    let user = state.users.current(identity.caller()).await?;
    Ok(ApiResponse::success(user))
}
