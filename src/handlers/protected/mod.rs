// Protected handlers: the workflow answers 401 when no caller was resolved.
pub mod comments;
pub mod products;
pub mod users;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::ApiError;
use crate::middleware::CallerIdentity;
use crate::services::WorkflowError;

/// Request body of a caller-only endpoint. Anonymous requests get 401 before
/// any complaint about the body.
fn caller_body<T>(identity: &CallerIdentity, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    if identity.caller().is_none() {
        return Err(WorkflowError::Unauthenticated.into());
    }
    let Json(body) = payload?;
    Ok(body)
}
