use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::CallerId;

/// Caller resolved for the current request; `None` for anonymous requests
#[derive(Clone, Debug)]
pub struct CallerIdentity(pub Option<CallerId>);

impl CallerIdentity {
    pub fn caller(&self) -> Option<&CallerId> {
        self.0.as_ref()
    }
}

/// Resolve the caller once per request and hand it to handlers via extensions.
/// Never rejects; the workflow decides whether a caller is required.
pub async fn caller_identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let caller = state.identity.resolve_caller(request.headers());
    if let Some(caller) = &caller {
        tracing::debug!("Resolved caller {} for {} {}", caller, request.method(), request.uri().path());
    }

    request.extensions_mut().insert(CallerIdentity(caller));
    next.run(request).await
}
