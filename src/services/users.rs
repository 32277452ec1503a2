use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::error::{missing_required, WorkflowError, WorkflowResult};
use super::gate::{authenticate, ResourceKind};
use crate::auth::CallerId;
use crate::database::models::{User, UserProfile};
use crate::database::MarketplaceGateway;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    gateway: Arc<dyn MarketplaceGateway>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn MarketplaceGateway>) -> Self {
        Self { gateway }
    }

    /// Create or refresh the caller's own profile. Repeating the call with the
    /// same input leaves the stored record unchanged.
    pub async fn sync(&self, caller: Option<&CallerId>, input: UserInput) -> WorkflowResult<User> {
        let caller = authenticate(caller)?;

        let missing = missing_required(&[
            ("email", input.email.as_deref()),
            ("name", input.name.as_deref()),
            ("imageUrl", input.image_url.as_deref()),
        ]);
        if !missing.is_empty() {
            return Err(WorkflowError::missing_fields(
                "Email, name and imageUrl are required",
                missing,
            ));
        }

        let user = self
            .gateway
            .upsert_user(UserProfile {
                id: caller.as_str().to_string(),
                email: input.email.unwrap_or_default(),
                name: input.name.unwrap_or_default(),
                image_url: input.image_url.unwrap_or_default(),
            })
            .await?;

        info!("User {} synced", user.id);
        Ok(user)
    }

    pub async fn current(&self, caller: Option<&CallerId>) -> WorkflowResult<User> {
        let caller = authenticate(caller)?;
        self.gateway
            .get_user(caller.as_str())
            .await?
            .ok_or_else(|| WorkflowError::not_found(ResourceKind::User, caller.as_str()))
    }
}
