use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::error::{missing_required, WorkflowError, WorkflowResult};
use super::gate::{authenticate, gated_mutation, locate, ResourceKind};
use super::Deleted;
use crate::auth::CallerId;
use crate::database::models::{Comment, NewComment, Product};
use crate::database::{MarketplaceGateway, StorageError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentInput {
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct CommentService {
    gateway: Arc<dyn MarketplaceGateway>,
}

impl CommentService {
    pub fn new(gateway: Arc<dyn MarketplaceGateway>) -> Self {
        Self { gateway }
    }

    /// Comment on an existing product as the caller
    pub async fn create(
        &self,
        caller: Option<&CallerId>,
        product_id: &str,
        input: CommentInput,
    ) -> WorkflowResult<Comment> {
        let caller = authenticate(caller)?;

        let missing = missing_required(&[("content", input.content.as_deref())]);
        if !missing.is_empty() {
            return Err(WorkflowError::missing_fields("Comment content is required", missing));
        }

        let product: Product = locate(product_id, |key| self.gateway.get_product(key)).await?;

        // The product may be deleted between the lookup and the insert
        let comment = match self
            .gateway
            .create_comment(NewComment {
                content: input.content.unwrap_or_default(),
                user_id: caller.as_str().to_string(),
                product_id: product.id,
            })
            .await
        {
            Ok(comment) => comment,
            Err(StorageError::MissingReference(_)) => {
                return Err(WorkflowError::not_found(ResourceKind::Product, product_id));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Comment {} on product {} created by {}", comment.id, product.id, caller);
        Ok(comment)
    }

    pub async fn delete(&self, caller: Option<&CallerId>, id: &str) -> WorkflowResult<Deleted> {
        gated_mutation(
            caller,
            id,
            |key| self.gateway.get_comment(key),
            |comment: Comment| async move {
                if !self.gateway.delete_comment(comment.id).await? {
                    return Err(WorkflowError::not_found(ResourceKind::Comment, id));
                }
                info!("Comment {} deleted by {}", comment.id, comment.user_id);
                Ok(Deleted::new(ResourceKind::Comment, comment.id))
            },
        )
        .await
    }
}
