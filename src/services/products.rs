use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::{empty_when_present, missing_required, WorkflowError, WorkflowResult};
use super::gate::{authenticate, gated_mutation, locate, ResourceKind};
use super::Deleted;
use crate::auth::CallerId;
use crate::database::models::{CommentWithAuthor, NewProduct, Product, ProductChanges, ProductDetail, User};
use crate::database::MarketplaceGateway;

/// Product fields as submitted by clients. Required on create, optional on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ProductInput {
    fn fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("title", self.title.as_deref()),
            ("description", self.description.as_deref()),
            ("imageUrl", self.image_url.as_deref()),
        ]
    }
}

#[derive(Clone)]
pub struct ProductService {
    gateway: Arc<dyn MarketplaceGateway>,
}

impl ProductService {
    pub fn new(gateway: Arc<dyn MarketplaceGateway>) -> Self {
        Self { gateway }
    }

    /// Every product, newest first. Public.
    pub async fn list_all(&self) -> WorkflowResult<Vec<Product>> {
        Ok(self.gateway.list_products().await?)
    }

    /// Products owned by the caller
    pub async fn list_mine(&self, caller: Option<&CallerId>) -> WorkflowResult<Vec<Product>> {
        let caller = authenticate(caller)?;
        Ok(self.gateway.list_products_by_owner(caller.as_str()).await?)
    }

    /// Product with its owner and comments. Public.
    pub async fn detail(&self, id: &str) -> WorkflowResult<ProductDetail> {
        let product: Product = locate(id, |key| self.gateway.get_product(key)).await?;
        let user = self.gateway.get_user(&product.user_id).await?;
        let comments = self.gateway.list_comments_for_product(product.id).await?;

        let mut authors: HashMap<String, Option<User>> = HashMap::new();
        let mut with_authors = Vec::with_capacity(comments.len());
        for comment in comments {
            if !authors.contains_key(&comment.user_id) {
                let author = self.gateway.get_user(&comment.user_id).await?;
                authors.insert(comment.user_id.clone(), author);
            }
            let user = authors.get(&comment.user_id).cloned().flatten();
            with_authors.push(CommentWithAuthor { comment, user });
        }

        Ok(ProductDetail {
            product,
            user,
            comments: with_authors,
        })
    }

    pub async fn create(&self, caller: Option<&CallerId>, input: ProductInput) -> WorkflowResult<Product> {
        let caller = authenticate(caller)?;

        let missing = missing_required(&input.fields());
        if !missing.is_empty() {
            return Err(WorkflowError::missing_fields(
                "Title, description and imageUrl are required",
                missing,
            ));
        }

        let product = self
            .gateway
            .create_product(NewProduct {
                title: input.title.unwrap_or_default(),
                description: input.description.unwrap_or_default(),
                image_url: input.image_url.unwrap_or_default(),
                user_id: caller.as_str().to_string(),
            })
            .await?;

        info!("Product {} created by {}", product.id, caller);
        Ok(product)
    }

    /// Apply the supplied fields to a product the caller owns.
    ///
    /// `input` is checked only after the gate, so a caller who does not own the
    /// product learns nothing from a malformed or empty body.
    pub async fn update<E>(&self, caller: Option<&CallerId>, id: &str, input: Result<ProductInput, E>) -> Result<Product, E>
    where
        E: From<WorkflowError>,
    {
        gated_mutation(
            caller,
            id,
            |key| self.gateway.get_product(key),
            |product: Product| self.apply_changes(product, id, input),
        )
        .await
    }

    async fn apply_changes<E>(&self, product: Product, id: &str, input: Result<ProductInput, E>) -> Result<Product, E>
    where
        E: From<WorkflowError>,
    {
        let input = input?;
        let empty = empty_when_present(&input.fields());
        if !empty.is_empty() {
            return Err(WorkflowError::empty_fields("Product fields cannot be empty", empty).into());
        }

        let changes = ProductChanges {
            title: input.title,
            description: input.description,
            image_url: input.image_url,
        };
        if changes.is_empty() {
            return Ok(product);
        }

        let updated = self
            .gateway
            .update_product(product.id, changes)
            .await
            .map_err(WorkflowError::from)?;
        match updated {
            Some(updated) => {
                info!("Product {} updated by {}", updated.id, updated.user_id);
                Ok(updated)
            }
            None => Err(WorkflowError::not_found(ResourceKind::Product, id).into()),
        }
    }

    pub async fn delete(&self, caller: Option<&CallerId>, id: &str) -> WorkflowResult<Deleted> {
        gated_mutation(
            caller,
            id,
            |key| self.gateway.get_product(key),
            |product: Product| async move {
                if !self.gateway.delete_product(product.id).await? {
                    return Err(WorkflowError::not_found(ResourceKind::Product, id));
                }
                info!("Product {} deleted by {}", product.id, product.user_id);
                Ok(Deleted::new(ResourceKind::Product, product.id))
            },
        )
        .await
    }
}
