//! In-memory gateway.
//!
//! Records live in `HashMap`s behind `tokio::sync::RwLock`, so the gateway can
//! be shared across request handlers. Used by tests and by the server when no
//! database is configured. Nothing survives a restart.
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::gateway::{MarketplaceGateway, StorageError, StorageResult};
use super::models::{Comment, NewComment, NewProduct, Product, ProductChanges, User, UserProfile};

#[derive(Clone, Default)]
pub struct MemoryGateway {
    users: Arc<RwLock<HashMap<String, User>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    comments: Arc<RwLock<HashMap<Uuid, Comment>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl MarketplaceGateway for MemoryGateway {
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn upsert_user(&self, profile: UserProfile) -> StorageResult<User> {
        let mut users = self.users.write().await;
        let now = Utc::now();
        let user = match users.get(&profile.id) {
            Some(existing) if existing.matches(&profile) => existing.clone(),
            Some(existing) => User {
                email: profile.email,
                name: profile.name,
                image_url: profile.image_url,
                updated_at: now,
                ..existing.clone()
            },
            None => User {
                id: profile.id,
                email: profile.email,
                name: profile.name,
                image_url: profile.image_url,
                created_at: now,
                updated_at: now,
            },
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        let products = self.products.read().await.values().cloned().collect();
        Ok(newest_first(products, |p| p.created_at))
    }

    async fn list_products_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Product>> {
        let products = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(products, |p| p.created_at))
    }

    async fn get_product(&self, id: Uuid) -> StorageResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> StorageResult<Product> {
        let now = Utc::now();
        let created = Product {
            id: Uuid::new_v4(),
            title: product.title,
            description: product.description,
            image_url: product.image_url,
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StorageResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> StorageResult<bool> {
        // Lock order: products then comments, same as create_comment
        let mut products = self.products.write().await;
        let mut comments = self.comments.write().await;
        let removed = products.remove(&id).is_some();
        if removed {
            comments.retain(|_, c| c.product_id != id);
        }
        Ok(removed)
    }

    async fn get_comment(&self, id: Uuid) -> StorageResult<Option<Comment>> {
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn list_comments_for_product(&self, product_id: Uuid) -> StorageResult<Vec<Comment>> {
        let comments = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.product_id == product_id)
            .cloned()
            .collect();
        Ok(newest_first(comments, |c| c.created_at))
    }

    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment> {
        let products = self.products.read().await;
        if !products.contains_key(&comment.product_id) {
            return Err(StorageError::MissingReference(format!(
                "product {}",
                comment.product_id
            )));
        }
        let created = Comment {
            id: Uuid::new_v4(),
            content: comment.content,
            user_id: comment.user_id,
            product_id: comment.product_id,
            created_at: Utc::now(),
        };
        self.comments.write().await.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete_comment(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.comments.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
