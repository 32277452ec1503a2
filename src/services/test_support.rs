//! Gateway double for driving the services into storage failures.
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::database::models::{Comment, NewComment, NewProduct, Product, ProductChanges, User, UserProfile};
use crate::database::{MarketplaceGateway, MemoryGateway, StorageError, StorageResult};

/// Delegates to a `MemoryGateway`, with switches for the failures a shared
/// database can produce between a lookup and the write that follows it.
#[derive(Default)]
pub struct FaultyGateway {
    pub inner: MemoryGateway,
    /// Delete the target product right before a comment is inserted on it
    pub drop_product_before_comment: AtomicBool,
    /// Remove the target row right before an update or delete reaches it
    pub vanish_before_write: AtomicBool,
    /// Fail every write with a backend error
    pub broken_writes: AtomicBool,
}

impl FaultyGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_writes(&self) -> StorageResult<()> {
        if self.broken_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Sqlx(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    fn vanishes(&self) -> bool {
        self.vanish_before_write.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketplaceGateway for FaultyGateway {
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn upsert_user(&self, profile: UserProfile) -> StorageResult<User> {
        self.check_writes()?;
        self.inner.upsert_user(profile).await
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        self.inner.list_products().await
    }

    async fn list_products_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Product>> {
        self.inner.list_products_by_owner(owner_id).await
    }

    async fn get_product(&self, id: Uuid) -> StorageResult<Option<Product>> {
        self.inner.get_product(id).await
    }

    async fn create_product(&self, product: NewProduct) -> StorageResult<Product> {
        self.inner.create_product(product).await
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StorageResult<Option<Product>> {
        self.check_writes()?;
        if self.vanishes() {
            self.inner.delete_product(id).await?;
        }
        self.inner.update_product(id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> StorageResult<bool> {
        self.check_writes()?;
        if self.vanishes() {
            self.inner.delete_product(id).await?;
        }
        self.inner.delete_product(id).await
    }

    async fn get_comment(&self, id: Uuid) -> StorageResult<Option<Comment>> {
        self.inner.get_comment(id).await
    }

    async fn list_comments_for_product(&self, product_id: Uuid) -> StorageResult<Vec<Comment>> {
        self.inner.list_comments_for_product(product_id).await
    }

    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment> {
        self.check_writes()?;
        if self.drop_product_before_comment.load(Ordering::SeqCst) {
            self.inner.delete_product(comment.product_id).await?;
        }
        self.inner.create_comment(comment).await
    }

    async fn delete_comment(&self, id: Uuid) -> StorageResult<bool> {
        self.check_writes()?;
        if self.vanishes() {
            self.inner.delete_comment(id).await?;
        }
        self.inner.delete_comment(id).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }

    fn backend_name(&self) -> &'static str {
        "faulty"
    }
}
