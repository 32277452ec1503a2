use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Comment, NewComment, NewProduct, Product, ProductChanges, User, UserProfile};

/// Failures reported by a persistence gateway
#[derive(Debug, Error)]
pub enum StorageError {
    /// An insert referenced a row that no longer exists (foreign key violation)
    #[error("referenced record does not exist: {0}")]
    MissingReference(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StorageError::MissingReference(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::Unavailable(err.to_string())
            }
            _ => StorageError::Sqlx(err),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record-level access to users, products and comments.
///
/// Every call is a single independent operation; implementations only
/// guarantee atomicity per call.
#[async_trait]
pub trait MarketplaceGateway: Send + Sync {
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>>;
    /// Insert the profile, or overwrite its fields when the id already exists
    async fn upsert_user(&self, profile: UserProfile) -> StorageResult<User>;

    async fn list_products(&self) -> StorageResult<Vec<Product>>;
    async fn list_products_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Product>>;
    async fn get_product(&self, id: Uuid) -> StorageResult<Option<Product>>;
    async fn create_product(&self, product: NewProduct) -> StorageResult<Product>;
    /// Returns `None` when the product vanished before the write
    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StorageResult<Option<Product>>;
    /// Returns whether a row was removed. Comments on the product go with it.
    async fn delete_product(&self, id: Uuid) -> StorageResult<bool>;

    async fn get_comment(&self, id: Uuid) -> StorageResult<Option<Comment>>;
    async fn list_comments_for_product(&self, product_id: Uuid) -> StorageResult<Vec<Comment>>;
    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment>;
    async fn delete_comment(&self, id: Uuid) -> StorageResult<bool>;

    async fn health_check(&self) -> StorageResult<()>;
    fn backend_name(&self) -> &'static str;
}
