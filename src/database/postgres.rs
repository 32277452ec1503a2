use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::gateway::{MarketplaceGateway, StorageResult};
use super::manager::DatabaseManager;
use super::models::{Comment, NewComment, NewProduct, Product, ProductChanges, User, UserProfile};

const PRODUCT_COLUMNS: &str = "id, title, description, image_url, user_id, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, content, user_id, product_id, created_at";
const USER_COLUMNS: &str = "id, email, name, image_url, created_at, updated_at";

/// Postgres-backed gateway. Every method is a single statement.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MarketplaceGateway for PgGateway {
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert_user(&self, profile: UserProfile) -> StorageResult<User> {
        // updated_at only moves when a field actually changes
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                image_url = EXCLUDED.image_url,
                updated_at = CASE
                    WHEN (users.email, users.name, users.image_url)
                        IS DISTINCT FROM (EXCLUDED.email, EXCLUDED.name, EXCLUDED.image_url)
                    THEN now()
                    ELSE users.updated_at
                END
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&profile.id)
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(&profile.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let products = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
        Ok(products)
    }

    async fn list_products_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> StorageResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> StorageResult<Product> {
        let sql = format!(
            "INSERT INTO products (id, title, description, image_url, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PRODUCT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.title)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(&product.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StorageResult<Option<Product>> {
        let sql = format!(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.image_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_product(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_comment(&self, id: Uuid) -> StorageResult<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn list_comments_for_product(&self, product_id: Uuid) -> StorageResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE product_id = $1 ORDER BY created_at DESC"
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn create_comment(&self, comment: NewComment) -> StorageResult<Comment> {
        // The product_id foreign key turns a concurrently deleted product into MissingReference
        let sql = format!(
            "INSERT INTO comments (id, content, user_id, product_id) \
             VALUES ($1, $2, $3, $4) RETURNING {COMMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(&comment.content)
            .bind(&comment.user_id)
            .bind(comment.product_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn delete_comment(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StorageResult<()> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
