use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::{IdentityResolver, JwtIdentityResolver};
use crate::config::{AppConfig, SecurityConfig, StoreBackend};
use crate::database::{DatabaseManager, MarketplaceGateway, MemoryGateway, PgGateway};
use crate::handlers::{protected, public};
use crate::middleware::caller_identity_middleware;
use crate::services::{CommentService, ProductService, UserService};

/// Shared, cheaply cloneable handler state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn MarketplaceGateway>,
    pub identity: Arc<dyn IdentityResolver>,
    pub products: ProductService,
    pub comments: CommentService,
    pub users: UserService,
}

impl AppState {
    pub fn new(gateway: Arc<dyn MarketplaceGateway>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            products: ProductService::new(gateway.clone()),
            comments: CommentService::new(gateway.clone()),
            users: UserService::new(gateway.clone()),
            gateway,
            identity,
        }
    }

    /// Wire the configured gateway and the session-token resolver
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let gateway: Arc<dyn MarketplaceGateway> = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                if config.database.run_migrations {
                    DatabaseManager::migrate(&pool).await?;
                }
                Arc::new(PgGateway::new(pool))
            }
            StoreBackend::Memory => {
                warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryGateway::new())
            }
        };
        info!("Storage backend: {}", gateway.backend_name());

        let identity = Arc::new(JwtIdentityResolver::new(&config.security)?);
        Ok(Self::new(gateway, identity))
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(product_routes())
        .merge(comment_routes())
        .merge(user_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(security))
                .layer(from_fn_with_state(state.clone(), caller_identity_middleware)),
        )
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(public::products::list).post(protected::products::create),
        )
        .route("/api/products/my", get(protected::products::mine))
        .route(
            "/api/products/:id",
            get(public::products::show)
                .put(protected::products::update)
                .delete(protected::products::delete),
        )
}

fn comment_routes() -> Router<AppState> {
    // One path segment serves both: a product id on POST, a comment id on DELETE
    Router::new().route(
        "/api/comments/:id",
        post(protected::comments::create).delete(protected::comments::delete),
    )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/sync", post(protected::users::sync))
        .route("/api/users/me", get(protected::users::me))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
