use std::sync::Arc;

use redis::Client as RedisClient;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, filter, images, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, storage, utils};

use auth::jwt::JwtService;
use background_task::{CleanupLog, CleanupQueue};
use repositories::sqlx_repo::SqlxListingRepo;
use storage::http_store::HttpObjectStore;
use use_cases::{listings::ListingHandler, session::SessionHandler};

pub struct AppState {
    pub listings: AppListingHandler,
    pub sessions: AppSessionHandler,
    pub cleanup_log: CleanupLog,
}

pub type AppListingHandler = ListingHandler<SqlxListingRepo, HttpObjectStore>;
pub type AppSessionHandler = SessionHandler<JwtService>;

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        pool: sqlx::PgPool,
        store: Arc<HttpObjectStore>,
        cleanup: CleanupQueue,
        cleanup_log: CleanupLog,
    ) -> Self {
        let listings = ListingHandler::new(
            SqlxListingRepo::new(pool),
            store,
            cleanup,
            config.max_images_per_listing,
            config.sample_listings_fallback,
        );

        let redis_client = config.redis_url.as_ref().and_then(|url| {
            RedisClient::open(url.as_str())
                .map_err(|e| tracing::error!("Redis connection error: {}", e))
                .ok()
        });
        if redis_client.is_none() {
            tracing::warn!("Redis not configured, sign-out cannot revoke tokens");
        }

        let sessions = SessionHandler::new(JwtService::new(config), redis_client);

        AppState {
            listings,
            sessions,
            cleanup_log,
        }
    }
}
