pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpResponse;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use config::Settings;
pub use error::{AppError, AuthError};
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::AuthService;
pub use db::DbOperations;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for unmatched routes; JSON body like every other response.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not Found" }))
}

/// Application state shared across all handlers. Built once at startup and
/// passed explicitly; there is no module-global connection state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: DbOperations,
    pub auth_service: AuthService,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database.url)
            .await?;

        Ok(Self::with_pool(config, pool))
    }

    /// Assembles state around an existing pool; tests use this with a lazy
    /// pool so no database is needed to stand up the service.
    pub fn with_pool(config: Settings, pool: PgPool) -> Self {
        let db = DbOperations::new(Arc::new(pool));
        let auth_service = AuthService::new(
            db.clone(),
            config.auth.jwt_secret.clone(),
            config.auth.token_expiry_hours,
        );

        Self {
            config: Arc::new(config),
            db,
            auth_service,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.db.pool().close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_app_state_clone_shares_config() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("Failed to create lazy pool");

        let state = AppState::with_pool(config, pool);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));
    }
}
