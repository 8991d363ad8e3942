use crate::config::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared handles cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a pool that never connects unless a query runs.
    pub fn for_tests() -> Self {
        let config = Config::for_tests();
        let db = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy(&config.database_url)
            .expect("lazy pool from a well-formed URL");
        Self::new(db, config)
    }
}
