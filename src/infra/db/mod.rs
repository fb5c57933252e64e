//! Postgres-backed repository implementations.

mod activity;
mod posts;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};
use tracing::info;

use crate::config::DatabaseSettings;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Build the shared pool and verify connectivity within the configured
    /// connect timeout.
    ///
    /// When every connection is checked out, callers wait up to
    /// `acquire_timeout` for one to be released instead of failing at once.
    pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.get())
            .min_connections(settings.min_connections)
            .idle_timeout(Some(settings.idle_timeout))
            .acquire_timeout(settings.acquire_timeout)
            .connect_lazy_with(settings.connect_options.clone());

        tokio::time::timeout(settings.connect_timeout, query("SELECT 1").execute(&pool))
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;

        info!(
            target = "quill::db",
            max_connections = settings.max_connections.get(),
            min_connections = settings.min_connections,
            "Connected to postgres"
        );
        Ok(pool)
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
