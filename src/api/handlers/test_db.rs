//! Shared database fixture for handler tests.
//!
//! Starts a throwaway Postgres container and applies the crate migrations.
//! Construction fails (and the caller returns early) when no container
//! runtime is available, so these tests skip instead of erroring on
//! machines without Docker/Podman.

use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};
use test_support::{TestNetwork, postgres::PostgresContainer, runtime};

pub(crate) struct TestDb {
    _postgres: PostgresContainer,
    pub(crate) pool: PgPool,
}

impl TestDb {
    pub(crate) async fn new(prefix: &str) -> Result<Self> {
        if let Err(err) = runtime::ensure_container_runtime() {
            eprintln!("Skipping integration test: {err}");
            return Err(err);
        }

        let network = TestNetwork::new(prefix);
        let postgres = PostgresContainer::start(network.name()).await?;
        postgres.wait_until_ready().await?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&postgres.admin_dsn())
            .await
            .context("failed to connect test pool")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply migrations")?;

        Ok(Self {
            _postgres: postgres,
            pool,
        })
    }
}
