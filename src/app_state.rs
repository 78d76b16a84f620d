use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

use crate::{
    config::Config,
    data_seeder::{DemoContentFixture, FixtureExecutor},
    error::AppResult,
    infrastructure::{
        database, DefaultPathCleanup, PathCleanup, SqliteDocumentManager, SqliteEventRepository,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub documents: Arc<SqliteDocumentManager>,
    pub events: Arc<SqliteEventRepository>,
    pub path_cleanup: Arc<dyn PathCleanup>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let pool = database::connect(&config.database).await?;
        Self::with_pool(config, pool).await
    }

    /// Wire services on an existing pool and prepare the schema
    pub async fn with_pool(config: Config, pool: SqlitePool) -> AppResult<Self> {
        let path_cleanup: Arc<dyn PathCleanup> = Arc::new(DefaultPathCleanup::new());

        let documents = Arc::new(SqliteDocumentManager::new(pool.clone(), path_cleanup.clone()));
        documents.initialize().await?;
        documents
            .ensure_home(&config.content.content_root(), &config.content.locale)
            .await?;

        let events = Arc::new(SqliteEventRepository::new(pool.clone()));
        events.initialize().await?;

        Ok(Self {
            config,
            pool,
            documents,
            events,
            path_cleanup,
        })
    }

    /// The document fixtures of a seeding run
    pub fn fixture_executor(&self) -> FixtureExecutor {
        FixtureExecutor::new().add(
            DemoContentFixture::new(
                self.events.clone(),
                self.path_cleanup.clone(),
                self.config.content.clone(),
            )
            .with_seed(self.config.seed.rng_seed)
            .with_pages_file(self.config.seed.pages_file.clone()),
        )
    }
}
