// Data Seeder - fixtures that load demo content through the document manager

use async_trait::async_trait;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::document_manager::DocumentManager;

pub mod document_fixture;
pub mod event_fixture;
pub mod fake_content;
pub mod homepage;
pub mod page_creator;
pub mod page_spec;

pub use document_fixture::DemoContentFixture;
pub use event_fixture::EventFixture;
pub use fake_content::FakeContentGenerator;
pub use homepage::HomepagePopulator;
pub use page_creator::{DraftPage, PageCreator};
pub use page_spec::{PageSpec, CURRENT_DOCUMENT};

#[async_trait]
pub trait DocumentFixture: Send + Sync {
    fn name(&self) -> &str;

    /// Lower orders load first
    fn order(&self) -> i32;

    async fn load(&self, documents: &dyn DocumentManager) -> AppResult<()>;
}

#[derive(Default)]
pub struct FixtureExecutor {
    fixtures: Vec<Box<dyn DocumentFixture>>,
}

impl FixtureExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: DocumentFixture + 'static>(mut self, fixture: F) -> Self {
        self.fixtures.push(Box::new(fixture));
        self
    }

    /// Load every fixture by ascending order; returns the names in load order
    pub async fn execute(&self, documents: &dyn DocumentManager) -> AppResult<Vec<String>> {
        let mut ordered: Vec<&dyn DocumentFixture> =
            self.fixtures.iter().map(|fixture| fixture.as_ref()).collect();
        ordered.sort_by_key(|fixture| fixture.order());

        let mut loaded = Vec::with_capacity(ordered.len());
        for fixture in ordered {
            info!("Loading fixture {} (order {})", fixture.name(), fixture.order());
            fixture.load(documents).await?;
            loaded.push(fixture.name().to_string());
        }

        Ok(loaded)
    }
}
