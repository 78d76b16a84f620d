// Demo Content Fixture - the event overview page plus a populated homepage

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::ContentConfig;
use crate::data_seeder::fake_content::FakeContentGenerator;
use crate::data_seeder::homepage::HomepagePopulator;
use crate::data_seeder::page_creator::PageCreator;
use crate::data_seeder::page_spec::{load_page_specs, PageSpec};
use crate::data_seeder::DocumentFixture;
use crate::error::{AppError, AppResult};
use crate::infrastructure::document_manager::DocumentManager;
use crate::infrastructure::event_repository::EventRepository;
use crate::infrastructure::path_cleanup::PathCleanup;
use crate::models::Document;

/// Title of the page the homepage links to as its event overview
pub const EVENT_OVERVIEW_TITLE: &str = "Events";

pub struct DemoContentFixture {
    events: Arc<dyn EventRepository>,
    path_cleanup: Arc<dyn PathCleanup>,
    content: ContentConfig,
    rng_seed: Option<u64>,
    pages_file: Option<PathBuf>,
}

impl DemoContentFixture {
    pub fn new(
        events: Arc<dyn EventRepository>,
        path_cleanup: Arc<dyn PathCleanup>,
        content: ContentConfig,
    ) -> Self {
        Self {
            events,
            path_cleanup,
            content,
            rng_seed: None,
            pages_file: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Extra pages, created after the built-in ones
    pub fn with_pages_file(mut self, pages_file: Option<PathBuf>) -> Self {
        self.pages_file = pages_file;
        self
    }

    pub fn default_pages(generator: &mut FakeContentGenerator) -> Vec<PageSpec> {
        vec![PageSpec::new(EVENT_OVERVIEW_TITLE)
            .navigation_context("main")
            .structure_type("event_overview")
            .field("article", json!(generator.paragraphs_html(3)))]
    }

    async fn load_pages(
        &self,
        generator: &mut FakeContentGenerator,
        documents: &dyn DocumentManager,
    ) -> AppResult<HashMap<String, Document>> {
        let mut specs = Self::default_pages(generator);
        if let Some(pages_file) = &self.pages_file {
            specs.extend(load_page_specs(pages_file)?);
        }

        let creator = PageCreator::new(documents, self.path_cleanup.as_ref(), &self.content);
        let mut pages = HashMap::new();
        for spec in specs {
            let page = creator.create_page(spec).await?;
            pages.insert(page.title.clone(), page);
        }

        Ok(pages)
    }
}

#[async_trait]
impl DocumentFixture for DemoContentFixture {
    fn name(&self) -> &str {
        "demo_content"
    }

    fn order(&self) -> i32 {
        10
    }

    async fn load(&self, documents: &dyn DocumentManager) -> AppResult<()> {
        let mut generator = FakeContentGenerator::new(&self.content.locale, self.rng_seed);

        let pages = self.load_pages(&mut generator, documents).await?;
        let event_overview_page = pages.get(EVENT_OVERVIEW_TITLE).ok_or_else(|| {
            AppError::NotFound(format!("page '{}' was not created", EVENT_OVERVIEW_TITLE))
        })?;

        HomepagePopulator::new(documents, self.events.as_ref(), &self.content)
            .populate(&mut generator, event_overview_page)
            .await?;

        documents.flush().await?;

        info!("Loaded {} demo pages and the homepage", pages.len());
        Ok(())
    }
}
