// Homepage Populator - fills the webspace home document with demo content

use serde_json::json;
use tracing::info;

use crate::config::ContentConfig;
use crate::core::strong_types::EventId;
use crate::data_seeder::fake_content::FakeContentGenerator;
use crate::error::{AppError, AppResult};
use crate::infrastructure::document_manager::{DocumentManager, PersistOptions};
use crate::infrastructure::event_repository::EventRepository;
use crate::models::{Document, EventCriteria};

/// How many event teasers the homepage shows
pub const HOMEPAGE_EVENT_COUNT: usize = 3;

pub struct HomepagePopulator<'a> {
    documents: &'a dyn DocumentManager,
    events: &'a dyn EventRepository,
    content: &'a ContentConfig,
}

impl<'a> HomepagePopulator<'a> {
    pub fn new(
        documents: &'a dyn DocumentManager,
        events: &'a dyn EventRepository,
        content: &'a ContentConfig,
    ) -> Self {
        Self {
            documents,
            events,
            content,
        }
    }

    pub async fn populate(
        &self,
        generator: &mut FakeContentGenerator,
        event_overview_page: &Document,
    ) -> AppResult<Document> {
        let events = self.events.find_by(EventCriteria::enabled()).await?;
        let overview_uuid = event_overview_page.uuid.ok_or_else(|| {
            AppError::Validation(format!(
                "event overview page '{}' has not been persisted",
                event_overview_page.title
            ))
        })?;

        let locale = self.content.locale.as_str();
        let mut home = self
            .documents
            .find(&self.content.content_root(), locale)
            .await?;

        let title = generator.sentence(5);
        home.title = strip_trailing_punctuation(&title).to_string();

        let article = generator.paragraphs_html(3);
        let event_ids = (0..HOMEPAGE_EVENT_COUNT)
            .map(|_| {
                generator
                    .choose(&events)
                    .map(|event| event.id)
                    .ok_or_else(|| {
                        AppError::NotFound("no enabled events to feature on the homepage".to_string())
                    })
            })
            .collect::<AppResult<Vec<EventId>>>()?;

        let data = json!({
            "title": home.title,
            "url": "/",
            "article": article,
            "events": event_ids,
            "eventOverviewPage": overview_uuid.to_string(),
        });
        if let serde_json::Value::Object(fields) = data {
            home.structure.bind(fields);
        }

        self.documents
            .persist(&mut home, locale, PersistOptions::default())
            .await?;
        self.documents.publish(&mut home, locale).await?;

        info!(
            "Populated homepage '{}' with events {:?}",
            home.title, event_ids
        );
        Ok(home)
    }
}

fn strip_trailing_punctuation(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_punctuation() {
        assert_eq!(strip_trailing_punctuation("Dolor sit amet."), "Dolor sit amet");
        assert_eq!(strip_trailing_punctuation("No period"), "No period");
        assert_eq!(strip_trailing_punctuation("Really?!"), "Really");
    }
}
