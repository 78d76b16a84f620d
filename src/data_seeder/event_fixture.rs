// Event Fixture - demo rows for the relational events table

use chrono::{Duration, Timelike, Utc};
use tracing::info;

use crate::data_seeder::fake_content::FakeContentGenerator;
use crate::error::AppResult;
use crate::infrastructure::event_repository::SqliteEventRepository;
use crate::models::{Event, NewEvent};

pub struct EventFixture {
    count: usize,
}

impl EventFixture {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Insert `count` weekly events; every third one is disabled
    pub async fn load(
        &self,
        repository: &SqliteEventRepository,
        generator: &mut FakeContentGenerator,
    ) -> AppResult<Vec<Event>> {
        let first_start = Utc::now()
            .with_hour(19)
            .and_then(|time| time.with_minute(0))
            .and_then(|time| time.with_second(0))
            .and_then(|time| time.with_nanosecond(0))
            .unwrap_or_else(Utc::now);

        let mut events = Vec::with_capacity(self.count);
        for index in 0..self.count {
            let title = generator.sentence(3);
            let event = NewEvent {
                id: None,
                title: title.trim_end_matches('.').to_string(),
                teaser: Some(generator.sentence(10)),
                start_date: Some(first_start + Duration::days(7 * index as i64)),
                enabled: index % 3 != 2,
            };
            events.push(repository.insert(event).await?);
        }

        info!(
            "Seeded {} events ({} enabled)",
            events.len(),
            events.iter().filter(|event| event.enabled).count()
        );
        Ok(events)
    }
}
