// Event rows owned by the relational side of the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::strong_types::EventId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub teaser: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub enabled: bool,
}

/// Insert payload; `id` is chosen by the database unless given
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub id: Option<EventId>,
    pub title: String,
    pub teaser: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub enabled: bool,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, enabled: bool) -> Self {
        Self {
            title: title.into(),
            enabled,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(EventId::new(id));
        self
    }
}

/// Filter for `EventRepository::find_by`; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCriteria {
    pub enabled: Option<bool>,
}

impl EventCriteria {
    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
        }
    }
}
