// Event Repository - read access to the relational events table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{Sqlite, SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row};

use crate::core::strong_types::EventId;
use crate::error::{AppError, AppResult};
use crate::models::{Event, EventCriteria, NewEvent};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events matching `criteria`, ordered by id
    async fn find_by(&self, criteria: EventCriteria) -> AppResult<Vec<Event>>;
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS app_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                teaser TEXT,
                start_date TEXT,
                enabled INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create events table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_app_events_enabled ON app_events(enabled)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create events index: {}", e)))?;

        Ok(())
    }

    pub async fn insert(&self, event: NewEvent) -> AppResult<Event> {
        let result = sqlx::query(
            "INSERT INTO app_events (id, title, teaser, start_date, enabled) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(event.id.map(i64::from))
        .bind(&event.title)
        .bind(&event.teaser)
        .bind(event.start_date)
        .bind(event.enabled)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert event '{}': {}", event.title, e)))?;

        Ok(Event {
            id: EventId::new(result.last_insert_rowid()),
            title: event.title,
            teaser: event.teaser,
            start_date: event.start_date,
            enabled: event.enabled,
        })
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn find_by(&self, criteria: EventCriteria) -> AppResult<Vec<Event>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, title, teaser, start_date, enabled FROM app_events WHERE 1 = 1",
        );

        if let Some(enabled) = criteria.enabled {
            qb.push(" AND enabled = ");
            qb.push_bind(enabled);
        }

        qb.push(" ORDER BY id");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to query events: {}", e)))?;

        Ok(rows.iter().map(event_from_row).collect())
    }
}

fn event_from_row(row: &SqliteRow) -> Event {
    Event {
        id: EventId::new(row.get("id")),
        title: row.get("title"),
        teaser: row.get("teaser"),
        start_date: row.get::<Option<DateTime<Utc>>, _>("start_date"),
        enabled: row.get("enabled"),
    }
}
