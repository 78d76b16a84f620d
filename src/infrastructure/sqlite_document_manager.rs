// SQLite Document Manager - buffered document writes flushed in one transaction

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteExecutor, SqlitePool};
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::core::strong_types::DocumentUuid;
use crate::error::{AppError, AppResult};
use crate::infrastructure::document_manager::{DocumentManager, PersistOptions};
use crate::infrastructure::path_cleanup::PathCleanup;
use crate::models::{Document, DocumentKind, WorkflowStage};

enum PendingOperation {
    Save { document: Document, locale: String },
    Publish { document: Document, locale: String },
}

/// Writes queued since the last flush, plus the latest draft of each touched document
#[derive(Default)]
struct UnitOfWork {
    operations: Vec<PendingOperation>,
    drafts: HashMap<(DocumentUuid, String), Document>,
}

impl UnitOfWork {
    fn draft_at(&self, path: &str, locale: &str) -> Option<&Document> {
        self.drafts.iter().find_map(|((_, draft_locale), document)| {
            (draft_locale == locale && document.path.as_deref() == Some(path)).then_some(document)
        })
    }

    fn path_taken_by_other(&self, path: &str, uuid: DocumentUuid) -> bool {
        self.drafts
            .values()
            .any(|document| document.path.as_deref() == Some(path) && document.uuid != Some(uuid))
    }
}

pub struct SqliteDocumentManager {
    pool: SqlitePool,
    path_cleanup: Arc<dyn PathCleanup>,
    unit_of_work: Mutex<UnitOfWork>,
}

impl SqliteDocumentManager {
    pub fn new(pool: SqlitePool, path_cleanup: Arc<dyn PathCleanup>) -> Self {
        Self {
            pool,
            path_cleanup,
            unit_of_work: Mutex::new(UnitOfWork::default()),
        }
    }

    /// Create the content tables
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cms_documents (
                uuid TEXT NOT NULL,
                locale TEXT NOT NULL,
                kind TEXT NOT NULL,
                path TEXT NOT NULL,
                parent_path TEXT,
                data TEXT NOT NULL,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL,
                PRIMARY KEY (uuid, locale)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create documents table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cms_published (
                uuid TEXT NOT NULL,
                locale TEXT NOT NULL,
                path TEXT NOT NULL,
                data TEXT NOT NULL,
                time_published INTEGER NOT NULL,
                PRIMARY KEY (uuid, locale)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create published table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cms_documents_path ON cms_documents(path, locale)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create documents path index: {}", e)))?;

        Ok(())
    }

    /// Make sure the webspace home document exists at `content_root` for `locale`
    pub async fn ensure_home(&self, content_root: &str, locale: &str) -> AppResult<Document> {
        match self.find(content_root, locale).await {
            Ok(home) => return Ok(home),
            Err(AppError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }

        let mut home = Document::new(DocumentKind::Home);
        home.uuid = Some(DocumentUuid::new_v4());
        home.path = Some(content_root.to_string());
        home.locale = Some(locale.to_string());
        home.title = "Homepage".to_string();
        home.resource_segment = Some("/".to_string());
        home.structure_type = Some("default".to_string());

        upsert_draft(&self.pool, &home, locale).await?;
        info!("Created home document at {} ({})", content_root, locale);
        Ok(home)
    }

    /// Draft state of a document, including writes not yet flushed
    pub async fn find_by_uuid(&self, uuid: DocumentUuid, locale: &str) -> AppResult<Document> {
        {
            let unit_of_work = self.unit_of_work.lock().await;
            if let Some(document) = unit_of_work.drafts.get(&(uuid, locale.to_string())) {
                return Ok(document.clone());
            }
        }

        let row = sqlx::query("SELECT data FROM cms_documents WHERE uuid = ? AND locale = ?")
            .bind(uuid.to_string())
            .bind(locale)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to load document {}: {}", uuid, e)))?;

        match row {
            Some(row) => decode_document(row.get("data")),
            None => Err(AppError::NotFound(format!("document {} ({})", uuid, locale))),
        }
    }

    /// Published snapshot as of the last flush
    pub async fn find_published(&self, uuid: DocumentUuid, locale: &str) -> AppResult<Option<Document>> {
        let row = sqlx::query("SELECT data FROM cms_published WHERE uuid = ? AND locale = ?")
            .bind(uuid.to_string())
            .bind(locale)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to load published document {}: {}", uuid, e))
            })?;

        row.map(|row| decode_document(row.get("data"))).transpose()
    }

    /// Number of buffered operations waiting for `flush`
    pub async fn pending_operations(&self) -> usize {
        self.unit_of_work.lock().await.operations.len()
    }

    async fn path_exists(&self, unit_of_work: &UnitOfWork, path: &str) -> AppResult<bool> {
        if unit_of_work
            .drafts
            .values()
            .any(|document| document.path.as_deref() == Some(path))
        {
            return Ok(true);
        }

        let row = sqlx::query("SELECT 1 FROM cms_documents WHERE path = ? LIMIT 1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to look up path {}: {}", path, e)))?;
        Ok(row.is_some())
    }

    async fn path_taken_by_other(
        &self,
        unit_of_work: &UnitOfWork,
        path: &str,
        uuid: DocumentUuid,
    ) -> AppResult<bool> {
        if unit_of_work.path_taken_by_other(path, uuid) {
            return Ok(true);
        }

        let row = sqlx::query("SELECT 1 FROM cms_documents WHERE path = ? AND uuid != ? LIMIT 1")
            .bind(path)
            .bind(uuid.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to look up path {}: {}", path, e)))?;
        Ok(row.is_some())
    }

    /// `parent/name`, or `parent/name-N` for the first free N
    async fn unique_child_path(
        &self,
        unit_of_work: &UnitOfWork,
        parent_path: &str,
        name: &str,
        uuid: DocumentUuid,
    ) -> AppResult<String> {
        let base = format!("{}/{}", parent_path.trim_end_matches('/'), name);
        let mut candidate = base.clone();
        let mut suffix = 0;

        while self.path_taken_by_other(unit_of_work, &candidate, uuid).await? {
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }

        Ok(candidate)
    }
}

#[async_trait]
impl DocumentManager for SqliteDocumentManager {
    fn create(&self, kind: DocumentKind) -> Document {
        Document::new(kind)
    }

    async fn find(&self, path: &str, locale: &str) -> AppResult<Document> {
        {
            let unit_of_work = self.unit_of_work.lock().await;
            if let Some(document) = unit_of_work.draft_at(path, locale) {
                return Ok(document.clone());
            }
        }

        let row = sqlx::query("SELECT data FROM cms_documents WHERE path = ? AND locale = ?")
            .bind(path)
            .bind(locale)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to find document at {}: {}", path, e)))?;

        match row {
            Some(row) => decode_document(row.get("data")),
            None => Err(AppError::NotFound(format!("document at {} ({})", path, locale))),
        }
    }

    async fn persist(
        &self,
        document: &mut Document,
        locale: &str,
        options: PersistOptions,
    ) -> AppResult<()> {
        let mut unit_of_work = self.unit_of_work.lock().await;

        // identity is only assigned once the node path is settled
        let uuid = document.uuid.unwrap_or_else(DocumentUuid::new_v4);

        if document.path.is_none() {
            let parent_path = options.parent_path.ok_or_else(|| {
                AppError::Validation(format!("new document '{}' needs a parent path", document.title))
            })?;
            if !self.path_exists(&unit_of_work, &parent_path).await? {
                return Err(AppError::NotFound(format!("parent document at {}", parent_path)));
            }

            let name = self.path_cleanup.node_name(&document.title, locale);
            let path = self
                .unique_child_path(&unit_of_work, &parent_path, &name, uuid)
                .await?;
            document.path = Some(path);
        }

        document.uuid = Some(uuid);
        document.locale = Some(locale.to_string());

        debug!(
            "Persisting {} {} at {}",
            document.kind.as_str(),
            uuid,
            document.path.as_deref().unwrap_or_default()
        );

        unit_of_work
            .drafts
            .insert((uuid, locale.to_string()), document.clone());
        unit_of_work.operations.push(PendingOperation::Save {
            document: document.clone(),
            locale: locale.to_string(),
        });

        Ok(())
    }

    async fn publish(&self, document: &mut Document, locale: &str) -> AppResult<()> {
        let uuid = match (document.uuid, document.path.as_ref()) {
            (Some(uuid), Some(_)) => uuid,
            _ => {
                return Err(AppError::Validation(format!(
                    "document '{}' must be persisted before it can be published",
                    document.title
                )))
            }
        };

        document.workflow_stage = WorkflowStage::Published;
        document.published_at = Some(Utc::now());
        document.locale = Some(locale.to_string());

        debug!("Publishing {} {}", document.kind.as_str(), uuid);

        let mut unit_of_work = self.unit_of_work.lock().await;
        unit_of_work
            .drafts
            .insert((uuid, locale.to_string()), document.clone());
        unit_of_work.operations.push(PendingOperation::Publish {
            document: document.clone(),
            locale: locale.to_string(),
        });

        Ok(())
    }

    async fn flush(&self) -> AppResult<()> {
        let mut unit_of_work = self.unit_of_work.lock().await;
        if unit_of_work.operations.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        for operation in &unit_of_work.operations {
            match operation {
                PendingOperation::Save { document, locale } => {
                    upsert_draft(&mut *tx, document, locale).await?;
                }
                PendingOperation::Publish { document, locale } => {
                    upsert_draft(&mut *tx, document, locale).await?;
                    upsert_published(&mut *tx, document, locale).await?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit transaction: {}", e)))?;

        info!("Flushed {} document operations", unit_of_work.operations.len());
        unit_of_work.operations.clear();
        unit_of_work.drafts.clear();

        Ok(())
    }
}

fn stored_identity(document: &Document) -> AppResult<(DocumentUuid, &str)> {
    match (document.uuid, document.path.as_deref()) {
        (Some(uuid), Some(path)) => Ok((uuid, path)),
        _ => Err(AppError::Internal(format!(
            "document '{}' reached storage without uuid or path",
            document.title
        ))),
    }
}

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

fn encode_document(document: &Document) -> AppResult<String> {
    serde_json::to_string(document)
        .map_err(|e| AppError::SerializationError(format!("Failed to encode document: {}", e)))
}

fn decode_document(data: String) -> AppResult<Document> {
    serde_json::from_str(&data)
        .map_err(|e| AppError::DeserializationError(format!("Failed to decode document: {}", e)))
}

async fn upsert_draft<'e, E: SqliteExecutor<'e>>(
    executor: E,
    document: &Document,
    locale: &str,
) -> AppResult<()> {
    let (uuid, path) = stored_identity(document)?;
    let now = Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO cms_documents (uuid, locale, kind, path, parent_path, data, time_created, time_updated)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (uuid, locale) DO UPDATE SET
            path = excluded.path,
            parent_path = excluded.parent_path,
            data = excluded.data,
            time_updated = excluded.time_updated
        "#,
    )
    .bind(uuid.to_string())
    .bind(locale)
    .bind(document.kind.as_str())
    .bind(path)
    .bind(parent_of(path))
    .bind(encode_document(document)?)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to save document {}: {}", uuid, e)))?;

    Ok(())
}

async fn upsert_published<'e, E: SqliteExecutor<'e>>(
    executor: E,
    document: &Document,
    locale: &str,
) -> AppResult<()> {
    let (uuid, path) = stored_identity(document)?;
    let published_at = document
        .published_at
        .unwrap_or_else(Utc::now)
        .timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO cms_published (uuid, locale, path, data, time_published)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (uuid, locale) DO UPDATE SET
            path = excluded.path,
            data = excluded.data,
            time_published = excluded.time_published
        "#,
    )
    .bind(uuid.to_string())
    .bind(locale)
    .bind(path)
    .bind(encode_document(document)?)
    .bind(published_at)
    .execute(executor)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to publish document {}: {}", uuid, e)))?;

    Ok(())
}
