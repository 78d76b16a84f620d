// Document Manager - the hierarchical content store the seeder writes through

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Document, DocumentKind};

/// Options for `DocumentManager::persist`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistOptions {
    /// Node under which a new document is created; ignored once the document has a path
    pub parent_path: Option<String>,
}

impl PersistOptions {
    pub fn under(parent_path: impl Into<String>) -> Self {
        Self {
            parent_path: Some(parent_path.into()),
        }
    }
}

/// Content store operations.
///
/// `persist` and `publish` are buffered and only reach storage on `flush`;
/// `find` sees buffered writes.
#[async_trait]
pub trait DocumentManager: Send + Sync {
    /// A blank document of the given kind; it has no uuid until persisted
    fn create(&self, kind: DocumentKind) -> Document;

    async fn find(&self, path: &str, locale: &str) -> AppResult<Document>;

    /// Assigns uuid and node path on the first call
    async fn persist(
        &self,
        document: &mut Document,
        locale: &str,
        options: PersistOptions,
    ) -> AppResult<()>;

    async fn publish(&self, document: &mut Document, locale: &str) -> AppResult<()>;

    async fn flush(&self) -> AppResult<()>;
}
