// Infrastructure - storage collaborators the fixtures are written against

pub mod database;
pub mod document_manager;
pub mod event_repository;
pub mod path_cleanup;
pub mod sqlite_document_manager;

pub use document_manager::{DocumentManager, PersistOptions};
pub use event_repository::{EventRepository, SqliteEventRepository};
pub use path_cleanup::{DefaultPathCleanup, PathCleanup};
pub use sqlite_document_manager::SqliteDocumentManager;
