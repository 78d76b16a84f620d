// Domain models shared by the storage layer and the seeder

pub mod document;
pub mod event;

pub use document::{Document, DocumentKind, ExtensionData, RedirectType, Structure, WorkflowStage};
pub use event::{Event, EventCriteria, NewEvent};
