// Content documents - pages and the webspace home document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::strong_types::DocumentUuid;

/// Which document class a node was created as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Page,
    Home,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Page => "page",
            DocumentKind::Home => "home",
        }
    }
}

/// Publication state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    Test,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectType {
    #[default]
    NoRedirect,
    External,
}

/// Secondary metadata blocks stored next to the structured content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtensionData {
    pub seo: Map<String, Value>,
    pub excerpt: Map<String, Value>,
}

/// Field values bound onto a document's template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structure(Map<String, Value>);

impl Structure {
    /// Merge `data` into the structure; fields not named in `data` are left untouched
    pub fn bind(&mut self, data: Map<String, Value>) {
        for (name, value) in data {
            self.0.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub uuid: Option<DocumentUuid>,
    pub path: Option<String>,
    pub locale: Option<String>,
    pub title: String,
    pub resource_segment: Option<String>,
    pub structure_type: Option<String>,
    pub workflow_stage: WorkflowStage,
    pub author: Option<i64>,
    pub navigation_contexts: Vec<String>,
    pub extensions: ExtensionData,
    pub redirect_type: RedirectType,
    pub redirect_external: Option<String>,
    pub structure: Structure,
    pub published_at: Option<DateTime<Utc>>,
}

impl Document {
    /// A blank, never-persisted document
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            uuid: None,
            path: None,
            locale: None,
            title: String::new(),
            resource_segment: None,
            structure_type: None,
            workflow_stage: WorkflowStage::Test,
            author: None,
            navigation_contexts: Vec::new(),
            extensions: ExtensionData::default(),
            redirect_type: RedirectType::NoRedirect,
            redirect_external: None,
            structure: Structure::default(),
            published_at: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.workflow_stage == WorkflowStage::Published && self.published_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_merges_fields() {
        let mut structure = Structure::default();
        structure.bind(json!({"title": "Events", "url": "/events"}).as_object().unwrap().clone());
        structure.bind(json!({"url": "/all-events"}).as_object().unwrap().clone());

        assert_eq!(structure.get("title"), Some(&json!("Events")));
        assert_eq!(structure.get("url"), Some(&json!("/all-events")));
        assert_eq!(structure, Structure(json!({"title": "Events", "url": "/all-events"}).as_object().unwrap().clone()));
    }

    #[test]
    fn test_new_document_is_unpersisted_draft() {
        let document = Document::new(DocumentKind::Page);
        assert!(document.uuid.is_none());
        assert_eq!(document.workflow_stage, WorkflowStage::Test);
        assert_eq!(document.redirect_type, RedirectType::NoRedirect);
        assert!(!document.is_published());
    }
}
