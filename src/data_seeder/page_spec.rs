// Page Spec - declarative description of a demo page

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::strong_types::DocumentUuid;
use crate::error::{AppError, AppResult};

/// Placeholder meaning "the uuid of the page being created"
pub const CURRENT_DOCUMENT: &str = "__CURRENT__";

/// Builds the fields to rebind once the page's own uuid is known
pub type SelfReferenceResolver = Arc<dyn Fn(DocumentUuid) -> Map<String, Value> + Send + Sync>;

#[derive(Clone, Default, Deserialize)]
pub struct PageSpec {
    pub title: String,
    #[serde(default, rename = "navigationContexts")]
    pub navigation_contexts: Vec<String>,
    #[serde(default, rename = "structureType")]
    pub structure_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent_path: Option<String>,
    #[serde(default)]
    pub seo: Option<Map<String, Value>>,
    #[serde(default)]
    pub excerpt: Option<Map<String, Value>>,
    #[serde(default)]
    pub redirect: Option<String>,
    /// Template fields bound onto the document as-is
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    self_reference: Option<SelfReferenceResolver>,
}

impl PageSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn navigation_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        if !self.navigation_contexts.contains(&context) {
            self.navigation_contexts.push(context);
        }
        self
    }

    pub fn structure_type(mut self, structure_type: impl Into<String>) -> Self {
        self.structure_type = Some(structure_type.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn parent_path(mut self, parent_path: impl Into<String>) -> Self {
        self.parent_path = Some(parent_path.into());
        self
    }

    pub fn seo(mut self, seo: Map<String, Value>) -> Self {
        self.seo = Some(seo);
        self
    }

    pub fn excerpt(mut self, excerpt: Map<String, Value>) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Fields computed from the page's own uuid, bound after the first persist
    pub fn with_self_reference<F>(mut self, resolver: F) -> Self
    where
        F: Fn(DocumentUuid) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.self_reference = Some(Arc::new(resolver));
        self
    }

    /// Explicit resolver if one was given, otherwise one that fills every
    /// `CURRENT_DOCUMENT` placeholder found in `fields`
    pub fn self_reference_resolver(&self) -> Option<SelfReferenceResolver> {
        if let Some(resolver) = &self.self_reference {
            return Some(resolver.clone());
        }

        let referencing: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(_, value)| contains_current_document(value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        if referencing.is_empty() {
            return None;
        }

        Some(Arc::new(move |uuid: DocumentUuid| {
            let mut resolved = referencing.clone();
            for value in resolved.values_mut() {
                replace_current_document(value, uuid);
            }
            resolved
        }))
    }
}

impl fmt::Debug for PageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSpec")
            .field("title", &self.title)
            .field("navigation_contexts", &self.navigation_contexts)
            .field("structure_type", &self.structure_type)
            .field("url", &self.url)
            .field("parent_path", &self.parent_path)
            .field("redirect", &self.redirect)
            .field("fields", &self.fields)
            .field("self_reference", &self.self_reference.is_some())
            .finish()
    }
}

pub fn contains_current_document(value: &Value) -> bool {
    match value {
        Value::String(text) => text == CURRENT_DOCUMENT,
        Value::Array(items) => items.iter().any(contains_current_document),
        Value::Object(fields) => fields.values().any(contains_current_document),
        _ => false,
    }
}

pub fn replace_current_document(value: &mut Value, uuid: DocumentUuid) {
    match value {
        Value::String(text) if text == CURRENT_DOCUMENT => *value = Value::String(uuid.to_string()),
        Value::Array(items) => items
            .iter_mut()
            .for_each(|item| replace_current_document(item, uuid)),
        Value::Object(fields) => fields
            .values_mut()
            .for_each(|field| replace_current_document(field, uuid)),
        _ => {}
    }
}

/// Read a JSON array of page specs
pub fn load_page_specs(path: &Path) -> AppResult<Vec<PageSpec>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::ConfigurationError(format!("Failed to read pages file {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AppError::DeserializationError(format!("Invalid pages file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_deserialize_splits_known_keys() {
        let spec: PageSpec = serde_json::from_value(json!({
            "title": "Press",
            "navigationContexts": ["main", "footer"],
            "structureType": "default",
            "parent_path": "/cmf/example/contents/about",
            "seo": {"title": "Press room"},
            "redirect": "https://example.org/press",
            "article": "<p>Hello</p>"
        }))
        .unwrap();

        assert_eq!(spec.title, "Press");
        assert_eq!(spec.navigation_contexts, vec!["main", "footer"]);
        assert_eq!(spec.structure_type.as_deref(), Some("default"));
        assert_eq!(spec.parent_path.as_deref(), Some("/cmf/example/contents/about"));
        assert_eq!(spec.seo.unwrap().get("title"), Some(&json!("Press room")));
        assert!(spec.excerpt.is_none());
        assert_eq!(spec.redirect.as_deref(), Some("https://example.org/press"));
        assert_eq!(spec.fields.len(), 1);
        assert_eq!(spec.fields.get("article"), Some(&json!("<p>Hello</p>")));
    }

    #[test]
    fn test_builder_dedups_navigation_contexts() {
        let spec = PageSpec::new("Events")
            .navigation_context("main")
            .navigation_context("main")
            .navigation_context("footer");
        assert_eq!(spec.navigation_contexts, vec!["main", "footer"]);
    }

    #[test]
    fn test_sentinel_resolver_replaces_nested_placeholders() {
        let spec = PageSpec::new("Blog")
            .field("article", json!("<p>static</p>"))
            .field(
                "pages",
                json!({"dataSource": CURRENT_DOCUMENT, "sortBy": "published", "tags": [CURRENT_DOCUMENT]}),
            );

        let resolver = spec.self_reference_resolver().unwrap();
        let uuid = DocumentUuid::new_v4();
        let resolved = resolver(uuid);

        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved.get("pages"),
            Some(&json!({"dataSource": uuid.to_string(), "sortBy": "published", "tags": [uuid.to_string()]}))
        );
    }

    #[test]
    fn test_no_resolver_without_placeholder() {
        let spec = PageSpec::new("Events").field("article", json!("<p>text</p>"));
        assert!(spec.self_reference_resolver().is_none());
    }

    #[test]
    fn test_explicit_resolver_wins() {
        let spec = PageSpec::new("Gallery").with_self_reference(|uuid| {
            let mut fields = Map::new();
            fields.insert("canonical".to_string(), json!(format!("/page/{}", uuid)));
            fields
        });

        let uuid = DocumentUuid::new_v4();
        let fields = spec.self_reference_resolver().unwrap()(uuid);
        assert_eq!(fields.get("canonical"), Some(&json!(format!("/page/{}", uuid))));
    }

    #[test]
    fn test_load_page_specs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "About"}}, {{"title": "Legacy", "redirect": "https://old.example.org"}}]"#
        )
        .unwrap();

        let specs = load_page_specs(file.path()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].redirect.as_deref(), Some("https://old.example.org"));

        let err = load_page_specs(Path::new("/nonexistent/pages.json")).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }
}
