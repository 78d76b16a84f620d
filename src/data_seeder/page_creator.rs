// Page Creator - turns a PageSpec into a persisted, published page document

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ContentConfig;
use crate::core::strong_types::DocumentUuid;
use crate::data_seeder::page_spec::{PageSpec, SelfReferenceResolver};
use crate::error::{AppError, AppResult};
use crate::infrastructure::document_manager::{DocumentManager, PersistOptions};
use crate::infrastructure::path_cleanup::PathCleanup;
use crate::models::{Document, DocumentKind, ExtensionData, RedirectType, WorkflowStage};

pub const DEFAULT_STRUCTURE_TYPE: &str = "default";

/// A page after its first persist: the uuid exists, publication has not happened yet
pub struct DraftPage {
    document: Document,
    parent_path: String,
    resolver: Option<SelfReferenceResolver>,
}

impl DraftPage {
    pub fn uuid(&self) -> Option<DocumentUuid> {
        self.document.uuid
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn references_itself(&self) -> bool {
        self.resolver.is_some()
    }
}

pub struct PageCreator<'a> {
    documents: &'a dyn DocumentManager,
    path_cleanup: &'a dyn PathCleanup,
    content: &'a ContentConfig,
}

impl<'a> PageCreator<'a> {
    pub fn new(
        documents: &'a dyn DocumentManager,
        path_cleanup: &'a dyn PathCleanup,
        content: &'a ContentConfig,
    ) -> Self {
        Self {
            documents,
            path_cleanup,
            content,
        }
    }

    /// URL derived from the title, below the parent page's URL when a parent is given
    pub fn resolve_url(&self, spec: &PageSpec) -> AppResult<String> {
        let url = self
            .path_cleanup
            .cleanup(&format!("/{}", spec.title), &self.content.locale);

        match &spec.parent_path {
            Some(parent_path) => {
                let content_root = self.content.content_root();
                let parent_url = parent_path
                    .strip_prefix(content_root.as_str())
                    .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "parent path {} of '{}' is outside {}",
                            parent_path, spec.title, content_root
                        ))
                    })?;
                Ok(format!("{}{}", parent_url.trim_end_matches('/'), url))
            }
            None => Ok(url),
        }
    }

    pub async fn create_page(&self, spec: PageSpec) -> AppResult<Document> {
        let draft = self.create_draft(spec).await?;
        self.finalize(draft).await
    }

    /// Populate and persist the page once so it receives its uuid
    pub async fn create_draft(&self, spec: PageSpec) -> AppResult<DraftPage> {
        let url = match &spec.url {
            Some(url) => url.clone(),
            None => self.resolve_url(&spec)?,
        };
        let resolver = spec.self_reference_resolver();
        let parent_path = spec
            .parent_path
            .as_deref()
            .map(|path| path.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.content.content_root());
        let locale = self.content.locale.as_str();

        let mut navigation_contexts: Vec<String> = Vec::with_capacity(spec.navigation_contexts.len());
        for context in spec.navigation_contexts {
            if !navigation_contexts.contains(&context) {
                navigation_contexts.push(context);
            }
        }

        let mut document = self.documents.create(DocumentKind::Page);
        document.navigation_contexts = navigation_contexts;
        document.locale = Some(locale.to_string());
        document.title = spec.title.clone();
        document.resource_segment = Some(url.clone());
        document.structure_type = Some(
            spec.structure_type
                .unwrap_or_else(|| DEFAULT_STRUCTURE_TYPE.to_string()),
        );
        document.workflow_stage = WorkflowStage::Published;

        let mut data = Map::new();
        data.insert("title".to_string(), Value::String(spec.title));
        data.insert("url".to_string(), Value::String(url));
        data.extend(spec.fields);
        document.structure.bind(data);

        document.author = Some(self.content.author_id);
        document.extensions = ExtensionData {
            seo: spec.seo.unwrap_or_default(),
            excerpt: spec.excerpt.unwrap_or_default(),
        };

        if let Some(target) = spec.redirect {
            document.redirect_type = RedirectType::External;
            document.redirect_external = Some(target);
        }

        self.documents
            .persist(&mut document, locale, PersistOptions::under(parent_path.clone()))
            .await?;

        Ok(DraftPage {
            document,
            parent_path,
            resolver,
        })
    }

    /// Write self-referencing fields, then publish
    pub async fn finalize(&self, draft: DraftPage) -> AppResult<Document> {
        let DraftPage {
            mut document,
            parent_path,
            resolver,
        } = draft;
        let locale = self.content.locale.as_str();

        if let Some(resolver) = resolver {
            let uuid = document.uuid.ok_or_else(|| {
                AppError::Internal(format!("draft page '{}' has no uuid", document.title))
            })?;
            debug!("Binding self reference {} into '{}'", uuid, document.title);

            document.structure.bind(resolver(uuid));
            self.documents
                .persist(&mut document, locale, PersistOptions::under(parent_path))
                .await?;
        }

        self.documents.publish(&mut document, locale).await?;

        info!(
            "Created page '{}' at {}",
            document.title,
            document.resource_segment.as_deref().unwrap_or_default()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_seeder::page_spec::CURRENT_DOCUMENT;
    use crate::infrastructure::database::connect_in_memory;
    use crate::infrastructure::path_cleanup::DefaultPathCleanup;
    use crate::infrastructure::sqlite_document_manager::SqliteDocumentManager;
    use serde_json::json;
    use std::sync::Arc;

    async fn setup() -> (SqliteDocumentManager, DefaultPathCleanup, ContentConfig) {
        let content = ContentConfig::default();
        let manager = SqliteDocumentManager::new(
            connect_in_memory().await.unwrap(),
            Arc::new(DefaultPathCleanup::new()),
        );
        manager.initialize().await.unwrap();
        manager
            .ensure_home(&content.content_root(), &content.locale)
            .await
            .unwrap();
        (manager, DefaultPathCleanup::new(), content)
    }

    #[tokio::test]
    async fn test_resolve_url() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        assert_eq!(creator.resolve_url(&PageSpec::new("Events")).unwrap(), "/events");

        let nested = PageSpec::new("Press Releases").parent_path("/cmf/example/contents/about-us");
        assert_eq!(creator.resolve_url(&nested).unwrap(), "/about-us/press-releases");

        let outside = PageSpec::new("Stray").parent_path("/cmf/other/contents");
        assert!(matches!(creator.resolve_url(&outside), Err(AppError::Validation(_))));

        let sibling_root = PageSpec::new("Stray").parent_path("/cmf/example/contentsX/about");
        assert!(matches!(creator.resolve_url(&sibling_root), Err(AppError::Validation(_))));

        let trailing = PageSpec::new("Team").parent_path("/cmf/example/contents/about-us/");
        assert_eq!(creator.resolve_url(&trailing).unwrap(), "/about-us/team");

        let root = PageSpec::new("Team").parent_path("/cmf/example/contents");
        assert_eq!(creator.resolve_url(&root).unwrap(), "/team");
    }

    #[tokio::test]
    async fn test_navigation_contexts_are_a_set() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        let spec: PageSpec = serde_json::from_value(json!({
            "title": "Contact",
            "navigationContexts": ["footer", "main", "footer"]
        }))
        .unwrap();
        let page = creator.create_page(spec).await.unwrap();
        assert_eq!(page.navigation_contexts, vec!["footer", "main"]);
    }

    #[tokio::test]
    async fn test_create_page_defaults() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        let page = creator
            .create_page(
                PageSpec::new("Events")
                    .navigation_context("main")
                    .structure_type("event_overview")
                    .field("article", json!("<p>Hi</p>")),
            )
            .await
            .unwrap();

        assert!(page.uuid.is_some());
        assert!(page.is_published());
        assert_eq!(page.author, Some(1));
        assert_eq!(page.locale.as_deref(), Some("en"));
        assert_eq!(page.resource_segment.as_deref(), Some("/events"));
        assert_eq!(page.structure_type.as_deref(), Some("event_overview"));
        assert_eq!(page.navigation_contexts, vec!["main"]);
        assert_eq!(page.redirect_type, RedirectType::NoRedirect);
        assert_eq!(page.extensions, ExtensionData::default());
        assert_eq!(page.structure.get("title"), Some(&json!("Events")));
        assert_eq!(page.structure.get("url"), Some(&json!("/events")));
        assert_eq!(page.structure.get("article"), Some(&json!("<p>Hi</p>")));

        let plain = creator.create_page(PageSpec::new("Imprint")).await.unwrap();
        assert_eq!(plain.structure_type.as_deref(), Some(DEFAULT_STRUCTURE_TYPE));
    }

    #[tokio::test]
    async fn test_explicit_url_extensions_and_redirect() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        let mut seo = Map::new();
        seo.insert("title".to_string(), json!("Tickets online"));
        let page = creator
            .create_page(
                PageSpec::new("Tickets")
                    .url("/buy")
                    .seo(seo.clone())
                    .redirect("https://tickets.example.org"),
            )
            .await
            .unwrap();

        assert_eq!(page.resource_segment.as_deref(), Some("/buy"));
        assert_eq!(page.extensions.seo, seo);
        assert!(page.extensions.excerpt.is_empty());
        assert_eq!(page.redirect_type, RedirectType::External);
        assert_eq!(page.redirect_external.as_deref(), Some("https://tickets.example.org"));
    }

    #[tokio::test]
    async fn test_self_reference_two_phase() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        let draft = creator
            .create_draft(
                PageSpec::new("Blog").field("pages", json!({"dataSource": CURRENT_DOCUMENT, "limit": 5})),
            )
            .await
            .unwrap();
        assert!(draft.references_itself());
        let uuid = draft.uuid().unwrap();
        // placeholder still present before finalize
        assert_eq!(
            draft.document().structure.get("pages"),
            Some(&json!({"dataSource": CURRENT_DOCUMENT, "limit": 5}))
        );

        let page = creator.finalize(draft).await.unwrap();
        assert_eq!(page.uuid, Some(uuid));
        assert_eq!(
            page.structure.get("pages"),
            Some(&json!({"dataSource": uuid.to_string(), "limit": 5}))
        );

        manager.flush().await.unwrap();
        let published = manager.find_published(uuid, "en").await.unwrap().unwrap();
        assert_eq!(
            published.structure.get("pages"),
            Some(&json!({"dataSource": uuid.to_string(), "limit": 5}))
        );
    }

    #[tokio::test]
    async fn test_child_page_under_parent() {
        let (manager, cleanup, content) = setup().await;
        let creator = PageCreator::new(&manager, &cleanup, &content);

        let parent = creator.create_page(PageSpec::new("About Us")).await.unwrap();
        let parent_path = parent.path.clone().unwrap();
        let child = creator
            .create_page(PageSpec::new("Team").parent_path(parent_path.clone()))
            .await
            .unwrap();

        assert_eq!(child.resource_segment.as_deref(), Some("/about-us/team"));
        assert_eq!(child.path, Some(format!("{}/team", parent_path)));
    }
}
