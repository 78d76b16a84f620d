// Path Cleanup - turns titles into URL-safe resource segments and node names

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9/_-]").expect("static regex"));
static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("static regex"));
static DASH_AROUND_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"-*/-*").expect("static regex"));
static SLASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+").expect("static regex"));
static VALID_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/[a-z0-9][a-z0-9_-]*)+$").expect("static regex"));

pub trait PathCleanup: Send + Sync {
    /// Normalize a raw path such as `"/" + title` for the given locale
    fn cleanup(&self, dirty: &str, locale: &str) -> String;

    /// True when `path` is already in normalized form
    fn validate(&self, path: &str) -> bool;

    /// Single path segment usable as a content node name
    fn node_name(&self, title: &str, locale: &str) -> String {
        let cleaned = self.cleanup(&format!("/{}", title), locale);
        let name = cleaned.trim_matches('/').replace('/', "-");
        if name.is_empty() {
            "page".to_string()
        } else {
            name
        }
    }
}

/// Replacer-table based cleanup; locale tables run before the default table
pub struct DefaultPathCleanup {
    default_replacers: Vec<(String, String)>,
    locale_replacers: HashMap<String, Vec<(String, String)>>,
}

impl DefaultPathCleanup {
    pub fn new() -> Self {
        let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
            items
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect()
        };

        let mut locale_replacers = HashMap::new();
        locale_replacers.insert(
            "de".to_string(),
            pairs(&[
                ("ä", "ae"),
                ("ö", "oe"),
                ("ü", "ue"),
                ("Ä", "ae"),
                ("Ö", "oe"),
                ("Ü", "ue"),
                ("ß", "ss"),
                ("&", "und"),
            ]),
        );
        locale_replacers.insert("en".to_string(), pairs(&[("&", "and")]));
        locale_replacers.insert("fr".to_string(), pairs(&[("&", "et")]));

        Self {
            default_replacers: pairs(&[(" ", "-"), ("+", "-"), (".", "-")]),
            locale_replacers,
        }
    }

    /// Add or extend the replacer table of one language
    pub fn with_replacer(mut self, language: &str, from: &str, to: &str) -> Self {
        self.locale_replacers
            .entry(language.to_lowercase())
            .or_default()
            .push((from.to_string(), to.to_string()));
        self
    }

    fn replacers_for(&self, locale: &str) -> &[(String, String)] {
        // "de_AT" and "de-at" both fall back to the "de" table
        let language = locale
            .split(|c| c == '_' || c == '-')
            .next()
            .unwrap_or(locale)
            .to_lowercase();
        self.locale_replacers
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for DefaultPathCleanup {
    fn default() -> Self {
        Self::new()
    }
}

impl PathCleanup for DefaultPathCleanup {
    fn cleanup(&self, dirty: &str, locale: &str) -> String {
        let mut clean = dirty.to_string();
        for (from, to) in self.replacers_for(locale).iter().chain(&self.default_replacers) {
            clean = clean.replace(from.as_str(), to);
        }

        let clean = clean.to_lowercase();
        let clean = INVALID_CHARS.replace_all(&clean, "-");
        let clean = DASH_RUNS.replace_all(&clean, "-");
        let clean = DASH_AROUND_SLASH.replace_all(&clean, "/");
        let clean = SLASH_RUNS.replace_all(&clean, "/");
        let clean = clean.trim_matches('-');

        if clean.len() > 1 {
            clean.trim_end_matches('/').to_string()
        } else {
            clean.to_string()
        }
    }

    fn validate(&self, path: &str) -> bool {
        path == "/" || VALID_PATH.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_title() {
        let cleanup = DefaultPathCleanup::new();
        assert_eq!(cleanup.cleanup("/Events", "en"), "/events");
        assert_eq!(cleanup.cleanup("/Rock & Roll", "en"), "/rock-and-roll");
        assert_eq!(cleanup.cleanup("/a.b+c", "en"), "/a-b-c");
    }

    #[test]
    fn test_locale_replacers() {
        let cleanup = DefaultPathCleanup::new();
        assert_eq!(cleanup.cleanup("/Über uns & mehr", "de"), "/ueber-uns-und-mehr");
        assert_eq!(cleanup.cleanup("/Straße", "de_AT"), "/strasse");
        assert_eq!(cleanup.cleanup("/Art & Essai", "fr"), "/art-et-essai");
        // no table for "it": the ampersand is just an invalid character
        assert_eq!(cleanup.cleanup("/Arte & Cultura", "it"), "/arte-cultura");
    }

    #[test]
    fn test_cleanup_collapses_noise() {
        let cleanup = DefaultPathCleanup::new();
        assert_eq!(cleanup.cleanup("/ -- Hello!! --/", "en"), "/hello");
        assert_eq!(cleanup.cleanup("//news//Latest News/", "en"), "/news/latest-news");
        assert_eq!(cleanup.cleanup("/", "en"), "/");
    }

    #[test]
    fn test_custom_replacer() {
        let cleanup = DefaultPathCleanup::new().with_replacer("en", "@", "at");
        assert_eq!(cleanup.cleanup("/Meet @ Noon", "en"), "/meet-at-noon");
    }

    #[test]
    fn test_validate() {
        let cleanup = DefaultPathCleanup::new();
        assert!(cleanup.validate("/"));
        assert!(cleanup.validate("/events/summer-2024"));
        assert!(!cleanup.validate("/Events"));
        assert!(!cleanup.validate("events"));
        assert!(!cleanup.validate("/events/"));
        assert!(cleanup.validate(&cleanup.cleanup("/Über uns", "de")));
    }

    #[test]
    fn test_node_name() {
        let cleanup = DefaultPathCleanup::new();
        assert_eq!(cleanup.node_name("Events", "en"), "events");
        assert_eq!(cleanup.node_name("Shows / Concerts", "en"), "shows-concerts");
        assert_eq!(cleanup.node_name("!!!", "en"), "page");
    }
}
