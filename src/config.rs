use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub content: ContentConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Where seeded documents live and who they are attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    pub webspace: String,
    pub locale: String,
    pub author_id: i64,
}

impl ContentConfig {
    /// Node path of the webspace's home document, e.g. `/cmf/example/contents`
    pub fn content_root(&self) -> String {
        format!("/cmf/{}/contents", self.webspace)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            webspace: "example".to_string(),
            locale: "en".to_string(),
            author_id: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    pub rng_seed: Option<u64>,
    pub event_count: usize,
    pub pages_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let defaults = ContentConfig::default();

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/cms_demo.db".to_string()),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(5),
            },
            content: ContentConfig {
                webspace: env::var("CMS_WEBSPACE").unwrap_or(defaults.webspace),
                locale: env::var("CMS_LOCALE").unwrap_or(defaults.locale),
                author_id: parse_var("CMS_AUTHOR_ID")?.unwrap_or(defaults.author_id),
            },
            seed: SeedConfig {
                rng_seed: parse_var("SEED_RNG_SEED")?,
                event_count: parse_var("SEED_EVENT_COUNT")?.unwrap_or(0),
                pages_file: env::var("SEED_PAGES_FILE").ok().map(PathBuf::from),
            },
        })
    }
}

fn parse_var<T: FromStr>(name: &str) -> AppResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            AppError::ConfigurationError(format!("{} has an invalid value: {:?}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
