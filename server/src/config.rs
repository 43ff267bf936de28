//! Runtime settings read from the environment (after `.env` is loaded).
//!
//! | variable | default |
//! |---|---|
//! | `SITE_URL` | `http://127.0.0.1:3007` |
//! | `CONTENT_DIR` | `content/posts` |
//! | `SURREAL_ADDRESS` | `mem://` |
//! | `SURREAL_NS` / `SURREAL_DB` | `site` |
//! | `SURREAL_ROOT_USER` / `SURREAL_ROOT_PASS` | unset |

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Public origin without a trailing slash.
    pub site_url: String,
    pub content_dir: PathBuf,
    pub surreal_address: String,
    pub namespace: String,
    pub database: String,
    pub root_credentials: Option<(String, String)>,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_owned());

        Self {
            site_url: get_or("SITE_URL", "http://127.0.0.1:3007")
                .trim_end_matches('/')
                .to_owned(),
            content_dir: PathBuf::from(get_or("CONTENT_DIR", "content/posts")),
            surreal_address: get_or("SURREAL_ADDRESS", "mem://"),
            namespace: get_or("SURREAL_NS", "site"),
            database: get_or("SURREAL_DB", "site"),
            root_credentials: get("SURREAL_ROOT_USER").zip(get("SURREAL_ROOT_PASS")),
        }
    }
}
