use serde::{Deserialize, Serialize};

#[cfg(feature = "ssr")]
use axum::extract::FromRef;
#[cfg(feature = "ssr")]
use leptos::config::LeptosOptions;
#[cfg(feature = "ssr")]
use surrealdb::{Surreal, engine::any::Any};
#[cfg(feature = "ssr")]
use surrealdb_types::SurrealValue;

#[cfg(feature = "ssr")]
#[derive(FromRef, Debug, Clone)]
pub struct AppState {
    pub db: std::sync::Arc<Surreal<Any>>,
    pub leptos_options: std::sync::Arc<LeptosOptions>,
    /// Absolute origin used for links in feeds, e.g. `https://example.com`.
    pub site_url: std::sync::Arc<str>,
}

#[cfg(feature = "ssr")]
impl FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.as_ref().clone()
    }
}

/// What the posts listing needs to show one entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "ssr", derive(SurrealValue))]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    /// RFC 3339 timestamp in UTC.
    pub published_at: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "ssr", derive(SurrealValue))]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// RFC 3339 timestamp in UTC.
    pub published_at: String,
    pub summary: String,
    pub image: Option<String>,
    /// Markdown when stored, HTML once served by `select_post`.
    pub body: String,
}

impl Post {
    #[must_use]
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            published_at: self.published_at.clone(),
            summary: self.summary.clone(),
        }
    }

    /// Schema.org `BlogPosting` description embedded in the post page.
    #[must_use]
    pub fn structured_data(&self) -> serde_json::Value {
        serde_json::json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": self.title,
            "datePublished": self.published_at,
            "dateModified": self.published_at,
            "description": self.summary,
            "image": self.image,
            "url": format!("/blog/{}", self.slug),
        })
    }
}
