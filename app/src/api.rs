//! Server functions and storage queries for posts.
//!
//! Posts live in the SurrealDB `post` table, one record per slug
//! (`post:<slug>`). The server's content sync writes them with
//! [`upsert_post`]; pages read them through [`select_posts`] and
//! [`select_post`]. Every query is wrapped in `retry_async`.

#![allow(deprecated)]

use leptos::prelude::{ServerFnError, server};

use crate::types::{Post, PostSummary};

#[cfg(feature = "ssr")]
use leptos::server_fn::error::NoCustomError;
#[cfg(feature = "ssr")]
use shared_utils::{RetryConfig, retry_async};
#[cfg(feature = "ssr")]
use surrealdb::{Surreal, engine::any::Any};

pub const MAX_SLUG_LEN: usize = 200;

/// Error message `select_post` returns for a slug with no stored post.
pub const POST_NOT_FOUND: &str = "Post not found";
/// Prefix of the error message for slugs rejected by [`is_valid_slug`].
pub const INVALID_SLUG: &str = "Invalid slug format";

/// Slugs are path segments and record keys: ASCII letters, digits, `-` and
/// `_`, at most [`MAX_SLUG_LEN`] bytes.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Defines the `post` table so reads succeed before anything was synced.
#[cfg(feature = "ssr")]
pub async fn define_schema(db: &Surreal<Any>) -> Result<(), surrealdb::Error> {
    retry_async("define_schema", RetryConfig::query(), || async move {
        db.query("DEFINE TABLE IF NOT EXISTS post SCHEMALESS")
            .await?
            .check()
    })
    .await
    .map(|_| ())
}

/// All posts, newest first. Equal publication dates fall back to slug order.
#[cfg(feature = "ssr")]
pub async fn fetch_posts(db: &Surreal<Any>) -> Result<Vec<PostSummary>, surrealdb::Error> {
    let mut response = retry_async("fetch_posts", RetryConfig::query(), || async move {
        db.query(
            "SELECT slug, title, published_at, summary FROM post ORDER BY published_at DESC, slug ASC",
        )
        .await
    })
    .await?;
    response.take(0)
}

/// The stored post for `slug`, body still in Markdown.
#[cfg(feature = "ssr")]
pub async fn fetch_post(db: &Surreal<Any>, slug: &str) -> Result<Option<Post>, surrealdb::Error> {
    let mut response = retry_async("fetch_post", RetryConfig::query(), || {
        let slug = slug.to_owned();
        async move {
            db.query(
                "SELECT slug, title, published_at, summary, image, body FROM post WHERE slug = $slug LIMIT 1",
            )
            .bind(("slug", slug))
            .await
        }
    })
    .await?;
    let posts: Vec<Post> = response.take(0)?;
    Ok(posts.into_iter().next())
}

/// Creates or replaces the record for `post.slug`.
#[cfg(feature = "ssr")]
pub async fn upsert_post(db: &Surreal<Any>, post: &Post) -> Result<(), surrealdb::Error> {
    retry_async("upsert_post", RetryConfig::query(), || {
        let post = post.clone();
        async move {
            db.query(
                "UPSERT type::record('post', $slug) SET slug = $slug, title = $title, \
                 published_at = $published_at, summary = $summary, image = $image, body = $body",
            )
            .bind(("slug", post.slug))
            .bind(("title", post.title))
            .bind(("published_at", post.published_at))
            .bind(("summary", post.summary))
            .bind(("image", post.image))
            .bind(("body", post.body))
            .await?
            .check()
        }
    })
    .await
    .map(|_| ())
}

/// Lists every post for the posts widget, newest first.
#[server(endpoint = "/posts")]
pub async fn select_posts() -> Result<Vec<PostSummary>, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;

    let AppState { db, .. } = expect_context::<AppState>();
    fetch_posts(&db)
        .await
        .map_err(|e| ServerFnError::<NoCustomError>::ServerError(format!("Database error: {e}")))
}

/// Fetches one post by slug with its body rendered to HTML.
///
/// Malformed slugs are rejected before any query runs.
#[server(endpoint = "/post")]
pub async fn select_post(slug: String) -> Result<Post, ServerFnError> {
    use crate::types::AppState;
    use leptos::prelude::expect_context;
    use markdown::process_markdown;

    if !is_valid_slug(&slug) {
        return Err(ServerFnError::<NoCustomError>::ServerError(format!(
            "{INVALID_SLUG}: '{}'",
            slug.chars().take(50).collect::<String>()
        )));
    }

    let AppState { db, .. } = expect_context::<AppState>();
    let mut post = fetch_post(&db, &slug)
        .await
        .map_err(|e| ServerFnError::<NoCustomError>::ServerError(format!("Database error: {e}")))?
        .ok_or_else(|| ServerFnError::<NoCustomError>::ServerError(POST_NOT_FOUND.to_owned()))?;

    post.body = process_markdown(&post.body).map_err(|e| {
        tracing::error!(slug = %post.slug, "Failed to render post: {e}");
        ServerFnError::<NoCustomError>::ServerError(format!("Render error: {e}"))
    })?;

    Ok(post)
}
