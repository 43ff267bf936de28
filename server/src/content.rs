//! Loads Markdown posts from the content directory into storage.
//!
//! Each `*.md` / `*.mdx` file is one post; its file stem is the slug. Files
//! that fail to parse are logged and skipped so one broken draft never keeps
//! the rest of the site from updating.

use std::io;
use std::path::{Path, PathBuf};

use app::api::{is_valid_slug, upsert_post};
use app::date::normalize_published_at;
use app::types::Post;
use markdown::{FrontmatterError, frontmatter};
use surrealdb::{Surreal, engine::any::Any};
use thiserror::Error;
use tracing::{info, warn};

const EXTENSIONS: [&str; 2] = ["md", "mdx"];

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to read content directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: file name is not a valid slug", .path.display())]
    InvalidSlug { path: PathBuf },
    #[error("{}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("{}: unrecognised publishedAt `{value}`", .path.display())]
    InvalidDate { path: PathBuf, value: String },
    #[error("failed to store post `{slug}`: {source}")]
    Storage {
        slug: String,
        #[source]
        source: surrealdb::Error,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
}

fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// Builds a [`Post`] from the contents of the file at `path`.
pub fn parse_post(path: &Path, source: &str) -> Result<Post, SyncError> {
    let slug = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| is_valid_slug(stem))
        .ok_or_else(|| SyncError::InvalidSlug {
            path: path.to_owned(),
        })?;

    let document = frontmatter::parse(source).map_err(|source| SyncError::Frontmatter {
        path: path.to_owned(),
        source,
    })?;
    let metadata = document.metadata;

    let published_at = normalize_published_at(&metadata.published_at).ok_or_else(|| {
        SyncError::InvalidDate {
            path: path.to_owned(),
            value: metadata.published_at.clone(),
        }
    })?;

    Ok(Post {
        slug: slug.to_owned(),
        title: metadata.title,
        published_at,
        summary: metadata.summary,
        image: metadata.image,
        body: document.content.to_owned(),
    })
}

/// Reads every post file in `dir`, sorted by file name.
///
/// Returns the parsed posts along with the per-file errors of the files that
/// were skipped. Only an unreadable directory is an error.
pub async fn load_posts(dir: &Path) -> Result<(Vec<Post>, Vec<SyncError>), SyncError> {
    let read_dir_error = |source| SyncError::ReadDir {
        path: dir.to_owned(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        if is_post_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut posts = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        let parsed = match tokio::fs::read_to_string(&path).await {
            Ok(source) => parse_post(&path, &source),
            Err(source) => Err(SyncError::ReadFile { path, source }),
        };
        match parsed {
            Ok(post) => posts.push(post),
            Err(err) => skipped.push(err),
        }
    }

    Ok((posts, skipped))
}

/// Upserts every valid post in `dir` into storage.
///
/// A missing directory is treated as an empty one. Posts already stored but
/// no longer on disk are left in place.
pub async fn sync_posts(db: &Surreal<Any>, dir: &Path) -> Result<SyncReport, SyncError> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        warn!(dir = %dir.display(), "Content directory not found; no posts synced");
        return Ok(SyncReport::default());
    }

    let (posts, skipped) = load_posts(dir).await?;
    for err in &skipped {
        warn!("Skipping post: {err}");
    }

    for post in &posts {
        upsert_post(db, post)
            .await
            .map_err(|source| SyncError::Storage {
                slug: post.slug.clone(),
                source,
            })?;
    }

    let report = SyncReport {
        synced: posts.len(),
        skipped: skipped.len(),
    };
    info!(
        dir = %dir.display(),
        synced = report.synced,
        skipped = report.skipped,
        "Synced posts"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app::api::fetch_posts;
    use std::fs;

    struct ContentDir(PathBuf);

    impl ContentDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "site-content-{}-{name}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) {
            fs::write(self.0.join(file), contents).unwrap();
        }
    }

    impl Drop for ContentDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn post_file(title: &str, date: &str) -> String {
        format!("---\ntitle: '{title}'\npublishedAt: {date}\nsummary: About {title}\n---\n\nHello from {title}.\n")
    }

    async fn memory_db() -> Surreal<Any> {
        let db = surrealdb::engine::any::connect("mem://").await.unwrap();
        db.use_ns("test").use_db("site").await.unwrap();
        app::api::define_schema(&db).await.unwrap();
        db
    }

    #[test]
    fn test_parse_post() {
        let post = parse_post(
            Path::new("posts/static-typing.mdx"),
            "---\ntitle: \"The Power of Static Typing\"\npublishedAt: 2024-04-07\nsummary: Types.\nimage: /t.png\n---\nBody",
        )
        .unwrap();
        assert_eq!(post.slug, "static-typing");
        assert_eq!(post.title, "The Power of Static Typing");
        assert_eq!(post.published_at, "2024-04-07T00:00:00Z");
        assert_eq!(post.summary, "Types.");
        assert_eq!(post.image.as_deref(), Some("/t.png"));
        assert_eq!(post.body, "Body");
    }

    #[test]
    fn test_parse_post_rejects_bad_slug() {
        let err = parse_post(Path::new("my post.md"), &post_file("x", "2024-01-01")).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSlug { .. }));
    }

    #[test]
    fn test_parse_post_rejects_bad_date() {
        let err = parse_post(Path::new("p.md"), &post_file("x", "next week")).unwrap_err();
        assert!(matches!(err, SyncError::InvalidDate { ref value, .. } if value == "next week"));
    }

    #[test]
    fn test_parse_post_reports_frontmatter_errors() {
        let err = parse_post(Path::new("p.md"), "no frontmatter here").unwrap_err();
        assert!(matches!(
            err,
            SyncError::Frontmatter {
                source: FrontmatterError::Missing,
                ..
            }
        ));
        assert!(err.to_string().starts_with("p.md: "));
    }

    #[test]
    fn test_post_file_extensions() {
        assert!(is_post_file(Path::new("a.md")));
        assert!(is_post_file(Path::new("a.mdx")));
        assert!(!is_post_file(Path::new("a.txt")));
        assert!(!is_post_file(Path::new("README")));
    }

    #[tokio::test]
    async fn test_load_posts_skips_broken_files() {
        let dir = ContentDir::new("load");
        dir.write("b-post.md", &post_file("B", "2024-02-02"));
        dir.write("a-post.mdx", &post_file("A", "2024-01-01"));
        dir.write("broken.md", "# no frontmatter");
        dir.write("notes.txt", "ignored");

        let (posts, skipped) = load_posts(&dir.0).await.unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a-post", "b-post"]);
        assert_eq!(skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_load_posts_missing_dir_is_error() {
        let missing = std::env::temp_dir().join("site-content-definitely-missing");
        let err = load_posts(&missing).await.unwrap_err();
        assert!(matches!(err, SyncError::ReadDir { .. }));
    }

    #[tokio::test]
    async fn test_sync_posts_into_storage() {
        let dir = ContentDir::new("sync");
        dir.write("older.md", &post_file("Older", "2023-05-01"));
        dir.write("newer.md", &post_file("Newer", "2024-05-01"));
        dir.write("draft.md", "---\ntitle: Draft\n---\n");
        let db = memory_db().await;

        let report = sync_posts(&db, &dir.0).await.unwrap();
        assert_eq!(report, SyncReport { synced: 2, skipped: 1 });

        let titles: Vec<String> = fetch_posts(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_resync_updates_in_place() {
        let dir = ContentDir::new("resync");
        dir.write("post.md", &post_file("First", "2024-01-01"));
        let db = memory_db().await;
        sync_posts(&db, &dir.0).await.unwrap();

        dir.write("post.md", &post_file("Second", "2024-01-01"));
        sync_posts(&db, &dir.0).await.unwrap();

        let posts = fetch_posts(&db).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Second");
    }

    #[tokio::test]
    async fn test_sync_missing_dir_is_empty() {
        let db = memory_db().await;
        let missing = std::env::temp_dir().join("site-content-also-missing");
        let report = sync_posts(&db, &missing).await.unwrap();
        assert_eq!(report, SyncReport::default());
    }
}
