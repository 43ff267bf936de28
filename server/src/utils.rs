use app::api::{define_schema, fetch_posts};
use app::date::parse_published_at;
use app::types::{AppState, PostSummary};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use core::fmt::{self, Write as _};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use shared_utils::{RetryConfig, retry_async};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::error;

use crate::config::SiteConfig;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

fn build_response(body: String, content_type: &str, status: StatusCode) -> Response<String> {
    match Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .body(body)
    {
        Ok(response) => response,
        Err(build_error) => {
            error!(?build_error, "Failed to build HTTP response");
            let mut fallback = Response::new(String::new());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        }
    }
}

fn failure(message: &str) -> Response<String> {
    build_response(
        message.to_owned(),
        TEXT_PLAIN,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

/// Opens the storage engine named by `SURREAL_ADDRESS`, signs in when root
/// credentials are configured, selects the namespace and database and
/// defines the `post` table.
pub async fn connect(config: &SiteConfig) -> Result<Surreal<Any>, surrealdb::Error> {
    let address = config.surreal_address.as_str();
    let db = retry_async("connect", RetryConfig::connect(), || async move {
        tracing::info!("Connecting to SurrealDB at {address}");
        any::connect(address).await
    })
    .await?;
    let handle = &db;

    if let Some((username, password)) = &config.root_credentials {
        retry_async("signin", RetryConfig::connect(), || {
            let credentials = Root {
                username: username.clone(),
                password: password.clone(),
            };
            async move { handle.signin(credentials).await.map(|_| ()) }
        })
        .await?;
    }

    let (namespace, database) = (config.namespace.as_str(), config.database.as_str());
    retry_async("use_ns", RetryConfig::query(), || async move {
        handle.use_ns(namespace).use_db(database).await
    })
    .await?;
    define_schema(handle).await?;

    tracing::info!(
        namespace = %config.namespace,
        database = %config.database,
        "Connected to SurrealDB"
    );
    Ok(db)
}

/// RSS 2.0 channel with one item per post, in the order given.
pub fn generate_rss(posts: &[PostSummary], site_url: &str) -> String {
    let items = posts
        .iter()
        .map(|post| {
            let link = format!("{site_url}/blog/{}", post.slug);
            ItemBuilder::default()
                .title(Some(post.title.clone()))
                .link(Some(link.clone()))
                .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
                .description(Some(post.summary.clone()))
                .pub_date(parse_published_at(&post.published_at).map(|ts| ts.to_rfc2822()))
                .build()
        })
        .collect::<Vec<_>>();

    ChannelBuilder::default()
        .title("Leoman")
        .link(site_url.to_owned())
        .description("Posts by Leoman")
        .items(items)
        .build()
        .to_string()
}

pub async fn rss_handler(State(state): State<AppState>) -> Response<String> {
    let AppState { db, site_url, .. } = state;
    match fetch_posts(&db).await {
        Ok(posts) => build_response(
            generate_rss(&posts, &site_url),
            "application/rss+xml",
            StatusCode::OK,
        ),
        Err(err) => {
            error!(?err, "Failed to generate RSS feed");
            failure("Failed to generate RSS feed")
        }
    }
}

/// Sitemap listing the landing page, the blog index and every post.
pub fn build_sitemap(posts: &[PostSummary], site_url: &str) -> Result<String, fmt::Error> {
    let mut sitemap = String::new();
    sitemap.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    sitemap.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for route in ["", "/blog"] {
        writeln!(sitemap, "<url>\n<loc>{site_url}{route}/</loc>\n</url>")?;
    }

    for post in posts {
        writeln!(sitemap, "<url>")?;
        writeln!(sitemap, "<loc>{site_url}/blog/{}</loc>", post.slug)?;
        if let Some(published) = parse_published_at(&post.published_at) {
            writeln!(sitemap, "<lastmod>{}</lastmod>", published.format("%Y-%m-%d"))?;
        }
        writeln!(sitemap, "</url>")?;
    }

    sitemap.push_str("</urlset>");
    Ok(sitemap)
}

pub async fn sitemap_handler(State(state): State<AppState>) -> Response<String> {
    let AppState { db, site_url, .. } = state;
    let posts = match fetch_posts(&db).await {
        Ok(posts) => posts,
        Err(err) => {
            error!(?err, "Failed to fetch sitemap posts");
            return failure("Failed to build sitemap");
        }
    };
    match build_sitemap(&posts, &site_url) {
        Ok(sitemap) => build_response(sitemap, "application/xml", StatusCode::OK),
        Err(err) => {
            error!(?err, "Failed to write sitemap");
            failure("Failed to build sitemap")
        }
    }
}

pub fn robots_txt(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {site_url}/sitemap.xml\n")
}

pub async fn robots_handler(State(state): State<AppState>) -> Response<String> {
    build_response(robots_txt(&state.site_url), TEXT_PLAIN, StatusCode::OK)
}
