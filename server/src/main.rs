mod config;
mod content;
mod redirect;
mod security;
mod utils;

use std::process::ExitCode;
use std::sync::Arc;

use app::{component, shell, types::AppState};
use axum::{Router, http::StatusCode, middleware, response::Json, routing::get};
use config::SiteConfig;
use dotenvy::dotenv;
use leptos::logging;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes as _, generate_route_list};
use leptos_config::get_configuration;
use redirect::redirect_www;
use security::security_headers;
use serde_json::json;
use surrealdb::{Surreal, engine::any::Any};

use tower_http::compression::predicate::{NotForContentType, SizeAbove};
use tower_http::compression::{CompressionLayer, Predicate as _};
use tower_http::trace::TraceLayer;
use utils::{connect, robots_handler, rss_handler, sitemap_handler};

async fn health_handler() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "site",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

const fn tracing_level() -> tracing::Level {
    if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

/// Connects to storage and syncs the content directory into it.
///
/// Only a failed connection is fatal; a failed sync is logged and the site
/// serves whatever is already stored.
async fn open_store(config: &SiteConfig) -> Result<Arc<Surreal<Any>>, surrealdb::Error> {
    let db = connect(config).await.map_err(|err| {
        logging::error!("Failed to connect to SurrealDB: {}", err);
        err
    })?;

    match content::sync_posts(&db, &config.content_dir).await {
        Ok(report) => tracing::debug!(?report, "Content sync finished"),
        Err(err) => logging::error!("Failed to sync posts: {}", err),
    }
    Ok(Arc::new(db))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_max_level(tracing_level())
        .init();

    if dotenv().is_err() {
        logging::warn!("There is no corresponding .env file");
    }

    let Ok(conf) = get_configuration(Some("Cargo.toml")) else {
        logging::error!("Failed to get configuration");
        return ExitCode::FAILURE;
    };
    let site_config = SiteConfig::from_env();

    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(component);

    let Ok(db) = open_store(&site_config).await else {
        return ExitCode::FAILURE;
    };

    let app_state = AppState {
        db,
        leptos_options: Arc::new(leptos_options.clone()),
        site_url: site_config.site_url.into(),
    };

    let app = Router::new()
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let app_state = app_state.clone();
                move || provide_context(app_state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .route("/health", get(health_handler))
        .route("/rss", get(rss_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(redirect_www))
                .layer(middleware::from_fn(security_headers)),
        )
        .layer(CompressionLayer::new().compress_when(
            NotForContentType::new("application/rss+xml").and(SizeAbove::new(1024)),
        ))
        .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
        .with_state(app_state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(list) => list,
        Err(err) => {
            logging::error!("Failed to bind tcp listener to {}: {}", &addr, err);
            return ExitCode::FAILURE;
        }
    };
    logging::log!("Listening on http://{}", &addr);

    match axum::serve(listener, app.into_make_service()).await {
        Ok(()) => {
            logging::log!("Server shutdown gracefully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            logging::error!("Failed to serve app: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_level() {
        let expected = if cfg!(debug_assertions) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        assert_eq!(tracing_level(), expected);
    }

    fn config(address: &str) -> SiteConfig {
        let content_dir = std::env::temp_dir().join("site-startup-no-content");
        let address = address.to_owned();
        SiteConfig::from_lookup(move |key| match key {
            "SURREAL_ADDRESS" => Some(address.clone()),
            "CONTENT_DIR" => Some(content_dir.display().to_string()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn test_open_store_with_defaults() {
        let db = open_store(&config("mem://")).await.unwrap();
        assert!(app::api::fetch_posts(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_store_fails_on_unreachable_storage() {
        assert!(open_store(&config("nowhere://db")).await.is_err());
    }

    #[test]
    fn test_health_handler() {
        tokio_test::block_on(async {
            let Json(body) = health_handler().await.unwrap();
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], "site");
            assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
            let timestamp = body["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        });
    }
}
