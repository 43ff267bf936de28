//! The posts listing embedded on the landing page and the blog index.
//!
//! [`component`] owns the data fetching; [`list`] only draws what it is
//! given, so pages can be rendered and checked without a server.

use leptos::{
    html::{a, div, p},
    logging,
    prelude::*,
};

use crate::{api::select_posts, date::format_published, types::PostSummary};

/// Attribute value marking the listing's root element.
pub const WIDGET: &str = "blog-posts";

/// Fetches every post and renders them newest first.
///
/// A failed fetch is logged and renders as an empty listing; the page
/// around it is never affected.
pub fn component() -> impl IntoView {
    let posts = Resource::new(|| (), |()| async move { select_posts().await });

    Suspense(
        SuspenseProps::builder()
            .fallback(|| list(Vec::new()))
            .children(TypedChildren::to_children(move || {
                move || {
                    let entries = match posts.get() {
                        Some(Ok(entries)) => entries,
                        Some(Err(err)) => {
                            logging::warn!("Failed to load posts: {err}");
                            Vec::new()
                        }
                        None => Vec::new(),
                    };
                    list(entries)
                }
            }))
            .build(),
    )
}

/// Renders `posts` in the order given, one link per post.
pub fn list(posts: Vec<PostSummary>) -> impl IntoView {
    div()
        .attr("data-widget", WIDGET)
        .child(posts.into_iter().map(entry).collect::<Vec<_>>())
}

fn entry(post: PostSummary) -> impl IntoView {
    a().href(format!("/blog/{}", post.slug))
        .class("flex flex-col space-y-1 mb-4")
        .child(
            div()
                .class("flex flex-col space-x-0 w-full md:flex-row md:space-x-2")
                .child((
                    p().class("text-neutral-600 dark:text-neutral-400 w-[100px] tabular-nums")
                        .child(format_published(&post.published_at, false)),
                    p().class("tracking-tight text-neutral-900 dark:text-neutral-100")
                        .child(post.title),
                )),
        )
}
