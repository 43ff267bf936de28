//! `/blog/:slug`: a single post.
//!
//! The post is looked up by the slug in the URL. Unknown or malformed slugs
//! render the not-found page with a 404 status; storage and rendering
//! failures render the error page with a 500.

use leptos::html::{article, div, h1, img, p, script, section};
use leptos::prelude::*;
use leptos_meta::{Meta, Title, TitleProps};
use leptos_router::hooks::use_params_map;

use crate::{
    api::{INVALID_SLUG, POST_NOT_FOUND, select_post},
    components::{
        error_template::{self, AppError},
        loader,
    },
    date::format_published,
    types::Post,
};

/// Which error page a failed lookup shows.
#[allow(deprecated)]
fn lookup_error(err: &ServerFnError) -> AppError {
    match err {
        ServerFnError::ServerError(message)
            if message == POST_NOT_FOUND || message.starts_with(INVALID_SLUG) =>
        {
            AppError::NotFound
        }
        _ => AppError::Internal,
    }
}

fn error_page(error: AppError) -> impl IntoView {
    let mut errors = Errors::default();
    errors.insert_with_default_key(error);
    error_template::component(Some(errors), None)
}

fn render(post: Post) -> impl IntoView {
    let structured_data = post.structured_data().to_string();

    section().child((
        Title(TitleProps::builder().text(post.title.clone()).build()),
        view! { <Meta name="description" content=post.summary.clone()/> },
        script()
            .attr("type", "application/ld+json")
            .inner_html(structured_data),
        h1().class("text-2xl font-semibold tracking-tighter title")
            .child(post.title.clone()),
        div().class("flex justify-between items-center mt-2 mb-8 text-sm").child(
            p().class("text-sm text-neutral-600 dark:text-neutral-400")
                .child(format_published(&post.published_at, true)),
        ),
        post.image.map(|src| {
            img()
                .src(src)
                .alt(post.title)
                .class("object-contain self-center mb-6 rounded-lg w-fit aspect-auto")
        }),
        article().class("prose").inner_html(post.body),
    ))
}

pub fn component() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.with(|params| params.get("slug").unwrap_or_default());

    let post = Resource::new_blocking(slug, |slug| async move { select_post(slug).await });

    Suspense(
        SuspenseProps::builder()
            .fallback(loader::component)
            .children(TypedChildren::to_children(move || {
                move || {
                    post.get().map(|result| match result {
                        Ok(post) => render(post).into_any(),
                        Err(err) => {
                            leptos::logging::debug_warn!("Post lookup failed: {err}");
                            error_page(lookup_error(&err)).into_any()
                        }
                    })
                }
            }))
            .build(),
    )
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_malformed_slugs_are_not_found() {
        let missing = ServerFnError::ServerError(POST_NOT_FOUND.to_owned());
        let malformed = ServerFnError::ServerError(format!("{INVALID_SLUG}: '../etc'"));
        assert_eq!(lookup_error(&missing), AppError::NotFound);
        assert_eq!(lookup_error(&malformed), AppError::NotFound);
    }

    #[test]
    fn test_other_failures_are_internal() {
        let storage = ServerFnError::ServerError("Database error: connection reset".to_owned());
        let render = ServerFnError::ServerError("Render error: bad theme".to_owned());
        let transport = ServerFnError::Request("offline".to_owned());
        assert_eq!(lookup_error(&storage), AppError::Internal);
        assert_eq!(lookup_error(&render), AppError::Internal);
        assert_eq!(lookup_error(&transport), AppError::Internal);
    }
}
