//! Error page shown for unknown routes and missing posts.
//!
//! On the server the first error's status code becomes the response status.

use http::status::StatusCode;
use leptos::{
    html::{a, div, h1, p},
    prelude::*,
};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    Internal,
}

impl AppError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Collects the [`AppError`]s out of `errors`, ignoring any other error type.
/// An empty collection reads as [`AppError::NotFound`].
fn app_errors(errors: Errors) -> Vec<AppError> {
    let found: Vec<AppError> = errors
        .into_iter()
        .filter_map(|(_key, error)| error.downcast_ref::<AppError>().cloned())
        .collect();
    if found.is_empty() {
        vec![AppError::NotFound]
    } else {
        found
    }
}

/// Renders the errors passed in from the router fallback (`outside_errors`)
/// or from an error boundary (`errors`).
pub fn component(
    outside_errors: Option<Errors>,
    errors: Option<RwSignal<Errors>>,
) -> impl IntoView {
    let errors = outside_errors
        .or_else(|| errors.map(|signal| signal.get_untracked()))
        .unwrap_or_default();
    let errors = app_errors(errors);

    #[cfg(feature = "ssr")]
    {
        use leptos_axum::ResponseOptions;
        if let (Some(response), Some(first)) = (use_context::<ResponseOptions>(), errors.first()) {
            response.set_status(first.status_code());
        }
    }

    div().class("flex flex-col gap-4 py-16").child((
        h1().class("text-2xl font-semibold tracking-tighter")
            .child(if errors.len() > 1 { "Errors" } else { "Error" }),
        errors
            .into_iter()
            .map(|error| {
                p().class("tracking-widest uppercase text-neutral-600 dark:text-neutral-400")
                    .child(format!("{}| {error}", error.status_code().as_u16()))
            })
            .collect::<Vec<_>>(),
        a().href("/")
            .class("underline transition-all hover:text-neutral-800 dark:hover:text-neutral-200")
            .child("Go back home"),
    ))
}
