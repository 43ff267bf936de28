// Routes, pages and server functions of the site
use crate::components::{error_template, footer, nav};
use leptos::{
    html::{body, head, html, meta},
    prelude::*,
};
use leptos_meta::{MetaTags, Stylesheet, StylesheetProps, Title, TitleProps, provide_meta_context};
use leptos_router::{
    ParamSegment, SsrMode, StaticSegment,
    components::{FlatRoutes, Route, Router},
};

pub mod api;
mod blog;
pub mod components;
pub mod date;
pub mod home;
mod post;
pub mod types;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    let html_comp = html()
        .lang("en")
        .class("text-black bg-white dark:text-white dark:bg-black")
        .child((
            head().child((
                meta().charset("utf-8"),
                meta()
                    .name("viewport")
                    .content("width=device-width, initial-scale=1"),
                HydrationScripts(HydrationScriptsProps::builder().options(options).build()),
                MetaTags(),
                Stylesheet(
                    StylesheetProps::builder()
                        .id("leptos")
                        .href("/pkg/site.css")
                        .build(),
                ),
                Stylesheet(
                    StylesheetProps::builder()
                        .id("katex")
                        .href("/katex.min.css")
                        .build(),
                ),
                Title(TitleProps::builder().text("Leoman").build()),
            )),
            body()
                .class("mx-4 mt-8 max-w-xl antialiased lg:mx-auto")
                .child(self::component),
        ));

    view! {
        <!DOCTYPE html>
        {html_comp}
    }
}

#[must_use]
pub fn component() -> impl IntoView {
    view! {
        <Router>
            <main class="flex flex-col flex-auto px-2 mt-6 min-w-0 md:px-0">
                {nav::component}
                <FlatRoutes fallback=|| {
                    let mut outside_errors = Errors::default();
                    outside_errors.insert_with_default_key(error_template::AppError::NotFound);
                    error_template::component(Some(outside_errors), None)
                }>
                    <Route path=StaticSegment("") view=home::component ssr=SsrMode::InOrder/>
                    <Route path=StaticSegment("blog") view=blog::component ssr=SsrMode::InOrder/>
                    <Route path=(StaticSegment("blog"), ParamSegment("slug")) view=post::component ssr=SsrMode::Async/>
                </FlatRoutes>
                {footer::component}
            </main>
        </Router>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_creation() {
        let options = LeptosOptions::builder().output_name("site").build();
        drop(shell(options));
    }

    #[test]
    fn test_component_function_signatures() {
        let _shell_fn: fn(LeptosOptions) -> _ = shell;
        let _component_fn: fn() -> _ = component;
        let _home_fn: fn() -> _ = home::component;
        let _blog_fn: fn() -> _ = blog::component;
        let _post_fn: fn() -> _ = post::component;
    }
}
