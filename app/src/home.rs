//! The landing page: a greeting, a short biography and the posts listing.

use leptos::{
    html::{div, h1, p, section as section_el},
    prelude::*,
};
use leptos_meta::{Title, TitleProps};

use crate::components::posts;

pub const HEADING: &str = "Hello!";

/// Shown exactly as written, line break included.
pub const BIO: &str = "I'm Leoman \u{2014} a frontend engineer who builds fast, accessible, and scalable web experiences.
With 8+ years of experience, I craft high-performance websites using modern tools like Next.js, Tailwind CSS, and Sanity. I'm a static typing advocate and VS Code user\u{2014}always focused on clean, maintainable code and a seamless developer experience.";

/// Lays out the greeting and biography with `widget` rendered once below them.
pub fn section<V>(widget: impl FnOnce() -> V) -> impl IntoView
where
    V: IntoView + 'static,
{
    section_el().child((
        h1().class("mb-8 text-2xl font-semibold tracking-tighter")
            .child(HEADING),
        p().class("mb-4").child(BIO),
        div().class("my-8").child(widget()),
    ))
}

pub fn component() -> impl IntoView {
    (
        Title(TitleProps::builder().text("Leoman").build()),
        section(posts::component),
    )
}
