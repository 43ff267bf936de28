//! Placeholder shown while a post is being fetched.

use leptos::{html::p, prelude::*};

pub fn component() -> impl IntoView {
    p().class("text-sm italic text-neutral-600 dark:text-neutral-400 animate-pulse")
        .child("Loading...")
}
