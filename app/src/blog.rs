//! `/blog`: every post, newest first.

use leptos::prelude::*;
use leptos_meta::{Meta, Title};

use crate::components::posts;

pub fn component() -> impl IntoView {
    view! {
        <Title text="Blog"/>
        <Meta name="description" content="Read my blog."/>
        <section>
            <h1 class="mb-8 text-2xl font-semibold tracking-tighter">"My Blog"</h1>
            {posts::component()}
        </section>
    }
}
