use leptos::prelude::*;
use leptos_router::components::A;

pub fn component() -> impl IntoView {
    view! {
        <aside class="mb-16 -ml-[8px] tracking-tight">
            <div class="lg:sticky lg:top-20">
                <nav
                    class="flex relative flex-row items-start px-0 pb-0 md:overflow-auto md:relative fade scroll-pr-6"
                    id="nav"
                >
                    <div class="flex flex-row pr-10 space-x-0">
                        <A href="/">
                            <span class="flex relative py-1 px-2 m-1 align-middle transition-all hover:text-neutral-800 dark:hover:text-neutral-200">
                                "home"
                            </span>
                        </A>
                        <A href="/blog">
                            <span class="flex relative py-1 px-2 m-1 align-middle transition-all hover:text-neutral-800 dark:hover:text-neutral-200">
                                "blog"
                            </span>
                        </A>
                    </div>
                </nav>
            </div>
        </aside>
    }
}
