//! Browser entry point. Hydrates the server-rendered pages so navigation
//! between `/`, `/blog` and posts happens client-side.

/// Log level for the browser console: everything in debug builds, warnings
/// and above in release builds.
fn console_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Warn
    }
}

#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    _ = console_log::init_with_level(console_level());
    console_error_panic_hook::set_once();

    leptos::mount::hydrate_body(app::component);
}
