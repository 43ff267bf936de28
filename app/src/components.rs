//! Reusable pieces shared by the site's pages: navigation, footer, the
//! posts listing, loading and error views.

pub mod error_template;
pub mod footer;
pub mod loader;
pub mod nav;
pub mod posts;
