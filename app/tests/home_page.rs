//! Server-side rendering of the landing page and the posts listing.

use app::{components::posts, home, types::PostSummary};
use leptos::{html::div, prelude::*, tachys::view::RenderHtml};

const WIDGET_MARKER: &str = r#"data-widget="blog-posts""#;

fn render<V: RenderHtml>(view: impl FnOnce() -> V) -> String {
    let owner = Owner::new();
    owner.set();
    view().to_html()
}

fn summary(slug: &str, title: &str, published_at: &str) -> PostSummary {
    PostSummary {
        slug: slug.to_owned(),
        title: title.to_owned(),
        published_at: published_at.to_owned(),
        summary: String::new(),
    }
}

#[test]
fn test_heading_says_hello() {
    let html = render(|| home::section(|| posts::list(Vec::new())));
    assert!(html.contains(r#"<h1 class="mb-8 text-2xl font-semibold tracking-tighter">Hello!</h1>"#));
}

#[test]
fn test_bio_is_rendered_verbatim() {
    let html = render(|| home::section(|| posts::list(Vec::new())));
    assert!(html.contains(r#"<p class="mb-4">"#));
    assert!(html.contains(home::BIO));
}

#[test]
fn test_bio_text() {
    assert!(home::BIO.starts_with("I'm Leoman \u{2014} a frontend engineer"));
    assert!(home::BIO.contains("experiences.\nWith 8+ years of experience"));
    assert!(home::BIO.ends_with("a seamless developer experience."));
}

#[test]
fn test_exactly_one_posts_widget() {
    let posts = vec![
        summary("vim", "Embracing Vim", "2024-04-09T00:00:00Z"),
        summary("spaces-vs-tabs", "Spaces vs. Tabs", "2024-04-08T00:00:00Z"),
    ];
    let html = render(move || home::section(move || posts::list(posts)));
    assert_eq!(html.matches(WIDGET_MARKER).count(), 1);
}

#[test]
fn test_widget_sits_inside_container_after_bio() {
    let html = render(|| home::section(|| div().class("stub-widget")));
    let heading = html.find("Hello!").unwrap();
    let bio = html.find("I'm Leoman").unwrap();
    let container = html.find(r#"<div class="my-8">"#).unwrap();
    let widget = html.find("stub-widget").unwrap();
    assert!(heading < bio && bio < container && container < widget);
    assert!(html.starts_with("<section>"));
    assert!(html.trim_end().ends_with("</section>"));
}

#[test]
fn test_widget_called_once() {
    let mut calls = 0;
    let html = render(|| {
        home::section(|| {
            calls += 1;
            div().class("stub-widget")
        })
    });
    assert_eq!(calls, 1);
    assert_eq!(html.matches("stub-widget").count(), 1);
}

#[test]
fn test_posts_list_links_and_dates() {
    let html = render(|| {
        posts::list(vec![
            summary("vim", "Embracing Vim", "2024-04-09T00:00:00Z"),
            summary("spaces-vs-tabs", "Spaces vs. Tabs", "2024-04-08T00:00:00Z"),
        ])
    });
    assert_eq!(html.matches("<a ").count(), 2);
    assert!(html.contains(r#"href="/blog/vim""#));
    assert!(html.contains(r#"href="/blog/spaces-vs-tabs""#));
    assert!(html.contains("April 9, 2024"));
    assert!(html.contains("April 8, 2024"));
    assert_eq!(html.matches(r#"class="flex flex-col space-y-1 mb-4""#).count(), 2);

    let first = html.find("Embracing Vim").unwrap();
    let second = html.find("Spaces vs. Tabs").unwrap();
    assert!(first < second);
}

#[test]
fn test_empty_posts_list_keeps_wrapper() {
    let html = render(|| posts::list(Vec::new()));
    assert!(html.contains(WIDGET_MARKER));
    assert!(!html.contains("<a "));
}
