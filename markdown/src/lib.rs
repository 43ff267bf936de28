//! Post source handling: frontmatter parsing and Markdown to HTML rendering
//! with syntax-highlighted code blocks, KaTeX math, heading anchors and
//! external links opened in a new tab.

pub mod frontmatter;

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::html::push_html;
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use thiserror::Error;

pub use frontmatter::{Document, FrontmatterError, Metadata};

const THEME: &str = "base16-eighties.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("syntax highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
    #[error("highlighting theme `{0}` is not bundled")]
    MissingTheme(&'static str),
}

/// Heading being collected so its text can become the anchor id.
struct PendingHeading<'a> {
    level: HeadingLevel,
    text: String,
    events: Vec<Event<'a>>,
}

impl<'a> PendingHeading<'a> {
    fn push(&mut self, event: Event<'a>) {
        if let Event::Text(text) | Event::Code(text) = &event {
            self.text.push_str(text);
        }
        self.events.push(event);
    }

    fn finish(self, out: &mut Vec<Event<'a>>, seen: &mut HashMap<String, usize>) {
        let base = slugify(&self.text);
        let count = seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;

        let level = self.level as usize;
        out.push(Event::Html(CowStr::from(format!(
            r##"<h{level} id="{id}"><a href="#{id}" class="anchor"></a>"##
        ))));
        out.extend(self.events);
        out.push(Event::Html(CowStr::from(format!("</h{level}>\n"))));
    }
}

/// Turns heading text into an anchor id: lowercase ASCII words joined by
/// single dashes, `&` spelled out as `and`.
#[must_use]
pub fn slugify(text: &str) -> String {
    fn dash(slug: &mut String) {
        if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let mut slug = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        match c {
            c if c.is_ascii_alphanumeric() || c == '_' => slug.push(c),
            ' ' | '-' => dash(&mut slug),
            '&' => {
                dash(&mut slug);
                slug.push_str("and");
                slug.push('-');
            }
            _ => {}
        }
    }
    slug.trim_end_matches('-').to_owned()
}

/// KaTeX output for `expression`, or its escaped source in a
/// `math-error` span when KaTeX rejects it.
fn render_math(expression: &str, opts: &katex::Opts, display: bool) -> String {
    katex::render_with_opts(expression, opts).unwrap_or_else(|_| {
        let delimiter = if display { "$$" } else { "$" };
        format!(
            r#"<span class="math-error">{delimiter}{}{delimiter}</span>"#,
            escape_attr(expression)
        )
    })
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn image_html(src: &str, alt: &str) -> String {
    let src = escape_attr(src);
    let alt = escape_attr(alt);
    // SVG diagrams are drawn black-on-transparent; invert them for the dark theme.
    let filter = if src.to_lowercase().ends_with(".svg") {
        "filter: invert(100%); "
    } else {
        ""
    };
    format!(
        r#"<div style="display: flex; justify-content: center;"><img src="{src}" alt="{alt}" style="{filter}width: 100%;"></div>"#
    )
}

fn highlight_code_block(
    content: &str,
    language: &str,
    theme: &Theme,
) -> Result<String, MarkdownError> {
    let syntax = SYNTAXES
        .find_syntax_by_token(language)
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut html = String::with_capacity(content.len() * 3);
    html.push_str(
        r#"<pre style="background-color: #2b303b; padding: 8px; border-radius: 8px"><code>"#,
    );
    for line in content.lines() {
        let ranges = highlighter.highlight_line(line, &SYNTAXES)?;
        html.push_str(&styled_line_to_highlighted_html(
            &ranges,
            IncludeBackground::No,
        )?);
        html.push('\n');
    }
    html.push_str("</code></pre>");

    Ok(html)
}

/// Renders post Markdown to HTML.
///
/// # Errors
///
/// Fails when a code block cannot be highlighted. Math KaTeX cannot parse is
/// kept as escaped source so the rest of the post still renders.
pub fn process_markdown(markdown: &str) -> Result<String, MarkdownError> {
    let theme = THEMES
        .themes
        .get(THEME)
        .ok_or(MarkdownError::MissingTheme(THEME))?;
    let inline_math = katex::Opts::default();
    let mut display_math = katex::Opts::default();
    display_math.set_display_mode(true);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_MATH);
    let parser = Parser::new_ext(markdown, options);

    let mut events = Vec::new();
    let mut heading_ids = HashMap::new();
    let mut code_block: Option<(String, String)> = None;
    let mut image: Option<(String, String)> = None;
    let mut heading: Option<PendingHeading<'_>> = None;
    let mut in_external_link = false;

    for event in TextMergeStream::new(parser) {
        if let Some((language, content)) = code_block.as_mut() {
            match event {
                Event::Text(text) => content.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let html = highlight_code_block(content, language, theme)?;
                    events.push(Event::Html(CowStr::from(html)));
                    code_block = None;
                }
                _ => {}
            }
            continue;
        }

        // Alt text arrives as events nested inside the image tag.
        if let Some((src, alt)) = image.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                Event::End(TagEnd::Image) => {
                    let html = image_html(src, alt);
                    image = None;
                    let html = Event::Html(CowStr::from(html));
                    match heading.as_mut() {
                        Some(pending) => pending.push(html),
                        None => events.push(html),
                    }
                }
                _ => {}
            }
            continue;
        }

        let event = match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_owned()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                let language = if language.is_empty() {
                    "plaintext".to_owned()
                } else {
                    language
                };
                code_block = Some((language, String::new()));
                continue;
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                image = Some((dest_url.into_string(), String::new()));
                continue;
            }
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(PendingHeading {
                    level,
                    text: String::new(),
                    events: Vec::new(),
                });
                continue;
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(pending) = heading.take() {
                    pending.finish(&mut events, &mut heading_ids);
                }
                continue;
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(&dest_url) => {
                in_external_link = true;
                let title = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_attr(&title))
                };
                Event::InlineHtml(CowStr::from(format!(
                    r#"<a href="{}"{title} target="_blank" rel="noopener noreferrer">"#,
                    escape_attr(&dest_url)
                )))
            }
            Event::End(TagEnd::Link) if in_external_link => {
                in_external_link = false;
                Event::InlineHtml(CowStr::Borrowed("</a>"))
            }
            Event::InlineMath(expression) => {
                Event::InlineHtml(CowStr::from(render_math(&expression, &inline_math, false)))
            }
            Event::DisplayMath(expression) => {
                Event::Html(CowStr::from(render_math(&expression, &display_math, true)))
            }
            other => other,
        };

        match heading.as_mut() {
            Some(pending) => pending.push(event),
            None => events.push(event),
        }
    }

    let mut html_output = String::with_capacity(markdown.len() * 2);
    push_html(&mut html_output, events.into_iter());

    Ok(html_output)
}
