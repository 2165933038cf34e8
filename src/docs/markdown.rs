//! Markdown rendering.

use pulldown_cmark::{Options, Parser, html};
use tracing::error;

use crate::error::RenderError;
use crate::utils::html_escape;

/// Converts Markdown source to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;

    /// Whether this renderer can produce output at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// GitHub-flavoured rendering (tables, strikethrough, task lists).
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonMarkRenderer;

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// Stand-in when no Markdown renderer is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MarkdownRenderer for NullRenderer {
    fn render(&self, _markdown: &str) -> Result<String, RenderError> {
        Ok(String::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Render a document for display.
///
/// Returns an empty string for empty input or an unavailable renderer, so the
/// caller can show its synthesized fallback. A failing renderer yields the
/// escaped source in a `<pre>` block instead of dropping the content.
pub fn render_document(renderer: &dyn MarkdownRenderer, markdown: &str) -> String {
    if markdown.is_empty() || !renderer.is_available() {
        return String::new();
    }

    match renderer.render(markdown) {
        Ok(html) => html,
        Err(e) => {
            error!("Error rendering Markdown: {}", e);
            format!("<pre>{}</pre>", html_escape(markdown))
        }
    }
}
