//! Project documentation: fetching, Markdown rendering and the synthesized
//! fallback shown when no document is available.

mod fallback;
mod fetcher;
mod loader;
mod markdown;

pub use fallback::synthesize_fallback;
pub use fetcher::{Fetcher, FsFetcher, HttpFetcher};
pub use loader::DocumentLoader;
pub use markdown::{CommonMarkRenderer, MarkdownRenderer, NullRenderer, render_document};
