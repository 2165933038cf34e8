//! Vitrine - project detail engine for a bilingual portfolio site
//!
//! Resolves which project a detail-page URL refers to, loads its localized
//! documentation and drives the page's media widgets. Host capabilities are
//! injected as traits, and the page's output is a serializable view model.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `i18n` - Locale state, translations and the persisted preference
//! - `catalog` - Embedded project records and asset bundles
//! - `routing` - Project id resolution from URLs
//! - `cache` - Moka-backed document cache
//! - `docs` - Document fetching, Markdown rendering, synthesized fallback
//! - `widgets` - Gallery, lightbox, video switcher, architecture diagram
//! - `page` - Detail page state machine and view model
//! - `utils` - Utility functions

pub mod cache;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod error;
pub mod i18n;
pub mod page;
pub mod routing;
pub mod utils;
pub mod widgets;

pub use config::Config;
pub use error::PageError;
pub use page::{DetailPage, PageView};
