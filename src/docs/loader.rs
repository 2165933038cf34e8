//! Locale-aware documentation loader.

use std::sync::Arc;

use tracing::{debug, warn};

use super::Fetcher;
use crate::cache::{CacheConfig, TypedCache};
use crate::catalog::{LocalizedText, pick_localized};
use crate::i18n::Locale;
use crate::utils::join_asset_path;

/// Fetches a project's Markdown document for a locale.
///
/// A missing document is an ordinary state, so `load` never fails: every
/// problem is logged and reported as `None`.
#[derive(Clone)]
pub struct DocumentLoader {
    fetcher: Arc<dyn Fetcher>,
    cache: Option<TypedCache<String, String>>,
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLoader").field("cache", &self.cache).finish()
    }
}

impl DocumentLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: CacheConfig) -> Self {
        let cache = (!cache.is_disabled()).then(|| TypedCache::new("documents", cache));
        Self { fetcher, cache }
    }

    /// Loader that always goes to the fetcher.
    pub fn uncached(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher, cache: None }
    }

    /// File name for `locale`: requested, else `en`, else `zh`.
    pub fn select_file(files: &LocalizedText, locale: Locale) -> Option<&str> {
        pick_localized(files, locale).map(String::as_str)
    }

    /// Load the document text, or `None` when there is nothing to show.
    pub async fn load(
        &self,
        base_path: Option<&str>,
        files: Option<&LocalizedText>,
        locale: Locale,
    ) -> Option<String> {
        let (Some(base), Some(files)) = (base_path, files) else {
            return None;
        };
        let file = Self::select_file(files, locale)?;
        let path = join_asset_path(Some(base), file);

        if let Some(text) = self.cache.as_ref().and_then(|c| c.get(&path)) {
            debug!("Document cache hit: {}", path);
            return Some(text);
        }

        match self.fetcher.fetch_text(&path).await {
            Ok(text) => {
                if let Some(cache) = &self.cache {
                    cache.insert(path, text.clone());
                }
                Some(text)
            }
            Err(e) => {
                warn!("Failed to load document {}: {}", path, e);
                None
            }
        }
    }
}
