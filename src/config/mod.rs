//! Configuration module for vitrine.
//!
//! Loads configuration from environment variables. Nothing here is required;
//! unset or malformed values fall back to defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;
use url::Url;

use crate::cache::CacheConfig;
use crate::i18n::Locale;
use crate::routing::DEFAULT_PAGE_NAME;

const DEFAULT_LAZY_MARGIN: u32 = 50;
const DEFAULT_DOC_CACHE_CAPACITY: u64 = 64;
const DEFAULT_DOC_CACHE_TTL_SECS: u64 = 300;

/// Where project assets are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRoot {
    Http(Url),
    Dir(PathBuf),
}

impl AssetRoot {
    /// `http://` and `https://` values are URLs, anything else is a directory.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Http(url),
            _ => Self::Dir(PathBuf::from(value)),
        }
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::Dir(PathBuf::from("."))
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub asset_root: AssetRoot,

    /// File name of the detail page, skipped when reading ids from paths.
    pub page_name: String,

    /// Forces the initial locale instead of the saved or detected one.
    pub locale: Option<Locale>,

    /// Where the locale preference is persisted. Session-only when unset.
    pub locale_file: Option<PathBuf>,

    /// Directory of `zh.json`/`en.json` replacing the embedded translations.
    pub locale_dir: Option<PathBuf>,

    /// Lookahead before a screenshot scrolls into view, in pixels.
    pub lazy_margin: u32,

    pub doc_cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: AssetRoot::default(),
            page_name: DEFAULT_PAGE_NAME.to_string(),
            locale: None,
            locale_file: None,
            locale_dir: None,
            lazy_margin: DEFAULT_LAZY_MARGIN,
            doc_cache: CacheConfig::documents(DEFAULT_DOC_CACHE_CAPACITY, DEFAULT_DOC_CACHE_TTL_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `.env` is not read here; the binary loads it once at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let locale = get("VITRINE_LOCALE").and_then(|v| match Locale::from_str(&v) {
            Ok(locale) => Some(locale),
            Err(e) => {
                warn!("Ignoring VITRINE_LOCALE: {}", e);
                None
            }
        });

        let capacity = number(&get, "VITRINE_DOC_CACHE_CAPACITY", DEFAULT_DOC_CACHE_CAPACITY);
        let ttl_secs = number(&get, "VITRINE_DOC_CACHE_TTL_SECS", DEFAULT_DOC_CACHE_TTL_SECS);

        Self {
            asset_root: get("VITRINE_ASSET_ROOT")
                .map(|v| AssetRoot::parse(&v))
                .unwrap_or_default(),
            page_name: get("VITRINE_PAGE_NAME").unwrap_or_else(|| DEFAULT_PAGE_NAME.to_string()),
            locale,
            locale_file: get("VITRINE_LOCALE_FILE").map(PathBuf::from),
            locale_dir: get("VITRINE_LOCALE_DIR").map(PathBuf::from),
            lazy_margin: number(&get, "VITRINE_LAZY_MARGIN", DEFAULT_LAZY_MARGIN),
            doc_cache: CacheConfig::documents(capacity, ttl_secs),
        }
    }
}

fn number<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}
