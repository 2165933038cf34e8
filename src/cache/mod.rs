//! Cache module - bounded in-memory caches backed by Moka.
//!
//! The document loader keeps fetched Markdown here so that toggling the
//! locale back and forth does not hit the network for text it already has.
//!
//! ```rust,ignore
//! let docs: TypedCache<String, String> = TypedCache::new("documents", CacheConfig::default());
//! docs.insert(path.clone(), text);
//! let hit = docs.get(&path);
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
