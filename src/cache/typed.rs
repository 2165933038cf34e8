//! Named Moka cache.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;
use tracing::trace;

use super::CacheConfig;

/// Bounded, expiring key-value cache with a name for logging.
///
/// Clones share storage.
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Cache<K, V>,
    name: Arc<str>,
}

impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            name: Arc::clone(&self.name),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig) -> Self {
        let builder = Cache::builder().max_capacity(config.max_capacity);
        let entries = match config.ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };

        Self {
            entries,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Look up a live entry. Expired entries count as missing.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hit = self.entries.get(key);
        trace!("{} cache {}", self.name, if hit.is_some() { "hit" } else { "miss" });
        hit
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_insert_then_get() {
        let cache: TypedCache<String, String> = TypedCache::new("documents", CacheConfig::default());
        cache.insert("a/README.md".to_string(), "# A".to_string());

        assert_eq!(cache.get("a/README.md").as_deref(), Some("# A"));
        assert_eq!(cache.get("b/README.md"), None);
        assert_eq!(cache.name(), "documents");
    }

    #[test]
    fn test_clones_share_entries() {
        let cache: TypedCache<String, String> = TypedCache::new("documents", CacheConfig::default());
        let other = cache.clone();
        other.insert("k".to_string(), "v".to_string());

        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_invalidate_all() {
        let cache: TypedCache<String, String> =
            TypedCache::new("documents", CacheConfig::default().ttl(Duration::from_secs(60)));
        cache.insert("k".to_string(), "v".to_string());
        cache.invalidate_all();

        assert_eq!(cache.get("k"), None);
    }
}
