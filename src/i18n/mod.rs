//! Internationalization (i18n) module.
//!
//! Owns the current display locale, the translation bundles and the persisted
//! locale preference. Everything locale-dependent on the page reads the
//! locale from here and listens for changes through [`LocaleService::subscribe`].

mod store;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use store::{FileLocaleStore, LocaleStore, MemoryLocaleStore};

/// Display language of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// The other locale.
    pub fn toggled(self) -> Self {
        match self {
            Self::Zh => Self::En,
            Self::En => Self::Zh,
        }
    }

    /// Guess a locale from a language tag such as `zh_CN.UTF-8` or `en-US`.
    ///
    /// Anything mentioning `zh` is Chinese, everything else (including no tag) is English.
    pub fn detect(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) if tag.to_lowercase().contains("zh") => Self::Zh,
            _ => Self::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zh" => Ok(Self::Zh),
            "en" => Ok(Self::En),
            other => Err(other.to_string()),
        }
    }
}

/// Order in which localized values are tried: requested, then `en`, then `zh`.
pub fn fallback_chain(locale: Locale) -> Vec<Locale> {
    let mut chain = vec![locale];
    for l in [Locale::En, Locale::Zh] {
        if !chain.contains(&l) {
            chain.push(l);
        }
    }
    chain
}

/// Embedded translation bundles: Locale -> nested key tree.
static EMBEDDED: Lazy<HashMap<Locale, Value>> = Lazy::new(|| {
    let mut map = HashMap::new();

    match serde_json::from_str(include_str!("zh.json")) {
        Ok(val) => {
            map.insert(Locale::Zh, val);
        }
        Err(e) => warn!("Embedded zh bundle is invalid: {}", e),
    }

    match serde_json::from_str(include_str!("en.json")) {
        Ok(val) => {
            map.insert(Locale::En, val);
        }
        Err(e) => warn!("Embedded en bundle is invalid: {}", e),
    }

    map
});

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        match current.get(part) {
            Some(v) => current = v,
            None => return None,
        }
    }
    current.as_str().map(|s| s.to_string())
}

fn load_bundle_file(dir: &Path, locale: Locale) -> Result<Value, String> {
    let path = dir.join(format!("{}.json", locale));
    let text = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

struct Inner {
    bundles: RwLock<HashMap<Locale, Value>>,
    bundle_dir: Option<PathBuf>,
    store: Mutex<Box<dyn LocaleStore>>,
    tx: watch::Sender<Locale>,
}

/// Shared handle to the locale state. Cloning is cheap.
#[derive(Clone)]
pub struct LocaleService {
    inner: Arc<Inner>,
}

impl fmt::Debug for LocaleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleService")
            .field("current", &self.current())
            .field("bundle_dir", &self.inner.bundle_dir)
            .finish()
    }
}

impl LocaleService {
    /// Create a service using the embedded bundles, starting in `zh`.
    pub fn new(store: Box<dyn LocaleStore>) -> Self {
        Self::build(store, None)
    }

    /// Create a service that reads `{dir}/{locale}.json` instead of the embedded bundles.
    pub fn with_bundle_dir(store: Box<dyn LocaleStore>, dir: impl Into<PathBuf>) -> Self {
        Self::build(store, Some(dir.into()))
    }

    /// Session-only service with the embedded bundles.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryLocaleStore::default()))
    }

    fn build(store: Box<dyn LocaleStore>, bundle_dir: Option<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(Locale::default());
        Self {
            inner: Arc::new(Inner {
                bundles: RwLock::new(HashMap::new()),
                bundle_dir,
                store: Mutex::new(store),
                tx,
            }),
        }
    }

    /// Restore the persisted preference, or use `detected` when there is none.
    ///
    /// Nothing is written back; only [`set_locale`](Self::set_locale) persists.
    pub fn init(&self, detected: Locale) -> Locale {
        let saved = match self.inner.store.lock().load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Could not read saved locale, using detected one: {}", e);
                None
            }
        };
        let locale = saved.unwrap_or(detected);
        debug!("Initial locale: {} (saved: {:?})", locale, saved);
        self.activate(locale)
    }

    /// The active locale.
    pub fn current(&self) -> Locale {
        *self.inner.tx.borrow()
    }

    /// Switch locale, persist the choice and notify subscribers.
    ///
    /// If the bundle for a non-`zh` locale cannot be loaded, falls back to `zh`.
    /// Returns the locale that is active afterwards.
    pub fn set_locale(&self, locale: Locale) -> Locale {
        let locale = self.activate(locale);
        self.persist(locale);
        locale
    }

    /// Switch locale for this session without touching the saved preference.
    pub fn use_for_session(&self, locale: Locale) -> Locale {
        self.activate(locale)
    }

    fn activate(&self, requested: Locale) -> Locale {
        let mut locale = requested;
        if let Err(e) = self.ensure_bundle(requested) {
            warn!("Failed to load translations for {}: {}", requested, e);
            if requested != Locale::Zh {
                locale = Locale::Zh;
                if let Err(e) = self.ensure_bundle(locale) {
                    warn!("Failed to load translations for {}: {}", locale, e);
                }
            }
        }

        self.inner.tx.send_replace(locale);
        info!("Locale set to {}", locale);
        locale
    }

    /// Flip between `zh` and `en`.
    pub fn toggle(&self) -> Locale {
        self.set_locale(self.current().toggled())
    }

    /// Receive a notification on every locale change.
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.inner.tx.subscribe()
    }

    /// Look up a dotted key in the current locale, then `en`.
    /// Returns the key itself when nothing matches.
    pub fn translate(&self, key: &str) -> String {
        self.translate_in(self.current(), key)
    }

    /// Like [`translate`](Self::translate), replacing `{name}` placeholders.
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    fn translate_in(&self, locale: Locale, key: &str) -> String {
        let bundles = self.inner.bundles.read();
        for l in [locale, Locale::En] {
            let bundle = bundles.get(&l).or_else(|| self.embedded(l));
            if let Some(text) = bundle.and_then(|b| resolve_key(b, key)) {
                return text;
            }
        }
        key.to_string()
    }

    fn embedded(&self, locale: Locale) -> Option<&'static Value> {
        if self.inner.bundle_dir.is_some() {
            return None;
        }
        EMBEDDED.get(&locale)
    }

    fn ensure_bundle(&self, locale: Locale) -> Result<(), String> {
        let Some(dir) = &self.inner.bundle_dir else {
            if EMBEDDED.contains_key(&locale) {
                return Ok(());
            }
            return Err("embedded bundle missing".to_string());
        };

        if self.inner.bundles.read().contains_key(&locale) {
            return Ok(());
        }

        let bundle = load_bundle_file(dir, locale)?;
        self.inner.bundles.write().insert(locale, bundle);
        debug!("Loaded {} bundle from {}", locale, dir.display());
        Ok(())
    }

    fn persist(&self, locale: Locale) {
        let mut store = self.inner.store.lock();
        if let Err(e) = store.save(locale) {
            warn!("Locale preference not persisted, keeping it for this session only: {}", e);
            *store = Box::new(MemoryLocaleStore::with_value(locale));
        }
    }
}
