//! Persistence for the locale preference.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::Locale;
use crate::error::StoreError;

/// Durable storage for the single locale preference string.
pub trait LocaleStore: Send {
    /// Read the saved locale. `Ok(None)` means nothing was saved yet.
    fn load(&self) -> Result<Option<Locale>, StoreError>;

    /// Save the locale.
    fn save(&mut self, locale: Locale) -> Result<(), StoreError>;
}

/// Keeps the preference in a small text file.
#[derive(Debug, Clone)]
pub struct FileLocaleStore {
    path: PathBuf,
}

impl FileLocaleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocaleStore for FileLocaleStore {
    fn load(&self) -> Result<Option<Locale>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let text = text.trim();
        text.parse::<Locale>()
            .map(Some)
            .map_err(|_| StoreError::Invalid(text.to_string()))
    }

    fn save(&mut self, locale: Locale) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, locale.as_str())?;
        debug!("Saved locale {} to {}", locale, self.path.display());
        Ok(())
    }
}

/// Session-only storage; the fallback when no durable medium is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocaleStore {
    value: Option<Locale>,
}

impl MemoryLocaleStore {
    pub fn with_value(locale: Locale) -> Self {
        Self { value: Some(locale) }
    }
}

impl LocaleStore for MemoryLocaleStore {
    fn load(&self) -> Result<Option<Locale>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, locale: Locale) -> Result<(), StoreError> {
        self.value = Some(locale);
        Ok(())
    }
}
