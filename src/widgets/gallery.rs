//! Screenshot gallery with lazy-loaded tiles.
//!
//! Tiles start on a neutral placeholder. When the host's visibility observer
//! reports a tile near the viewport, the real image is decoded off-view and
//! only then swapped in, so a broken image never flashes on screen. Without
//! an observer every tile loads straight away.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::docs::Fetcher;
use crate::error::DecodeError;
use crate::i18n::LocaleService;

/// Registers tiles with the host's viewport-intersection mechanism.
pub trait VisibilityObserver: Send {
    /// Start watching a tile, reporting it `margin_px` before it scrolls into view.
    fn observe(&mut self, index: usize, margin_px: u32);
    fn unobserve(&mut self, index: usize);
}

/// Size of a successfully decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Fetches and decodes an image without displaying it.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn decode(&self, path: &str) -> Result<ImageInfo, DecodeError>;
}

/// Decoder that fetches bytes through a [`Fetcher`] and decodes the whole image.
#[derive(Clone)]
pub struct FetchingDecoder {
    fetcher: Arc<dyn Fetcher>,
}

impl FetchingDecoder {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ImageDecoder for FetchingDecoder {
    async fn decode(&self, path: &str) -> Result<ImageInfo, DecodeError> {
        let failed = |reason: String| DecodeError {
            path: path.to_string(),
            reason,
        };

        let bytes = self
            .fetcher
            .fetch_bytes(path)
            .await
            .map_err(|e| failed(e.to_string()))?;

        // Full decode: a valid header over broken pixel data must still fail
        let image = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| failed(e.to_string()))?
            .decode()
            .map_err(|e| failed(e.to_string()))?;

        Ok(ImageInfo {
            width: image.width(),
            height: image.height(),
        })
    }
}

/// Lifecycle of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    Placeholder,
    Loading,
    Loaded,
    Failed,
}

/// What a tile currently displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TileSource {
    /// Neutral box of the thumbnail's size.
    Placeholder,
    Image { src: String },
    Unavailable { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileView {
    pub index: usize,
    pub alt: String,
    pub status: TileStatus,
    pub source: TileSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub hidden: bool,
    pub tiles: Vec<TileView>,
}

/// An image the host should decode for a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub index: usize,
    pub path: String,
}

/// Decode every request concurrently; results come back in request order.
pub async fn decode_all(
    decoder: &dyn ImageDecoder,
    requests: Vec<LoadRequest>,
) -> Vec<(usize, Result<ImageInfo, DecodeError>)> {
    join_all(requests.into_iter().map(|req| async move {
        let result = decoder.decode(&req.path).await;
        (req.index, result)
    }))
    .await
}

pub struct Gallery {
    images: Vec<String>,
    tiles: Vec<TileStatus>,
    loaded: BTreeSet<usize>,
    observer: Option<Box<dyn VisibilityObserver>>,
    observed: BTreeSet<usize>,
    margin_px: u32,
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("images", &self.images.len())
            .field("loaded", &self.loaded)
            .field("lazy", &self.observer.is_some())
            .finish()
    }
}

impl Gallery {
    /// `observer` is `None` when the host cannot detect visibility.
    pub fn new(observer: Option<Box<dyn VisibilityObserver>>, margin_px: u32) -> Self {
        Self {
            images: Vec::new(),
            tiles: Vec::new(),
            loaded: BTreeSet::new(),
            observer,
            observed: BTreeSet::new(),
            margin_px,
        }
    }

    /// Build one placeholder tile per path.
    ///
    /// Returns the images to decode right away: none when lazy, all of them
    /// when there is no observer.
    pub fn initialize(&mut self, paths: Vec<String>) -> Vec<LoadRequest> {
        self.release();
        self.tiles = vec![TileStatus::Placeholder; paths.len()];
        self.images = paths;
        self.loaded.clear();

        match self.observer.as_mut() {
            Some(observer) => {
                for index in 0..self.images.len() {
                    observer.observe(index, self.margin_px);
                    self.observed.insert(index);
                }
                debug!("Gallery observing {} tiles", self.images.len());
                Vec::new()
            }
            None => {
                debug!("No visibility observer, loading {} tiles eagerly", self.images.len());
                (0..self.images.len()).filter_map(|i| self.request(i)).collect()
            }
        }
    }

    /// Tiles reported near the viewport. Returns the decodes to start.
    pub fn on_intersecting(&mut self, indices: &[usize]) -> Vec<LoadRequest> {
        indices.iter().filter_map(|&i| self.request(i)).collect()
    }

    fn request(&mut self, index: usize) -> Option<LoadRequest> {
        if self.tiles.get(index) != Some(&TileStatus::Placeholder) {
            return None;
        }
        self.tiles[index] = TileStatus::Loading;

        if self.observed.remove(&index)
            && let Some(observer) = self.observer.as_mut()
        {
            observer.unobserve(index);
        }

        Some(LoadRequest {
            index,
            path: self.images[index].clone(),
        })
    }

    /// Apply the outcome of a decode started for `index`.
    pub fn complete(&mut self, index: usize, result: Result<ImageInfo, DecodeError>) {
        if self.tiles.get(index) != Some(&TileStatus::Loading) {
            return;
        }
        match result {
            Ok(info) => {
                debug!("Tile {} loaded ({}x{})", index, info.width, info.height);
                self.tiles[index] = TileStatus::Loaded;
                self.loaded.insert(index);
            }
            Err(e) => {
                warn!("Screenshot unavailable: {}", e);
                self.tiles[index] = TileStatus::Failed;
            }
        }
    }

    /// Tile click: the list and index to open the lightbox with.
    pub fn activate(&self, index: usize) -> Option<(Vec<String>, usize)> {
        (index < self.images.len()).then(|| (self.images.clone(), index))
    }

    pub fn is_hidden(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Indices whose real image is displayed.
    pub fn loaded(&self) -> &BTreeSet<usize> {
        &self.loaded
    }

    pub fn status(&self, index: usize) -> Option<TileStatus> {
        self.tiles.get(index).copied()
    }

    pub fn view(&self, i18n: &LocaleService) -> GalleryView {
        let tiles = self
            .tiles
            .iter()
            .enumerate()
            .map(|(index, &status)| TileView {
                index,
                alt: format!("Screenshot {}", index + 1),
                status,
                source: match status {
                    TileStatus::Loaded => TileSource::Image {
                        src: self.images[index].clone(),
                    },
                    TileStatus::Failed => TileSource::Unavailable {
                        label: i18n.translate("projectDetail.imageLoadError"),
                    },
                    TileStatus::Placeholder | TileStatus::Loading => TileSource::Placeholder,
                },
            })
            .collect();

        GalleryView {
            hidden: self.is_hidden(),
            tiles,
        }
    }

    /// Stop watching all tiles.
    pub fn release(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            for index in std::mem::take(&mut self.observed) {
                observer.unobserve(index);
            }
        }
    }
}

impl Drop for Gallery {
    fn drop(&mut self) {
        self.release();
    }
}
