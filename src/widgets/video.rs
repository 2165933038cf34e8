//! Multi-clip video player with a playlist.

use serde::Serialize;
use tracing::{debug, warn};

use crate::i18n::LocaleService;
use crate::utils::media_title;

/// The host's playback element.
pub trait MediaPlayer: Send {
    /// Point the player at `src` and start loading it.
    fn load(&mut self, src: &str);
}

/// Player for hosts that cannot play media. Loads are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

impl MediaPlayer for NullPlayer {
    fn load(&mut self, src: &str) {
        debug!("No media player, skipping load of {}", src);
    }
}

/// Playback notifications and clicks routed to the switcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoEvent {
    /// The player failed to load or decode the current source.
    Error(String),
    LoadedData,
    RetryClicked,
    EntryClicked(usize),
}

/// Which parts of the video section are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoLayout {
    Hidden,
    /// Player controls only.
    Single,
    /// Player plus the clip list.
    Playlist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoEntryView {
    pub index: usize,
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoErrorView {
    pub message: String,
    pub retry_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoView {
    pub layout: VideoLayout,
    pub src: Option<String>,
    pub list_title: Option<String>,
    pub entries: Vec<VideoEntryView>,
    pub error: Option<VideoErrorView>,
}

pub struct VideoSwitcher {
    paths: Vec<String>,
    active: usize,
    last_error: Option<String>,
    player: Box<dyn MediaPlayer>,
}

impl std::fmt::Debug for VideoSwitcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSwitcher")
            .field("paths", &self.paths)
            .field("active", &self.active)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Default for VideoSwitcher {
    fn default() -> Self {
        Self::new(Box::new(NullPlayer))
    }
}

impl VideoSwitcher {
    pub fn new(player: Box<dyn MediaPlayer>) -> Self {
        Self {
            paths: Vec::new(),
            active: 0,
            last_error: None,
            player,
        }
    }

    /// Set up the playlist and load the first clip.
    pub fn initialize(&mut self, paths: Vec<String>) {
        self.paths = paths;
        self.active = 0;
        self.last_error = None;

        if let Some(first) = self.paths.first() {
            self.player.load(first);
        }
        debug!("Video switcher initialized with {} clips", self.paths.len());
    }

    pub fn layout(&self) -> VideoLayout {
        match self.paths.len() {
            0 => VideoLayout::Hidden,
            1 => VideoLayout::Single,
            _ => VideoLayout::Playlist,
        }
    }

    /// Make clip `index` active and load it. Returns `false` when out of range.
    pub fn switch_to(&mut self, index: usize) -> bool {
        let Some(path) = self.paths.get(index) else {
            return false;
        };

        self.last_error = None;
        self.active = index;
        self.player.load(path);
        true
    }

    /// Reload the active clip.
    pub fn retry(&mut self) {
        if let Some(path) = self.paths.get(self.active) {
            self.last_error = None;
            self.player.load(path);
        }
    }

    pub fn on_event(&mut self, event: VideoEvent) {
        match event {
            VideoEvent::Error(reason) => {
                if self.paths.is_empty() {
                    return;
                }
                warn!("Video load error for {}: {}", self.paths[self.active], reason);
                self.last_error = Some(reason);
            }
            VideoEvent::LoadedData => self.last_error = None,
            VideoEvent::RetryClicked => self.retry(),
            VideoEvent::EntryClicked(index) => {
                self.switch_to(index);
            }
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn view(&self, i18n: &LocaleService) -> VideoView {
        let layout = self.layout();
        let entries = match layout {
            VideoLayout::Playlist => self
                .paths
                .iter()
                .enumerate()
                .map(|(index, path)| VideoEntryView {
                    index,
                    title: media_title(path),
                    active: index == self.active,
                })
                .collect(),
            _ => Vec::new(),
        };

        VideoView {
            layout,
            src: self.paths.get(self.active).cloned(),
            list_title: (layout == VideoLayout::Playlist)
                .then(|| i18n.translate("projectDetail.videoList")),
            entries,
            error: self.last_error.as_ref().map(|_| VideoErrorView {
                message: i18n.translate("projectDetail.videoLoadError"),
                retry_label: i18n.translate("projectDetail.retry"),
            }),
        }
    }
}
