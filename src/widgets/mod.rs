//! Interactive media sections of the detail page.
//!
//! Each widget is a small state machine. Host capabilities (visibility
//! detection, image decoding, playback, scroll locking) are injected as traits.

pub mod diagram;
pub mod gallery;
pub mod lightbox;
pub mod video;

pub use diagram::{ArchitecturePanel, DiagramView};
pub use gallery::{
    FetchingDecoder, Gallery, GalleryView, ImageDecoder, ImageInfo, LoadRequest, TileSource, TileStatus,
    VisibilityObserver, decode_all,
};
pub use lightbox::{Key, Lightbox, LightboxEvent, LightboxView, NoScrollLock, ScrollLock};
pub use video::{MediaPlayer, NullPlayer, VideoEvent, VideoLayout, VideoSwitcher, VideoView};
