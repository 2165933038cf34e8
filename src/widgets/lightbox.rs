//! Full-screen image viewer.
//!
//! One instance per page. The gallery and the architecture preview both open
//! it; opening re-seeds the image list. Every dismissal path (close control,
//! backdrop click, Escape) goes through [`Lightbox::close`].

use serde::Serialize;
use tracing::debug;

/// Suppresses scrolling of the page behind the lightbox.
pub trait ScrollLock: Send {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// For hosts without a scrollable background.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScrollLock;

impl ScrollLock for NoScrollLock {
    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Input routed to the lightbox by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    CloseButton,
    PrevButton,
    NextButton,
    /// Click on the dimmed area around the image.
    BackdropClick,
    /// Click on the image itself; does nothing.
    ImageClick,
    KeyDown(Key),
}

/// What the open lightbox shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightboxView {
    pub src: String,
    pub alt: String,
    /// 1-based position of the current image.
    pub position: usize,
    pub total: usize,
}

pub struct Lightbox {
    is_open: bool,
    images: Vec<String>,
    current: usize,
    scroll: Box<dyn ScrollLock>,
    scroll_locked: bool,
    keys_bound: bool,
}

impl std::fmt::Debug for Lightbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lightbox")
            .field("is_open", &self.is_open)
            .field("current", &self.current)
            .field("images", &self.images.len())
            .finish()
    }
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new(Box::new(NoScrollLock))
    }
}

impl Lightbox {
    pub fn new(scroll: Box<dyn ScrollLock>) -> Self {
        Self {
            is_open: false,
            images: Vec::new(),
            current: 0,
            scroll,
            scroll_locked: false,
            keys_bound: false,
        }
    }

    /// Show `images` starting at `start`. An empty list leaves the lightbox as it is.
    ///
    /// A start past the end is clamped to the last image.
    pub fn open(&mut self, images: Vec<String>, start: usize) {
        if images.is_empty() {
            return;
        }

        self.current = start.min(images.len() - 1);
        self.images = images;
        self.is_open = true;
        self.keys_bound = true;

        if !self.scroll_locked {
            self.scroll.lock();
            self.scroll_locked = true;
        }
        debug!("Lightbox opened at {}/{}", self.current + 1, self.images.len());
    }

    /// Hide the lightbox and restore scrolling. Closing twice is harmless.
    ///
    /// The index is kept so a caller can reopen where the user left off.
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }

        self.is_open = false;
        self.keys_bound = false;
        if self.scroll_locked {
            self.scroll.unlock();
            self.scroll_locked = false;
        }
        debug!("Lightbox closed");
    }

    /// Previous image, wrapping from the first to the last.
    pub fn prev(&mut self) {
        if !self.is_open {
            return;
        }
        let len = self.images.len();
        self.current = (self.current + len - 1) % len;
    }

    /// Next image, wrapping from the last to the first.
    pub fn next(&mut self) {
        if !self.is_open {
            return;
        }
        self.current = (self.current + 1) % self.images.len();
    }

    /// Route an input event.
    pub fn handle(&mut self, event: LightboxEvent) {
        match event {
            LightboxEvent::CloseButton | LightboxEvent::BackdropClick => self.close(),
            LightboxEvent::PrevButton => self.prev(),
            LightboxEvent::NextButton => self.next(),
            LightboxEvent::ImageClick => {}
            LightboxEvent::KeyDown(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: Key) {
        // Keyboard listener only exists while open
        if !self.keys_bound {
            return;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::Other => {}
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Current image, or `None` while closed.
    pub fn view(&self) -> Option<LightboxView> {
        if !self.is_open {
            return None;
        }
        Some(LightboxView {
            src: self.images[self.current].clone(),
            alt: format!("Screenshot {}", self.current + 1),
            position: self.current + 1,
            total: self.images.len(),
        })
    }
}

impl Drop for Lightbox {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingLock {
        locks: Arc<AtomicUsize>,
        unlocks: Arc<AtomicUsize>,
    }

    impl ScrollLock for CountingLock {
        fn lock(&mut self) {
            self.locks.fetch_add(1, Ordering::SeqCst);
        }

        fn unlock(&mut self) {
            self.unlocks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn images(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("img/{}.png", i)).collect()
    }

    #[test]
    fn test_open_empty_is_noop() {
        let mut lightbox = Lightbox::default();
        lightbox.open(Vec::new(), 0);

        assert!(!lightbox.is_open());
        assert!(lightbox.view().is_none());
    }

    #[test]
    fn test_wraparound() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(4), 0);

        lightbox.prev();
        assert_eq!(lightbox.current_index(), 3);
        lightbox.next();
        assert_eq!(lightbox.current_index(), 0);
    }

    #[test]
    fn test_k_nexts_is_modular() {
        for len in 1..6 {
            for start in 0..len {
                for k in 0..13 {
                    let mut lightbox = Lightbox::default();
                    lightbox.open(images(len), start);
                    for _ in 0..k {
                        lightbox.next();
                    }
                    assert_eq!(lightbox.current_index(), (start + k) % len);
                }
            }
        }
    }

    #[test]
    fn test_start_index_clamped() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(3), 10);
        assert_eq!(lightbox.current_index(), 2);
    }

    #[test]
    fn test_all_dismissal_paths_close() {
        for event in [
            LightboxEvent::CloseButton,
            LightboxEvent::BackdropClick,
            LightboxEvent::KeyDown(Key::Escape),
        ] {
            let lock = CountingLock::default();
            let mut lightbox = Lightbox::new(Box::new(lock.clone()));
            lightbox.open(images(2), 1);
            lightbox.handle(event);

            assert!(!lightbox.is_open(), "{:?}", event);
            assert_eq!(lock.unlocks.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_image_click_does_not_close() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(2), 0);
        lightbox.handle(LightboxEvent::ImageClick);
        assert!(lightbox.is_open());
    }

    #[test]
    fn test_arrow_keys_navigate_without_closing() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(3), 0);

        lightbox.handle(LightboxEvent::KeyDown(Key::ArrowLeft));
        assert_eq!(lightbox.current_index(), 2);
        lightbox.handle(LightboxEvent::KeyDown(Key::ArrowRight));
        lightbox.handle(LightboxEvent::KeyDown(Key::ArrowRight));
        assert_eq!(lightbox.current_index(), 1);
        assert!(lightbox.is_open());
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(3), 1);
        lightbox.close();

        lightbox.handle(LightboxEvent::KeyDown(Key::ArrowRight));
        assert_eq!(lightbox.current_index(), 1);
    }

    #[test]
    fn test_scroll_restored_exactly_once() {
        let lock = CountingLock::default();
        let mut lightbox = Lightbox::new(Box::new(lock.clone()));

        lightbox.open(images(2), 0);
        lightbox.open(images(3), 2);
        lightbox.close();
        lightbox.close();

        assert_eq!(lock.locks.load(Ordering::SeqCst), 1);
        assert_eq!(lock.unlocks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_keeps_index() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(5), 3);
        lightbox.close();
        assert_eq!(lightbox.current_index(), 3);
    }

    #[test]
    fn test_view_caption() {
        let mut lightbox = Lightbox::default();
        lightbox.open(images(3), 1);

        let view = lightbox.view().unwrap();
        assert_eq!(view.src, "img/1.png");
        assert_eq!(view.alt, "Screenshot 2");
        assert_eq!((view.position, view.total), (2, 3));
    }
}
