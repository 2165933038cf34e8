//! Project detail page controller.
//!
//! [`DetailPage`] owns the page state machine (`Loading` → `Error` or
//! `Content`) and every widget on the page. Rendering is a pure function of
//! that state: [`DetailPage::snapshot`] produces a [`PageView`] using the
//! current locale, so a locale change only has to re-run the documentation
//! fetch.
//!
//! Documentation requests are tagged with a generation number and the locale
//! they were issued for. A result is applied only if it is still the latest
//! request and the locale has not moved on since.
//!
//! The page subscribes to its [`LocaleService`], so a switch made elsewhere
//! (a language toggle sharing the service) is picked up by
//! [`DetailPage::next_locale_change`]. [`DetailPage::change_locale`] switches
//! and reloads in one step.

mod view;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use view::{
    BreadcrumbView, ContentView, DocumentationView, HeaderView, LinkView, PageView, document_title,
};

use crate::catalog::{AssetBundle, LocalizedText, ProjectEntry, ProjectRecord, ProjectRepository};
use crate::docs::{
    CommonMarkRenderer, DocumentLoader, Fetcher, MarkdownRenderer, render_document, synthesize_fallback,
};
use crate::error::PageError;
use crate::i18n::{Locale, LocaleService};
use crate::routing::ProjectIdResolver;
use crate::utils::join_asset_path;
use crate::widgets::{
    ArchitecturePanel, FetchingDecoder, Gallery, ImageDecoder, Lightbox, LightboxEvent, LoadRequest,
    MediaPlayer, NoScrollLock, NullPlayer, ScrollLock, VideoEvent, VideoSwitcher, VisibilityObserver,
    decode_all,
};

/// Where the page is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Error {
        error: PageError,
        title: String,
        message: String,
    },
    Content {
        project: Arc<ProjectRecord>,
        bundle: Option<Arc<AssetBundle>>,
    },
}

/// Host capabilities handed to the page.
pub struct Capabilities {
    pub renderer: Arc<dyn MarkdownRenderer>,
    pub decoder: Arc<dyn ImageDecoder>,
    /// `None` makes the gallery load every tile immediately.
    pub observer: Option<Box<dyn VisibilityObserver>>,
    pub player: Box<dyn MediaPlayer>,
    pub scroll: Box<dyn ScrollLock>,
}

impl Capabilities {
    /// Capabilities for running without a display: real rendering and image
    /// decoding, no viewport, no playback.
    pub fn headless(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            renderer: Arc::new(CommonMarkRenderer),
            decoder: Arc::new(FetchingDecoder::new(fetcher)),
            observer: None,
            player: Box::new(NullPlayer),
            scroll: Box::new(NoScrollLock),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    /// Tiles the visibility observer reported near the viewport.
    Intersecting(Vec<usize>),
    TileClicked(usize),
}

/// Input routed to the page by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Gallery(GalleryEvent),
    Lightbox(LightboxEvent),
    Video(VideoEvent),
    DiagramClicked,
    DiagramImageError,
}

/// A documentation fetch that has been issued but not applied.
///
/// Owns everything it needs, so it can run while the page keeps handling
/// events.
#[derive(Debug)]
pub struct DocRequest {
    generation: u64,
    locale: Locale,
    loader: DocumentLoader,
    base_path: Option<String>,
    files: Option<LocalizedText>,
}

impl DocRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub async fn fetch(self) -> DocResult {
        let text = self
            .loader
            .load(self.base_path.as_deref(), self.files.as_ref(), self.locale)
            .await;
        DocResult {
            generation: self.generation,
            locale: self.locale,
            text,
        }
    }
}

/// Outcome of a [`DocRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocResult {
    pub generation: u64,
    pub locale: Locale,
    pub text: Option<String>,
}

/// Work started by [`DetailPage::open`].
#[derive(Debug, Default)]
pub struct Startup {
    pub documentation: Option<DocRequest>,
    pub tiles: Vec<LoadRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DocState {
    Loading,
    Ready(String),
}

pub struct DetailPage {
    i18n: LocaleService,
    locale_rx: watch::Receiver<Locale>,
    repository: Arc<ProjectRepository>,
    resolver: ProjectIdResolver,
    loader: DocumentLoader,
    renderer: Arc<dyn MarkdownRenderer>,
    decoder: Arc<dyn ImageDecoder>,
    state: PageState,
    documentation: DocState,
    doc_generation: u64,
    gallery: Gallery,
    video: VideoSwitcher,
    diagram: ArchitecturePanel,
    lightbox: Lightbox,
}

impl std::fmt::Debug for DetailPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailPage")
            .field("state", &self.state)
            .field("doc_generation", &self.doc_generation)
            .field("gallery", &self.gallery)
            .field("video", &self.video)
            .field("lightbox", &self.lightbox)
            .finish()
    }
}

impl DetailPage {
    pub fn new(
        i18n: LocaleService,
        repository: Arc<ProjectRepository>,
        resolver: ProjectIdResolver,
        loader: DocumentLoader,
        caps: Capabilities,
        lazy_margin: u32,
    ) -> Self {
        Self {
            locale_rx: i18n.subscribe(),
            i18n,
            repository,
            resolver,
            loader,
            renderer: caps.renderer,
            decoder: caps.decoder,
            state: PageState::Loading,
            documentation: DocState::Loading,
            doc_generation: 0,
            gallery: Gallery::new(caps.observer, lazy_margin),
            video: VideoSwitcher::new(caps.player),
            diagram: ArchitecturePanel::default(),
            lightbox: Lightbox::new(caps.scroll),
        }
    }

    /// Resolve and display the project for `url`, then wait for the
    /// documentation and any eagerly loaded screenshots.
    pub async fn init(&mut self, url: &str) {
        let Startup { documentation, tiles } = self.open(url);
        let decoder = self.decoder.clone();

        let doc = async move {
            match documentation {
                Some(request) => Some(request.fetch().await),
                None => None,
            }
        };
        let (doc, decoded) = futures::join!(doc, decode_all(&*decoder, tiles));

        for (index, result) in decoded {
            self.gallery.complete(index, result);
        }
        if let Some(result) = doc {
            self.apply_documentation(result);
        }
    }

    /// Leave `Loading`: either show an error or set up every content section.
    ///
    /// Returns the fetches the caller should drive. Only the first call does
    /// anything; a page never leaves `Content` or `Error`.
    pub fn open(&mut self, url: &str) -> Startup {
        if self.state != PageState::Loading {
            warn!("Detail page already initialized, ignoring {}", url);
            return Startup::default();
        }

        let ProjectEntry { record, bundle } = match self.lookup(url) {
            Ok(entry) => entry,
            Err(e) => {
                info!("Showing error page: {}", e);
                self.state = self.error_state(e);
                return Startup::default();
            }
        };

        info!("Showing project {}", record.id);
        let base = bundle.as_ref().and_then(|b| b.base_path.as_deref());
        let absolute = |paths: &[String]| -> Vec<String> {
            paths.iter().map(|p| join_asset_path(base, p)).collect()
        };
        let (screenshots, videos) = match bundle.as_deref() {
            Some(b) => (absolute(&b.screenshot_paths), absolute(&b.video_paths)),
            None => (Vec::new(), Vec::new()),
        };

        let tiles = self.gallery.initialize(screenshots);
        self.video.initialize(videos);
        self.diagram = ArchitecturePanel::from_bundle(bundle.as_deref());
        self.state = PageState::Content {
            project: record,
            bundle,
        };

        Startup {
            documentation: self.begin_documentation(),
            tiles,
        }
    }

    fn lookup(&self, url: &str) -> Result<ProjectEntry, PageError> {
        let id = self.resolver.resolve(url).ok_or(PageError::NoProjectSpecified)?;
        self.repository.find(&id).ok_or(PageError::ProjectNotFound(id))
    }

    fn error_state(&self, error: PageError) -> PageState {
        let (title, message) = match &error {
            PageError::NoProjectSpecified => (
                self.i18n.translate("projectDetail.noProjectTitle"),
                self.i18n.translate("projectDetail.noProjectMessage"),
            ),
            PageError::ProjectNotFound(id) => (
                self.i18n.translate("projectDetail.notFoundTitle"),
                self.i18n.translate_with("projectDetail.notFoundMessage", &[("id", id)]),
            ),
        };
        PageState::Error { error, title, message }
    }

    /// Issue a new documentation fetch for the current locale, superseding
    /// any earlier one.
    pub fn begin_documentation(&mut self) -> Option<DocRequest> {
        let PageState::Content { bundle, .. } = &self.state else {
            return None;
        };

        self.doc_generation += 1;
        self.documentation = DocState::Loading;
        Some(DocRequest {
            generation: self.doc_generation,
            locale: self.i18n.current(),
            loader: self.loader.clone(),
            base_path: bundle.as_ref().and_then(|b| b.base_path.clone()),
            files: bundle.as_ref().and_then(|b| b.document_files.clone()),
        })
    }

    /// Show a documentation result. Returns `false` if it was stale and dropped.
    pub fn apply_documentation(&mut self, result: DocResult) -> bool {
        let PageState::Content { project, .. } = &self.state else {
            return false;
        };

        let current = self.i18n.current();
        if result.generation != self.doc_generation || result.locale != current {
            debug!(
                "Discarding documentation #{} ({}), latest is #{} ({})",
                result.generation, result.locale, self.doc_generation, current
            );
            return false;
        }

        let html = result
            .text
            .map(|markdown| render_document(self.renderer.as_ref(), &markdown))
            .filter(|html| !html.is_empty())
            .unwrap_or_else(|| synthesize_fallback(project, &self.i18n));
        self.documentation = DocState::Ready(html);
        true
    }

    /// React to a locale change that already happened in the [`LocaleService`].
    ///
    /// Labels are rendered from the current locale on every snapshot, so only
    /// the documentation needs refetching. Media is left alone.
    pub fn on_locale_changed(&mut self) -> Option<DocRequest> {
        // Mark seen so next_locale_change does not handle it again
        self.locale_rx.borrow_and_update();
        match &self.state {
            PageState::Loading => None,
            PageState::Error { error, .. } => {
                self.state = self.error_state(error.clone());
                None
            }
            PageState::Content { .. } => self.begin_documentation(),
        }
    }

    /// Switch locale and reload the documentation for it.
    pub async fn change_locale(&mut self, locale: Locale) {
        self.i18n.set_locale(locale);
        if let Some(request) = self.on_locale_changed() {
            let result = request.fetch().await;
            self.apply_documentation(result);
        }
    }

    /// Wait for the next locale switch made through the shared service and
    /// reload the documentation for it.
    pub async fn next_locale_change(&mut self) {
        // The page holds the service, so the sender outlives this receiver
        if self.locale_rx.changed().await.is_err() {
            return;
        }
        if let Some(request) = self.on_locale_changed() {
            let result = request.fetch().await;
            self.apply_documentation(result);
        }
    }

    /// Route an input event. Returns screenshot decodes to start.
    pub fn handle(&mut self, event: PageEvent) -> Vec<LoadRequest> {
        match event {
            PageEvent::Gallery(GalleryEvent::Intersecting(indices)) => {
                return self.gallery.on_intersecting(&indices);
            }
            PageEvent::Gallery(GalleryEvent::TileClicked(index)) => {
                if let Some((images, start)) = self.gallery.activate(index) {
                    self.lightbox.open(images, start);
                }
            }
            PageEvent::Lightbox(event) => self.lightbox.handle(event),
            PageEvent::Video(event) => self.video.on_event(event),
            PageEvent::DiagramClicked => {
                if let Some(images) = self.diagram.activate() {
                    self.lightbox.open(images, 0);
                }
            }
            PageEvent::DiagramImageError => self.diagram.on_image_error(),
        }
        Vec::new()
    }

    /// Decode screenshots and swap in the ones that succeed.
    pub async fn load_tiles(&mut self, requests: Vec<LoadRequest>) {
        let decoder = self.decoder.clone();
        for (index, result) in decode_all(&*decoder, requests).await {
            self.gallery.complete(index, result);
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn video(&self) -> &VideoSwitcher {
        &self.video
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn i18n(&self) -> &LocaleService {
        &self.i18n
    }

    /// Render the whole page in the current locale.
    pub fn snapshot(&self) -> PageView {
        match &self.state {
            PageState::Loading => PageView::Loading,
            PageState::Error { title, message, .. } => PageView::Error {
                document_title: document_title(title, &self.i18n),
                title: title.clone(),
                message: message.clone(),
                back: LinkView {
                    href: "index.html#projects".to_string(),
                    label: self.i18n.translate("projectDetail.backToProjects"),
                },
            },
            PageState::Content { project, .. } => {
                let header = HeaderView::build(project, &self.i18n);
                let documentation = match &self.documentation {
                    DocState::Loading => DocumentationView::Loading {
                        label: self.i18n.translate("projectDetail.loadingReadme"),
                    },
                    DocState::Ready(html) => DocumentationView::Ready { html: html.clone() },
                };

                PageView::Content(Box::new(ContentView {
                    document_title: document_title(&header.title, &self.i18n),
                    breadcrumb: BreadcrumbView::build(project, &self.i18n),
                    header,
                    documentation,
                    gallery: self.gallery.view(&self.i18n),
                    video: self.video.view(&self.i18n),
                    architecture: self.diagram.view(&self.i18n),
                    lightbox: self.lightbox.view(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::FutureExt;
    use parking_lot::Mutex;
    use tokio::sync::Notify;

    use crate::error::{DecodeError, FetchError};
    use crate::widgets::{ImageInfo, Key, TileStatus, VideoLayout};

    const DEMO_CATALOG: &str = r#"{
        "projects": [{
            "id": "demo",
            "type": "desktop",
            "title": { "zh": "演示", "en": "Demo" },
            "description": { "zh": "描述", "en": "Description" },
            "techStack": ["Rust"],
            "highlights": { "zh": ["快"], "en": ["Fast"] }
        }],
        "assets": {
            "demo": {
                "basePath": "Projects/Demo",
                "documentFiles": { "zh": "README.md", "en": "README_EN.md" },
                "videoPaths": ["Video/1.Intro.mp4", "Video/2.Deep_Dive.mp4"],
                "screenshotPaths": ["a.png", "b.png"],
                "architectureDiagram": { "type": "image", "path": "arch.png" }
            }
        }
    }"#;

    /// Serves documents from a map. Requests for `gated` wait until released.
    #[derive(Default)]
    struct MapFetcher {
        files: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
        gated: Option<String>,
        gate: Notify,
    }

    impl MapFetcher {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().push(path.to_string());
            if self.gated.as_deref() == Some(path) {
                self.gate.notified().await;
            }
            self.files
                .get(path)
                .map(|s| s.clone().into_bytes())
                .ok_or_else(|| FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                })
        }
    }

    #[derive(Default)]
    struct CountingDecoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageDecoder for CountingDecoder {
        async fn decode(&self, _path: &str) -> Result<ImageInfo, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ImageInfo { width: 200, height: 150 })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPlayer {
        loads: Arc<Mutex<Vec<String>>>,
    }

    impl MediaPlayer for RecordingPlayer {
        fn load(&mut self, src: &str) {
            self.loads.lock().push(src.to_string());
        }
    }

    struct SilentObserver;

    impl VisibilityObserver for SilentObserver {
        fn observe(&mut self, _index: usize, _margin_px: u32) {}
        fn unobserve(&mut self, _index: usize) {}
    }

    struct Harness {
        page: DetailPage,
        fetcher: Arc<MapFetcher>,
        decoder: Arc<CountingDecoder>,
        player: RecordingPlayer,
    }

    fn harness(repository: ProjectRepository, fetcher: MapFetcher, locale: Locale) -> Harness {
        let i18n = LocaleService::in_memory();
        i18n.set_locale(locale);

        let fetcher = Arc::new(fetcher);
        let decoder = Arc::new(CountingDecoder::default());
        let player = RecordingPlayer::default();
        let caps = Capabilities {
            renderer: Arc::new(CommonMarkRenderer),
            decoder: decoder.clone(),
            observer: None,
            player: Box::new(player.clone()),
            scroll: Box::new(NoScrollLock),
        };
        let page = DetailPage::new(
            i18n,
            Arc::new(repository),
            ProjectIdResolver::default(),
            DocumentLoader::uncached(fetcher.clone()),
            caps,
            50,
        );

        Harness {
            page,
            fetcher,
            decoder,
            player,
        }
    }

    fn builtin() -> ProjectRepository {
        ProjectRepository::builtin().unwrap()
    }

    fn demo() -> ProjectRepository {
        ProjectRepository::from_json(DEMO_CATALOG).unwrap()
    }

    fn content(view: PageView) -> ContentView {
        match view {
            PageView::Content(content) => *content,
            other => panic!("expected content, got {:?}", other),
        }
    }

    fn doc_html(view: &ContentView) -> &str {
        match &view.documentation {
            DocumentationView::Ready { html } => html,
            DocumentationView::Loading { .. } => panic!("documentation still loading"),
        }
    }

    #[tokio::test]
    async fn test_hash_id_shows_project() {
        let fetcher = MapFetcher::with(&[("Projects/IOTsystem/Readme.md", "# Climate Chamber\n\nDocs")]);
        let mut h = harness(builtin(), fetcher, Locale::En);
        h.page.init("https://portfolio.example/project.html#id=iot-system").await;

        let view = content(h.page.snapshot());
        assert_eq!(view.breadcrumb.current, "Climate Chamber IoT Monitoring System");
        assert_eq!(view.breadcrumb.projects.label, "Projects");
        assert_eq!(view.document_title, "Climate Chamber IoT Monitoring System - Portfolio");
        assert_eq!(view.header.type_label, "Web IoT");
        assert_eq!(view.video.layout, VideoLayout::Hidden);
        assert!(doc_html(&view).contains("<h1>Climate Chamber</h1>"));

        // No observer: all seven screenshots load straight away
        assert_eq!(view.gallery.tiles.len(), 7);
        assert!(view.gallery.tiles.iter().all(|t| t.status == TileStatus::Loaded));
        assert!(h.player.loads.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_shows_not_found() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("/project/nonexistent-project").await;

        assert!(matches!(
            h.page.state(),
            PageState::Error { error: PageError::ProjectNotFound(id), .. } if id == "nonexistent-project"
        ));
        match h.page.snapshot() {
            PageView::Error { title, message, back, .. } => {
                assert_eq!(title, "Project Not Found");
                assert!(message.contains("nonexistent-project"));
                assert_eq!(back.href, "index.html#projects");
            }
            other => panic!("expected error, got {:?}", other),
        }
        assert!(h.fetcher.requested.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_shows_no_project() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("https://portfolio.example/project.html").await;

        assert!(matches!(
            h.page.state(),
            PageState::Error { error: PageError::NoProjectSpecified, .. }
        ));
    }

    #[tokio::test]
    async fn test_error_text_follows_locale() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("?id=ghost").await;
        h.page.change_locale(Locale::Zh).await;

        match h.page.snapshot() {
            PageView::Error { title, message, .. } => {
                assert_eq!(title, "项目不存在");
                assert!(message.contains("ghost"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_document_uses_fallback() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("#sam3-segmentation").await;

        let view = content(h.page.snapshot());
        let html = doc_html(&view);
        assert!(html.contains("readme-fallback"));
        assert!(html.contains("Segment Anything Model 3"));
        assert!(html.contains("<li>Zero-shot Segmentation</li>"));
        assert!(h.fetcher.requested.lock().is_empty());

        assert_eq!(view.video.layout, VideoLayout::Single);
        assert_eq!(view.gallery.tiles.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_uses_fallback() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::Zh);
        h.page.init("/project/iot-system.html").await;

        let view = content(h.page.snapshot());
        assert!(doc_html(&view).contains("readme-fallback"));
        assert_eq!(*h.fetcher.requested.lock(), vec!["Projects/IOTsystem/Readme.md".to_string()]);
    }

    #[tokio::test]
    async fn test_project_without_bundle() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("#id=llm-private-cloud").await;

        let view = content(h.page.snapshot());
        assert!(view.gallery.hidden);
        assert_eq!(view.video.layout, VideoLayout::Hidden);
        assert_eq!(view.architecture, crate::widgets::DiagramView::Hidden);
        assert!(doc_html(&view).contains("readme-fallback"));
    }

    #[tokio::test]
    async fn test_late_zh_document_does_not_overwrite_en() {
        let fetcher = MapFetcher {
            gated: Some("Projects/Demo/README.md".to_string()),
            ..MapFetcher::with(&[
                ("Projects/Demo/README.md", "# 中文文档"),
                ("Projects/Demo/README_EN.md", "# English docs"),
            ])
        };
        let mut h = harness(demo(), fetcher, Locale::Zh);

        let startup = h.page.open("#demo");
        let zh_request = startup.documentation.unwrap();
        assert_eq!(zh_request.locale(), Locale::Zh);
        let zh_pending = tokio::spawn(zh_request.fetch());
        tokio::task::yield_now().await;

        h.page.i18n().set_locale(Locale::En);
        let en_request = h.page.on_locale_changed().unwrap();
        assert!(h.page.apply_documentation(en_request.fetch().await));

        h.fetcher.gate.notify_one();
        let late = zh_pending.await.unwrap();
        assert_eq!(late.text.as_deref(), Some("# 中文文档"));
        assert!(!h.page.apply_documentation(late));

        let view = content(h.page.snapshot());
        assert!(doc_html(&view).contains("English docs"));
        assert_eq!(view.breadcrumb.current, "Demo");
    }

    #[tokio::test]
    async fn test_locale_change_does_not_reload_media() {
        let fetcher = MapFetcher::with(&[
            ("Projects/Demo/README.md", "# 中文文档"),
            ("Projects/Demo/README_EN.md", "# English docs"),
        ]);
        let mut h = harness(demo(), fetcher, Locale::Zh);
        h.page.init("#demo").await;
        h.page.handle(PageEvent::Video(VideoEvent::EntryClicked(1)));

        h.page.change_locale(Locale::En).await;

        assert_eq!(h.player.loads.lock().len(), 2);
        assert_eq!(h.decoder.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.page.video().active_index(), 1);

        let view = content(h.page.snapshot());
        assert!(doc_html(&view).contains("English docs"));
        assert_eq!(view.video.list_title.as_deref(), Some("Video List"));
        assert_eq!(view.header.title, "Demo");
        assert_eq!(
            *h.fetcher.requested.lock(),
            vec!["Projects/Demo/README.md".to_string(), "Projects/Demo/README_EN.md".to_string()]
        );
    }

    #[tokio::test]
    async fn test_switch_from_shared_service_reloads_documentation() {
        let fetcher = MapFetcher::with(&[
            ("Projects/Demo/README.md", "# 中文文档"),
            ("Projects/Demo/README_EN.md", "# English docs"),
        ]);
        let mut h = harness(demo(), fetcher, Locale::Zh);
        h.page.init("#demo").await;
        assert!(doc_html(&content(h.page.snapshot())).contains("中文文档"));

        // A language toggle elsewhere holding its own handle
        let toggle = h.page.i18n().clone();
        toggle.set_locale(Locale::En);
        h.page.next_locale_change().await;

        let view = content(h.page.snapshot());
        assert!(doc_html(&view).contains("English docs"));
        assert_eq!(h.fetcher.requested.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_change_locale_is_not_handled_twice() {
        let fetcher = MapFetcher::with(&[
            ("Projects/Demo/README.md", "# 中文文档"),
            ("Projects/Demo/README_EN.md", "# English docs"),
        ]);
        let mut h = harness(demo(), fetcher, Locale::Zh);
        h.page.init("#demo").await;
        h.page.change_locale(Locale::En).await;

        // Already applied, so there is no further change to wait for
        assert!(h.page.next_locale_change().now_or_never().is_none());
        assert_eq!(h.fetcher.requested.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_lightbox_from_gallery_and_diagram() {
        let mut h = harness(demo(), MapFetcher::default(), Locale::En);
        h.page.init("#demo").await;

        h.page.handle(PageEvent::Gallery(GalleryEvent::TileClicked(1)));
        let shown = h.page.lightbox().view().unwrap();
        assert_eq!(shown.src, "Projects/Demo/b.png");
        assert_eq!(shown.total, 2);

        h.page.handle(PageEvent::Lightbox(LightboxEvent::KeyDown(Key::Escape)));
        assert!(!h.page.lightbox().is_open());

        h.page.handle(PageEvent::DiagramClicked);
        let shown = h.page.lightbox().view().unwrap();
        assert_eq!(shown.src, "Projects/Demo/arch.png");
        assert_eq!(shown.total, 1);
    }

    #[tokio::test]
    async fn test_lazy_gallery_through_page() {
        let i18n = LocaleService::in_memory();
        let fetcher: Arc<dyn Fetcher> = Arc::new(MapFetcher::default());
        let decoder = Arc::new(CountingDecoder::default());
        let caps = Capabilities {
            observer: Some(Box::new(SilentObserver)),
            decoder: decoder.clone(),
            ..Capabilities::headless(fetcher.clone())
        };
        let mut page = DetailPage::new(
            i18n,
            Arc::new(demo()),
            ProjectIdResolver::default(),
            DocumentLoader::uncached(fetcher),
            caps,
            50,
        );

        let startup = page.open("#demo");
        assert!(startup.tiles.is_empty());

        let requests = page.handle(PageEvent::Gallery(GalleryEvent::Intersecting(vec![1])));
        page.load_tiles(requests).await;

        assert_eq!(*page.gallery().loaded(), BTreeSet::from([1]));
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_init_is_ignored() {
        let mut h = harness(builtin(), MapFetcher::default(), Locale::En);
        h.page.init("#sam3-segmentation").await;
        h.page.init("#iot-system").await;

        let view = content(h.page.snapshot());
        assert_eq!(view.breadcrumb.current, "SAM3 Prompt-based All-in-one Segmentation Model");
    }

    #[test]
    fn test_snapshot_loading_before_init() {
        let h = harness(builtin(), MapFetcher::default(), Locale::En);
        assert_eq!(h.page.snapshot(), PageView::Loading);
        assert_eq!(h.page.snapshot().document_title(), None);
    }
}
