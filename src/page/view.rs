//! Serializable snapshot of everything the detail page displays.

use serde::Serialize;

use crate::catalog::ProjectRecord;
use crate::i18n::LocaleService;
use crate::widgets::{DiagramView, GalleryView, LightboxView, VideoView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub type_label: String,
    pub type_color: String,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub repository: Option<LinkView>,
    pub demo: Option<LinkView>,
}

impl HeaderView {
    pub fn build(project: &ProjectRecord, i18n: &LocaleService) -> Self {
        let locale = i18n.current();
        Self {
            type_label: i18n.translate(&format!("projectTypes.{}", project.kind.key())),
            type_color: project.kind.color().to_string(),
            title: project.title.resolve(locale),
            description: project.description.resolve(locale),
            tech_stack: project.tech_stack.clone(),
            repository: project.links.repository().map(|href| LinkView {
                href: href.to_string(),
                label: i18n.translate("projects.viewCode"),
            }),
            demo: project.links.demo().map(|href| LinkView {
                href: href.to_string(),
                label: i18n.translate("projects.viewDemo"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbView {
    pub home: LinkView,
    pub projects: LinkView,
    pub current: String,
}

impl BreadcrumbView {
    pub fn build(project: &ProjectRecord, i18n: &LocaleService) -> Self {
        Self {
            home: LinkView {
                href: "index.html".to_string(),
                label: i18n.translate("nav.home"),
            },
            projects: LinkView {
                href: "index.html#projects".to_string(),
                label: i18n.translate("nav.projects"),
            },
            current: project.title.resolve(i18n.current()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentationView {
    Loading { label: String },
    Ready { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentView {
    pub document_title: String,
    pub header: HeaderView,
    pub breadcrumb: BreadcrumbView,
    pub documentation: DocumentationView,
    pub gallery: GalleryView,
    pub video: VideoView,
    pub architecture: DiagramView,
    pub lightbox: Option<LightboxView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PageView {
    Loading,
    Error {
        document_title: String,
        title: String,
        message: String,
        back: LinkView,
    },
    Content(Box<ContentView>),
}

impl PageView {
    pub fn document_title(&self) -> Option<&str> {
        match self {
            Self::Loading => None,
            Self::Error { document_title, .. } => Some(document_title),
            Self::Content(content) => Some(&content.document_title),
        }
    }
}

/// `"{title} - {site name}"`
pub fn document_title(title: &str, i18n: &LocaleService) -> String {
    format!("{} - {}", title, i18n.translate("site.portfolio"))
}
