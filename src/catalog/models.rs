//! Project records and their asset bundles.

use serde::{Deserialize, Serialize};

use crate::i18n::{Locale, fallback_chain};

/// A value available in both site languages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText<T = String> {
    #[serde(default)]
    pub zh: T,
    #[serde(default)]
    pub en: T,
}

impl<T> LocalizedText<T> {
    pub fn new(zh: T, en: T) -> Self {
        Self { zh, en }
    }

    fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Zh => &self.zh,
            Locale::En => &self.en,
        }
    }
}

/// Values that can be "empty" for the purpose of locale fallback.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Blank + Clone + Default> LocalizedText<T> {
    /// Resolve for `locale`: requested, else `en`, else `zh`, else the empty value.
    pub fn resolve(&self, locale: Locale) -> T {
        pick_localized(self, locale).cloned().unwrap_or_default()
    }
}

/// Walk the locale fallback chain and return the first non-empty value.
pub fn pick_localized<T: Blank>(text: &LocalizedText<T>, locale: Locale) -> Option<&T> {
    fallback_chain(locale)
        .into_iter()
        .map(|l| text.get(l))
        .find(|value| !value.is_blank())
}

/// Category shown as a coloured tag in the project header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    AiVision,
    AiLlm,
    WebIot,
    WebPlatform,
    Desktop,
    #[default]
    Other,
}

impl ProjectKind {
    /// Translation key suffix, e.g. `ai-vision`.
    pub fn key(self) -> &'static str {
        match self {
            Self::AiVision => "ai-vision",
            Self::AiLlm => "ai-llm",
            Self::WebIot => "web-iot",
            Self::WebPlatform => "web-platform",
            Self::Desktop => "desktop",
            Self::Other => "other",
        }
    }

    /// Colour class of the tag.
    pub fn color(self) -> &'static str {
        match self {
            Self::AiVision | Self::AiLlm => "purple",
            Self::WebIot | Self::WebPlatform => "green",
            Self::Desktop => "blue",
            Self::Other => "gray",
        }
    }
}

/// External links of a project. Empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectLinks {
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default, alias = "github")]
    pub repository: Option<String>,
}

impl ProjectLinks {
    pub fn demo(&self) -> Option<&str> {
        self.demo.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// One portfolio project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: ProjectKind,
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub links: ProjectLinks,
    #[serde(default)]
    pub highlights: LocalizedText<Vec<String>>,
}

/// How an architecture diagram is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Pdf,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureDiagram {
    #[serde(rename = "type")]
    pub kind: DiagramKind,
    pub path: String,
}

/// Media and documents that belong to a project, relative to `base_path`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBundle {
    #[serde(default)]
    pub base_path: Option<String>,
    #[serde(default)]
    pub document_files: Option<LocalizedText>,
    #[serde(default)]
    pub video_paths: Vec<String>,
    #[serde(default)]
    pub screenshot_paths: Vec<String>,
    #[serde(default)]
    pub architecture_diagram: Option<ArchitectureDiagram>,
}
