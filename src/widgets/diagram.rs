//! Architecture diagram section.

use serde::Serialize;
use tracing::warn;

use crate::catalog::{AssetBundle, DiagramKind};
use crate::i18n::LocaleService;
use crate::utils::join_asset_path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiagramView {
    Hidden,
    /// View and download actions for a PDF document.
    Pdf {
        description: String,
        view_label: String,
        download_label: String,
        href: String,
    },
    /// Preview image that enlarges into the lightbox on click.
    Image { src: String, alt: String, hint: String },
    Failed { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ArchitecturePanel {
    diagram: Option<(DiagramKind, String)>,
    failed: bool,
}

impl ArchitecturePanel {
    pub fn from_bundle(bundle: Option<&AssetBundle>) -> Self {
        let diagram = bundle.and_then(|b| {
            b.architecture_diagram
                .as_ref()
                .filter(|d| !d.path.is_empty())
                .map(|d| (d.kind, join_asset_path(b.base_path.as_deref(), &d.path)))
        });
        Self {
            diagram,
            failed: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.diagram.is_none()
    }

    /// The preview image could not be loaded.
    pub fn on_image_error(&mut self) {
        if let Some((DiagramKind::Image, path)) = &self.diagram {
            warn!("Architecture diagram failed to load: {}", path);
            self.failed = true;
        }
    }

    /// Click on the image preview: the one-image list to open the lightbox with.
    pub fn activate(&self) -> Option<Vec<String>> {
        match &self.diagram {
            Some((DiagramKind::Image, path)) if !self.failed => Some(vec![path.clone()]),
            _ => None,
        }
    }

    pub fn view(&self, i18n: &LocaleService) -> DiagramView {
        let Some((kind, path)) = &self.diagram else {
            return DiagramView::Hidden;
        };

        match kind {
            DiagramKind::Pdf => DiagramView::Pdf {
                description: i18n.translate("projectDetail.pdfDescription"),
                view_label: i18n.translate("projectDetail.viewPdf"),
                download_label: i18n.translate("projectDetail.downloadArchitecture"),
                href: path.clone(),
            },
            DiagramKind::Image if self.failed => DiagramView::Failed {
                message: i18n.translate("projectDetail.architectureLoadError"),
            },
            DiagramKind::Image => DiagramView::Image {
                src: path.clone(),
                alt: "Architecture Diagram".to_string(),
                hint: i18n.translate("projectDetail.clickToEnlarge"),
            },
        }
    }
}
