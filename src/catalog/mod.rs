//! Project catalog: static records and asset bundles.

mod models;
mod repository;

pub use models::{
    ArchitectureDiagram, AssetBundle, Blank, DiagramKind, LocalizedText, ProjectKind,
    ProjectLinks, ProjectRecord, pick_localized,
};
pub use repository::{ProjectEntry, ProjectRepository};
