//! Export generators for kiln components.
//!
//! Turns the selected component into a CSS rule set, an HTML fragment, a
//! typed React component, or a JSON dump, and writes those artifacts out.

pub mod artifact;
pub mod builder;
pub mod check;
pub mod css;
pub mod html;
pub mod load;
pub mod tsx;
pub mod validate;

pub use artifact::{
    artifact_filename, slugify, Artifact, ArtifactSink, DeliveryOutcome, DirectorySink,
    ExportFormat, StdoutSink,
};
pub use builder::{BatchResult, ExportBuilder, ExportConfig, ExportError};
pub use check::{check_css, check_tsx, minify_css};
pub use css::{class_name, to_css};
pub use html::to_html;
pub use load::{load_component, parse_component, ConfigSyntax, LoadError};
pub use tsx::{component_name, to_source_component};
pub use validate::validate_for_export;
