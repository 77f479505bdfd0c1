//! Sidenote Core - inline annotation resolution for essay documents
//!
//! Scans the text nodes of a document tree for `[[mode:key|display text]]`
//! markers, resolves each against the document's sidecar dataset, and
//! rewrites the tree so a rendering component can show the definition,
//! reference or link behind each marker.

pub mod diagnostics;
pub mod disclosure;
pub mod export;
pub mod inject;
pub mod model;
pub mod prose;
pub mod resolver;
pub mod scanner;
pub mod serialize;
pub mod sidecar;
pub mod splice;
pub mod transform;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use disclosure::DisclosureArbiter;
pub use export::{to_json, ExportDocument};
pub use model::{
    AnnotationDefinition, Attribute, AttributeValue, ComponentInvocation, Expr,
    ImportDeclaration, LinkDefinition, Mode, Node, NodeId, NodeKind, Property,
    ReferenceDefinition, ResolvedAnnotation, TermDefinition, TextRange,
};
pub use resolver::{Resolution, Resolver};
pub use scanner::{scan, Marker, Segment};
pub use serialize::ToExpr;
pub use sidecar::{load_for_document, sidecar_path, SidecarDataset, SidecarError};
pub use transform::{
    apply_dataset, transform_document, TransformOptions, TransformOutcome, TransformReport,
};
