//! The per-document annotation pipeline.
//!
//! `Start -> Loaded -> rewrite text nodes -> inject import (if anything
//! resolved) -> Done`. Without a sidecar the tree is untouched. With a
//! malformed sidecar the transform aborts before any mutation.

use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::inject;
use crate::model::{ImportDeclaration, Node, NodeKind};
use crate::resolver::Resolver;
use crate::scanner::{self, Segment};
use crate::sidecar::{self, SidecarDataset, DEFAULT_SIDECAR_SUFFIX};
use crate::splice::{self, Piece};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Rendering component used for annotation nodes and the import binding
    pub component_name: String,
    /// Module specifier of the injected import
    pub import_source: String,
    /// Replaces the document's extension to locate its sidecar
    pub sidecar_suffix: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            component_name: "Annotation".to_string(),
            import_source: "@/components/Annotation.astro".to_string(),
            sidecar_suffix: DEFAULT_SIDECAR_SUFFIX.to_string(),
        }
    }
}

impl TransformOptions {
    pub fn import_declaration(&self) -> ImportDeclaration {
        ImportDeclaration::new(&self.component_name, &self.import_source)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransformOutcome {
    /// No sidecar file; tree untouched
    NoSidecar,
    /// Sidecar loaded and every text node processed
    Transformed,
    /// Sidecar unusable; tree untouched, one error diagnostic
    Aborted,
}

impl TransformOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformOutcome::NoSidecar => "no-sidecar",
            TransformOutcome::Transformed => "transformed",
            TransformOutcome::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<PathBuf>,
    pub outcome: TransformOutcome,
    pub resolved: usize,
    pub unresolved: usize,
    pub import_injected: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformReport {
    fn new(document: &str, sidecar: Option<PathBuf>, outcome: TransformOutcome) -> Self {
        Self {
            document: document.to_string(),
            sidecar,
            outcome,
            resolved: 0,
            unresolved: 0,
            import_injected: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome == TransformOutcome::Aborted
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Load the sidecar for `document` and rewrite `tree` in place
pub fn transform_document(
    tree: &mut Node,
    document: &Path,
    options: &TransformOptions,
) -> TransformReport {
    let name = document.display().to_string();
    let sidecar_path = sidecar::sidecar_path(document, &options.sidecar_suffix);
    debug!("event=transform_start document={}", name);

    match sidecar::load_for_document(document, &options.sidecar_suffix) {
        Ok(Some(dataset)) => {
            let mut report = apply_dataset(tree, &dataset, &name, options);
            report.sidecar = Some(sidecar_path);
            report
        }
        Ok(None) => {
            debug!("event=transform_skipped document={} reason=no_sidecar", name);
            TransformReport::new(&name, None, TransformOutcome::NoSidecar)
        }
        Err(err) => {
            error!(
                "event=sidecar_malformed document={} sidecar={} error={}",
                name,
                err.path().display(),
                err
            );
            let mut report =
                TransformReport::new(&name, Some(sidecar_path), TransformOutcome::Aborted);
            report
                .diagnostics
                .push(Diagnostic::sidecar_malformed(&name, &err));
            report
        }
    }
}

/// Rewrite `tree` against an already loaded dataset
pub fn apply_dataset(
    tree: &mut Node,
    dataset: &SidecarDataset,
    document: &str,
    options: &TransformOptions,
) -> TransformReport {
    let mut pass = Pass {
        resolver: Resolver::new(dataset, document),
        component_name: &options.component_name,
        resolved: 0,
        unresolved: 0,
    };
    rewrite_children(tree, &mut pass);

    let mut report = TransformReport::new(document, None, TransformOutcome::Transformed);
    report.resolved = pass.resolved;
    report.unresolved = pass.unresolved;
    report.diagnostics = pass.resolver.into_diagnostics();

    if report.resolved > 0 {
        report.import_injected = inject::ensure_import(tree, options.import_declaration());
    }

    info!(
        "event=transform_done document={} resolved={} unresolved={} import_injected={}",
        document, report.resolved, report.unresolved, report.import_injected
    );
    report
}

struct Pass<'a> {
    resolver: Resolver<'a>,
    component_name: &'a str,
    resolved: usize,
    unresolved: usize,
}

impl Pass<'_> {
    /// Replacement nodes for a text run, or `None` when it has no markers
    fn rewrite_text(&mut self, text: &str) -> Option<Vec<Node>> {
        if !scanner::may_contain_marker(text) {
            return None;
        }
        let segments = scanner::scan(text);
        if !segments.iter().any(|s| matches!(s, Segment::Marker(_))) {
            return None;
        }

        let mut pieces = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(literal) => pieces.push(Piece::Text(literal.to_string())),
                Segment::Marker(marker) => {
                    let resolution = self.resolver.resolve(marker);
                    if resolution.is_resolved() {
                        self.resolved += 1;
                    } else {
                        self.unresolved += 1;
                    }
                    pieces.push(Piece::from(resolution));
                }
            }
        }
        Some(splice::build_replacement(pieces, self.component_name))
    }
}

fn rewrite_children(node: &mut Node, pass: &mut Pass<'_>) {
    let mut index = 0;
    while index < node.children.len() {
        let child = &mut node.children[index];
        if child.is_container() {
            rewrite_children(child, pass);
            index += 1;
            continue;
        }

        let replacement = match &child.kind {
            NodeKind::Text { value } => pass.rewrite_text(value),
            _ => None,
        };
        match replacement {
            // The inserted nodes are never rescanned.
            Some(nodes) => index += splice::replace_child(&mut node.children, index, nodes),
            None => index += 1,
        }
    }
}
