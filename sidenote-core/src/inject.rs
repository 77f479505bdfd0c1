//! Import injection for the rendering component.

use log::debug;

use crate::model::{ImportDeclaration, Node, NodeKind};

/// Prepend `declaration` to the document's top-level children unless an
/// identical declaration is already there. Returns whether it was added.
pub fn ensure_import(root: &mut Node, declaration: ImportDeclaration) -> bool {
    let present = root
        .children
        .iter()
        .any(|child| matches!(&child.kind, NodeKind::Import(existing) if *existing == declaration));
    if present {
        debug!("event=import_present import={}", declaration);
        return false;
    }

    root.children.insert(0, Node::import(declaration));
    true
}
