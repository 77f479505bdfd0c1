//! Replacement of one text node by a sequence of text and annotation nodes.

use crate::model::{Attribute, ComponentInvocation, Mode, Node, ResolvedAnnotation};
use crate::resolver::Resolution;
use crate::serialize::ToExpr;

/// One piece of a rewritten text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Annotation(ResolvedAnnotation),
}

impl From<Resolution> for Piece {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Resolved(resolved) => Piece::Annotation(resolved),
            Resolution::Unresolved(marker) => Piece::Text(marker.display_text),
        }
    }
}

/// Build the annotation node for a resolved marker:
/// `<Component mode="term" term="key" content={{...}}>display</Component>`.
/// The `term` attribute is only present in term mode.
pub fn annotation_node(resolved: &ResolvedAnnotation, component_name: &str) -> Node {
    let mut attributes = vec![Attribute::literal("mode", resolved.mode().as_str())];
    if resolved.mode() == Mode::Term {
        attributes.push(Attribute::literal("term", resolved.key()));
    }
    attributes.push(Attribute::expression("content", resolved.payload().to_expr()));

    Node::component(
        ComponentInvocation {
            name: component_name.to_string(),
            attributes,
        },
        vec![Node::text(resolved.display_text())],
    )
}

/// Turn pieces into nodes. Adjacent text pieces merge into one text node and
/// empty text is dropped.
pub fn build_replacement(pieces: Vec<Piece>, component_name: &str) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(pieces.len());
    let mut pending = String::new();

    for piece in pieces {
        match piece {
            Piece::Text(text) => pending.push_str(&text),
            Piece::Annotation(resolved) => {
                if !pending.is_empty() {
                    nodes.push(Node::text(std::mem::take(&mut pending)));
                }
                nodes.push(annotation_node(&resolved, component_name));
            }
        }
    }
    if !pending.is_empty() {
        nodes.push(Node::text(pending));
    }
    nodes
}

/// Replace `children[index]` with `replacement` in one splice. Returns the
/// number of nodes inserted. Siblings outside `index` keep their order and
/// identity.
pub fn replace_child(children: &mut Vec<Node>, index: usize, replacement: Vec<Node>) -> usize {
    let inserted = replacement.len();
    children.splice(index..=index, replacement);
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationDefinition, AttributeValue, TermDefinition};

    fn resolved(key: &str) -> ResolvedAnnotation {
        ResolvedAnnotation::new(
            key.to_string(),
            key.to_string(),
            AnnotationDefinition::Term(TermDefinition {
                definition: format!("{key} defined"),
            }),
        )
    }

    #[test]
    fn test_annotation_node_shape() {
        let node = annotation_node(&resolved("alpha"), "Annotation");
        let component = node.as_component().unwrap();

        assert_eq!(component.name, "Annotation");
        assert_eq!(
            component.attribute("mode"),
            Some(&AttributeValue::Literal("term".to_string()))
        );
        assert_eq!(
            component.attribute("term"),
            Some(&AttributeValue::Literal("alpha".to_string()))
        );
        match component.attribute("content") {
            Some(AttributeValue::Expression(expr)) => {
                assert_eq!(
                    expr.get("definition").and_then(|e| e.as_str()),
                    Some("alpha defined")
                );
            }
            other => panic!("unexpected content attribute {other:?}"),
        }
        assert_eq!(node.text_content(), "alpha");
    }

    #[test]
    fn test_adjacent_text_merges() {
        let nodes = build_replacement(
            vec![
                Piece::Text("See ".to_string()),
                Piece::Text("ghost".to_string()),
                Piece::Text(" here".to_string()),
            ],
            "Annotation",
        );
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].as_text(), Some("See ghost here"));
    }

    #[test]
    fn test_replace_child_keeps_siblings() {
        let mut children = vec![Node::text("a"), Node::text("b"), Node::text("c")];
        let before: Vec<_> = children.iter().map(|n| n.id).collect();

        let inserted = replace_child(
            &mut children,
            1,
            vec![Node::text("b1"), Node::text("b2")],
        );

        assert_eq!(inserted, 2);
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].id, before[0]);
        assert_eq!(children[3].id, before[2]);
        assert_eq!(children[1].as_text(), Some("b1"));
        assert_eq!(children[2].as_text(), Some("b2"));
    }
}
