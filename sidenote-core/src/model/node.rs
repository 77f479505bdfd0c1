use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Expr;

/// Stable identity of a tree node. Untouched nodes keep their id across a
/// transform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    /// Structural container: paragraph, heading, emphasis, list item...
    Element { tag: String },
    Text { value: String },
    Code {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
    InlineCode { value: String },
    Component(ComponentInvocation),
    Import(ImportDeclaration),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentInvocation {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl ComponentInvocation {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Literal(value.into()),
        }
    }

    pub fn expression(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Expression(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    /// Plain string attribute: `name="value"`
    Literal(String),
    /// Expression attribute: `name={...}`
    Expression(Expr),
}

/// `import <default_binding> from "<source>"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportDeclaration {
    pub default_binding: String,
    pub source: String,
}

impl ImportDeclaration {
    pub fn new(default_binding: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            default_binding: default_binding.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for ImportDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {} from {:?};", self.default_binding, self.source)
    }
}

/// A document tree node with ordered children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            children,
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Root, children)
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Element { tag: tag.into() }, children)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(
            NodeKind::Text {
                value: value.into(),
            },
            Vec::new(),
        )
    }

    pub fn code(value: impl Into<String>, lang: Option<String>) -> Self {
        Self::new(
            NodeKind::Code {
                value: value.into(),
                lang,
            },
            Vec::new(),
        )
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        Self::new(
            NodeKind::InlineCode {
                value: value.into(),
            },
            Vec::new(),
        )
    }

    pub fn component(invocation: ComponentInvocation, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Component(invocation), children)
    }

    pub fn import(declaration: ImportDeclaration) -> Self {
        Self::new(NodeKind::Import(declaration), Vec::new())
    }

    /// Text value if this is a text leaf
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentInvocation> {
        match &self.kind {
            NodeKind::Component(invocation) => Some(invocation),
            _ => None,
        }
    }

    /// Whether this node's children may hold prose text
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Root | NodeKind::Element { .. } | NodeKind::Component(_)
        )
    }

    /// Concatenated prose of the subtree: text leaves and inline code, in
    /// document order. Imports and fenced code contribute nothing.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.walk() {
            match &node.kind {
                NodeKind::Text { value } | NodeKind::InlineCode { value } => out.push_str(value),
                _ => {}
            }
        }
        out
    }

    /// Pre-order traversal, starting with `self`
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Number of nodes in the subtree, including `self`
    pub fn count(&self) -> usize {
        self.walk().count()
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::root(vec![
            Node::element(
                "paragraph",
                vec![
                    Node::text("Use "),
                    Node::inline_code("cargo"),
                    Node::text(" daily."),
                ],
            ),
            Node::code("fn main() {}", Some("rust".to_string())),
        ])
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = sample();
        let kinds: Vec<_> = tree
            .walk()
            .map(|n| match &n.kind {
                NodeKind::Root => "root",
                NodeKind::Element { .. } => "element",
                NodeKind::Text { .. } => "text",
                NodeKind::InlineCode { .. } => "inlineCode",
                NodeKind::Code { .. } => "code",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["root", "element", "text", "inlineCode", "text", "code"]
        );
        assert_eq!(tree.count(), 6);
    }

    #[test]
    fn test_text_content_skips_fenced_code() {
        assert_eq!(sample().text_content(), "Use cargo daily.");
    }

    #[test]
    fn test_json_shape() {
        let node = Node::text("hello");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["value"], "hello");
        assert!(json.get("children").is_none());
        assert_eq!(json["id"], node.id.to_string());
    }

    #[test]
    fn test_deserialize_assigns_missing_ids() {
        let json = r#"{"type":"root","children":[{"type":"text","value":"a"},{"type":"text","value":"b"}]}"#;
        let tree: Node = serde_json::from_str(json).unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_ne!(tree.children[0].id, tree.children[1].id);
        assert_eq!(tree.children[1].as_text(), Some("b"));
    }

    #[test]
    fn test_import_display() {
        let decl = ImportDeclaration::new("Annotation", "@/components/Annotation.astro");
        assert_eq!(
            decl.to_string(),
            r#"import Annotation from "@/components/Annotation.astro";"#
        );
    }
}
