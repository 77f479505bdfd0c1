pub mod annotation;
pub mod expr;
pub mod node;
pub mod text_range;

pub use annotation::{
    AnnotationDefinition, LinkDefinition, Mode, ReferenceDefinition, ResolvedAnnotation,
    TermDefinition,
};
pub use expr::{Expr, Property};
pub use node::{
    Attribute, AttributeValue, ComponentInvocation, ImportDeclaration, Node, NodeId, NodeKind,
};
pub use text_range::TextRange;
