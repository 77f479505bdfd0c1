//! Conversion of resolved payloads into literal-expression trees.
//!
//! Attribute values in the output document are expressions, not strings, so
//! the rendering component receives a native object instead of parsing JSON
//! at render time.

use crate::model::{
    AnnotationDefinition, Expr, LinkDefinition, Property, ReferenceDefinition, TermDefinition,
};

/// Structural conversion into an [`Expr`]
pub trait ToExpr {
    fn to_expr(&self) -> Expr;
}

impl ToExpr for str {
    fn to_expr(&self) -> Expr {
        Expr::String(self.to_string())
    }
}

impl ToExpr for String {
    fn to_expr(&self) -> Expr {
        Expr::String(self.clone())
    }
}

impl ToExpr for bool {
    fn to_expr(&self) -> Expr {
        Expr::Bool(*self)
    }
}

impl ToExpr for u32 {
    fn to_expr(&self) -> Expr {
        Expr::Number((*self).into())
    }
}

impl ToExpr for i64 {
    fn to_expr(&self) -> Expr {
        Expr::Number((*self).into())
    }
}

impl ToExpr for f64 {
    fn to_expr(&self) -> Expr {
        serde_json::Number::from_f64(*self)
            .map(Expr::Number)
            .unwrap_or(Expr::Null)
    }
}

impl<T: ToExpr> ToExpr for Option<T> {
    fn to_expr(&self) -> Expr {
        match self {
            Some(value) => value.to_expr(),
            None => Expr::Null,
        }
    }
}

impl<T: ToExpr> ToExpr for Vec<T> {
    fn to_expr(&self) -> Expr {
        Expr::Array(self.iter().map(ToExpr::to_expr).collect())
    }
}

impl ToExpr for serde_json::Value {
    fn to_expr(&self) -> Expr {
        use serde_json::Value;

        match self {
            Value::Null => Expr::Null,
            Value::Bool(b) => Expr::Bool(*b),
            Value::Number(n) => Expr::Number(n.clone()),
            Value::String(s) => Expr::String(s.clone()),
            Value::Array(items) => Expr::Array(items.iter().map(ToExpr::to_expr).collect()),
            Value::Object(map) => Expr::Object(
                map.iter()
                    .map(|(key, value)| Property::new(key.clone(), value.to_expr()))
                    .collect(),
            ),
        }
    }
}

/// Object literal builder that leaves out absent optional fields
#[derive(Default)]
struct ObjectBuilder {
    props: Vec<Property>,
}

impl ObjectBuilder {
    fn field(mut self, key: &str, value: &impl ToExpr) -> Self {
        self.props.push(Property::new(key, value.to_expr()));
        self
    }

    fn optional<T: ToExpr>(mut self, key: &str, value: &Option<T>) -> Self {
        if let Some(value) = value {
            self.props.push(Property::new(key, value.to_expr()));
        }
        self
    }

    fn build(self) -> Expr {
        Expr::Object(self.props)
    }
}

impl ToExpr for TermDefinition {
    fn to_expr(&self) -> Expr {
        ObjectBuilder::default()
            .field("definition", &self.definition)
            .build()
    }
}

impl ToExpr for ReferenceDefinition {
    fn to_expr(&self) -> Expr {
        ObjectBuilder::default()
            .field("title", &self.title)
            .field("authors", &self.authors)
            .optional("year", &self.year)
            .optional("venue", &self.venue)
            .optional("url", &self.url)
            .field("summary", &self.summary)
            .optional("context", &self.context)
            .build()
    }
}

impl ToExpr for LinkDefinition {
    fn to_expr(&self) -> Expr {
        ObjectBuilder::default()
            .field("url", &self.url)
            .field("title", &self.title)
            .field("source", &self.source)
            .field("summary", &self.summary)
            .build()
    }
}

impl ToExpr for AnnotationDefinition {
    fn to_expr(&self) -> Expr {
        match self {
            AnnotationDefinition::Term(term) => term.to_expr(),
            AnnotationDefinition::Reference(reference) => reference.to_expr(),
            AnnotationDefinition::Link(link) => link.to_expr(),
        }
    }
}
