use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal expression, embeddable as a component attribute value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Expr {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Expr>),
    Object(Vec<Property>),
}

/// One `key: value` entry of an object literal, in source order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

impl Property {
    pub fn new(key: impl Into<String>, value: Expr) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Self {
        Expr::String(value.into())
    }

    /// Look up a property of an object literal
    pub fn get(&self, key: &str) -> Option<&Expr> {
        match self {
            Expr::Object(props) => props.iter().find(|p| p.key == key).map(|p| &p.value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::String(s) => Some(s),
            _ => None,
        }
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    // JSON string escaping is a subset of what a JS string literal accepts.
    match serde_json::to_string(value) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => Err(fmt::Error),
    }
}

/// Renders the expression as JavaScript literal source.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Null => f.write_str("null"),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::String(s) => write_string(f, s),
            Expr::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Expr::Object(props) => {
                if props.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_identifier(&prop.key) {
                        f.write_str(&prop.key)?;
                    } else {
                        write_string(f, &prop.key)?;
                    }
                    write!(f, ": {}", prop.value)?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_object_literal() {
        let expr = Expr::Object(vec![
            Property::new("title", Expr::string("A \"quoted\" title")),
            Property::new("year", Expr::Number(1936.into())),
            Property::new("data-id", Expr::Bool(true)),
            Property::new("tags", Expr::Array(vec![Expr::string("a"), Expr::Null])),
        ]);

        assert_eq!(
            expr.to_string(),
            r#"{ title: "A \"quoted\" title", year: 1936, "data-id": true, tags: ["a", null] }"#
        );
    }

    #[test]
    fn test_display_empty_containers() {
        assert_eq!(Expr::Object(Vec::new()).to_string(), "{}");
        assert_eq!(Expr::Array(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn test_get_property() {
        let expr = Expr::Object(vec![Property::new("definition", Expr::string("x"))]);
        assert_eq!(expr.get("definition").and_then(Expr::as_str), Some("x"));
        assert_eq!(expr.get("missing"), None);
        assert_eq!(Expr::Null.get("definition"), None);
    }
}
