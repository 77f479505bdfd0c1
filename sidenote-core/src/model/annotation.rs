use serde::{Deserialize, Serialize};

/// Annotation mode, selected by the `mode` segment of a marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Term,
    Ref,
    Link,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Term, Mode::Ref, Mode::Link]
    }

    /// Spelling used in marker syntax and in the component's `mode` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Term => "term",
            Mode::Ref => "ref",
            Mode::Link => "link",
        }
    }

    pub fn from_marker(name: &str) -> Option<Mode> {
        match name {
            "term" => Some(Mode::Term),
            "ref" => Some(Mode::Ref),
            "link" => Some(Mode::Link),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermDefinition {
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceDefinition {
    pub title: String,
    pub authors: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDefinition {
    pub url: String,
    pub title: String,
    pub source: String,
    pub summary: String,
}

/// A definition looked up from the sidecar dataset, one shape per mode.
///
/// Serialized untagged: the rendering component learns the shape from the
/// separate `mode` attribute.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AnnotationDefinition {
    Term(TermDefinition),
    Reference(ReferenceDefinition),
    Link(LinkDefinition),
}

impl AnnotationDefinition {
    pub fn mode(&self) -> Mode {
        match self {
            AnnotationDefinition::Term(_) => Mode::Term,
            AnnotationDefinition::Reference(_) => Mode::Ref,
            AnnotationDefinition::Link(_) => Mode::Link,
        }
    }
}

/// A marker that resolved against the dataset. Immutable once built by the
/// resolver.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAnnotation {
    mode: Mode,
    key: String,
    display_text: String,
    payload: AnnotationDefinition,
}

impl ResolvedAnnotation {
    pub(crate) fn new(key: String, display_text: String, payload: AnnotationDefinition) -> Self {
        Self {
            mode: payload.mode(),
            key,
            display_text,
            payload,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn payload(&self) -> &AnnotationDefinition {
        &self.payload
    }
}
