//! Marker resolution against a loaded sidecar dataset.

use log::warn;

use crate::diagnostics::Diagnostic;
use crate::model::{AnnotationDefinition, ReferenceDefinition, ResolvedAnnotation};
use crate::scanner::Marker;
use crate::sidecar::SidecarDataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedAnnotation),
    /// Falls back to the marker's display text
    Unresolved(Marker),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn display_text(&self) -> &str {
        match self {
            Resolution::Resolved(resolved) => resolved.display_text(),
            Resolution::Unresolved(marker) => &marker.display_text,
        }
    }
}

/// Resolves markers for one document and collects a warning per miss.
///
/// Never mutates the dataset and never fails.
pub struct Resolver<'a> {
    dataset: &'a SidecarDataset,
    document: &'a str,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(dataset: &'a SidecarDataset, document: &'a str) -> Self {
        Self {
            dataset,
            document,
            diagnostics: Vec::new(),
        }
    }

    pub fn resolve(&mut self, marker: Marker) -> Resolution {
        match self.dataset.lookup(marker.mode, &marker.key) {
            Some(definition) => Resolution::Resolved(ResolvedAnnotation::new(
                marker.key,
                marker.display_text,
                normalize(definition),
            )),
            None => {
                warn!(
                    "event=annotation_unresolved document={} marker={}:{}",
                    self.document, marker.mode, marker.key
                );
                self.diagnostics.push(Diagnostic::unresolved_marker(
                    self.document,
                    marker.mode,
                    &marker.key,
                ));
                Resolution::Unresolved(marker)
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Drop optional fields the data left blank so they are omitted downstream
fn normalize(definition: AnnotationDefinition) -> AnnotationDefinition {
    match definition {
        AnnotationDefinition::Reference(reference) => {
            AnnotationDefinition::Reference(ReferenceDefinition {
                venue: non_blank(reference.venue),
                url: non_blank(reference.url),
                context: non_blank(reference.context),
                ..reference
            })
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mode, TermDefinition, TextRange};

    fn marker(mode: Mode, key: &str) -> Marker {
        Marker {
            mode,
            key: key.to_string(),
            display_text: format!("the {key}"),
            range: TextRange::new(0, 10),
        }
    }

    fn dataset() -> SidecarDataset {
        let mut dataset = SidecarDataset::default();
        dataset.insert_term(
            "alpha",
            TermDefinition {
                definition: "First letter.".to_string(),
            },
        );
        dataset.insert_reference(
            "knuth",
            ReferenceDefinition {
                title: "Structured Programming with go to Statements".to_string(),
                authors: "D. E. Knuth".to_string(),
                year: Some(1974),
                venue: Some("  ".to_string()),
                url: None,
                summary: "Defends some gotos.".to_string(),
                context: Some("Quoted for the 97% line.".to_string()),
            },
        );
        dataset
    }

    #[test]
    fn test_hit_builds_typed_payload() {
        let dataset = dataset();
        let mut resolver = Resolver::new(&dataset, "essay.mdx");

        match resolver.resolve(marker(Mode::Term, "alpha")) {
            Resolution::Resolved(resolved) => {
                assert_eq!(resolved.mode(), Mode::Term);
                assert_eq!(resolved.key(), "alpha");
                assert_eq!(resolved.display_text(), "the alpha");
                assert_eq!(
                    resolved.payload(),
                    &AnnotationDefinition::Term(TermDefinition {
                        definition: "First letter.".to_string()
                    })
                );
            }
            other => panic!("expected resolution, got {other:?}"),
        }
        assert!(resolver.diagnostics().is_empty());
    }

    #[test]
    fn test_blank_optional_fields_are_dropped() {
        let dataset = dataset();
        let mut resolver = Resolver::new(&dataset, "essay.mdx");

        let Resolution::Resolved(resolved) = resolver.resolve(marker(Mode::Ref, "knuth")) else {
            panic!("knuth should resolve");
        };
        match resolved.payload() {
            AnnotationDefinition::Reference(r) => {
                assert_eq!(r.venue, None);
                assert_eq!(r.url, None);
                assert_eq!(r.year, Some(1974));
                assert!(r.context.is_some());
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_miss_warns_once_per_marker() {
        let dataset = dataset();
        let mut resolver = Resolver::new(&dataset, "essay.mdx");

        let resolution = resolver.resolve(marker(Mode::Term, "ghost"));
        assert!(!resolution.is_resolved());
        assert_eq!(resolution.display_text(), "the ghost");

        // Namespaces are separate: a term key does not resolve as a ref
        assert!(!resolver.resolve(marker(Mode::Ref, "alpha")).is_resolved());

        let diagnostics = resolver.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("term:ghost"));
        assert!(diagnostics[1].message.contains("ref:alpha"));
        assert_eq!(diagnostics[0].document, "essay.mdx");
    }
}
