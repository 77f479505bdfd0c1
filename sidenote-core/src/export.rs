use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::model::Node;
use crate::transform::{TransformOutcome, TransformReport};

/// Output envelope for one transformed document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<String>,
    pub transformed_at: DateTime<Utc>,
    pub outcome: TransformOutcome,
    pub resolved: usize,
    pub unresolved: usize,
    pub import_injected: bool,
    pub diagnostics: &'a [Diagnostic],
    pub tree: &'a Node,
}

impl<'a> ExportDocument<'a> {
    pub fn new(tree: &'a Node, report: &'a TransformReport) -> Self {
        Self {
            source: &report.document,
            sidecar: report
                .sidecar
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            transformed_at: Utc::now(),
            outcome: report.outcome,
            resolved: report.resolved,
            unresolved: report.unresolved,
            import_injected: report.import_injected,
            diagnostics: &report.diagnostics,
            tree,
        }
    }
}

/// Serialize a transformed document and its report as pretty JSON
pub fn to_json(tree: &Node, report: &TransformReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExportDocument::new(tree, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TermDefinition;
    use crate::sidecar::SidecarDataset;
    use crate::transform::{apply_dataset, TransformOptions};

    #[test]
    fn test_export_document_format() {
        let mut dataset = SidecarDataset::default();
        dataset.insert_term(
            "alpha",
            TermDefinition {
                definition: "First.".to_string(),
            },
        );
        let mut tree = Node::root(vec![Node::text("[[term:alpha|a]] [[term:nope|b]]")]);
        let report = apply_dataset(
            &mut tree,
            &dataset,
            "essay.mdx",
            &TransformOptions::default(),
        );

        let json = to_json(&tree, &report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        // Verify camelCase field names
        assert_eq!(value["source"], "essay.mdx");
        assert_eq!(value["outcome"], "transformed");
        assert_eq!(value["importInjected"], true);
        assert_eq!(value["resolved"], 1);
        assert_eq!(value["unresolved"], 1);
        assert!(value.get("transformedAt").is_some());
        assert!(value.get("sidecar").is_none());
        assert_eq!(value["diagnostics"][0]["key"], "nope");
        assert_eq!(value["tree"]["children"][0]["type"], "import");
        assert_eq!(value["tree"]["children"][1]["type"], "component");
    }
}
