//! File I/O for the CLI

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use sidenote_core::{prose, Node, TransformOptions, TransformReport};

use crate::InputFormat;

const CONFIG_FILE: &str = "sidenote.json";

/// Load a document and build its tree
pub fn load_document(path: &Path, format: InputFormat) -> Result<(PathBuf, Node)> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;

    let content = fs::read_to_string(&canonical)
        .with_context(|| format!("Failed to read file: {}", canonical.display()))?;

    let tree = match format {
        InputFormat::Prose => prose::parse(&content),
        InputFormat::Tree => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tree JSON: {}", canonical.display()))?,
    };

    Ok((canonical, tree))
}

/// Default config location: `<config dir>/sidenote/sidenote.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sidenote").join(CONFIG_FILE))
}

/// Read transform options from an explicit config file, else from the default
/// location if one exists, else defaults
pub fn load_options(explicit: Option<&Path>) -> Result<TransformOptions> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(TransformOptions::default()),
        },
    };

    let json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Output path for a transformed document: `<out_dir or input dir>/<stem>.tree.json`
pub fn output_path(document: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let file_name = format!("{}.tree.json", stem);
    match out_dir {
        Some(dir) => dir.join(file_name),
        None => document.with_file_name(file_name),
    }
}

/// Write the export envelope for one document
pub fn export_document(
    tree: &Node,
    report: &TransformReport,
    document: &Path,
    out_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(dir) = out_dir {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }
    let export_path = output_path(document, out_dir);

    let json = sidenote_core::to_json(tree, report).context("Failed to serialize document")?;

    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    Ok(export_path)
}
