//! Sidecar dataset loading.
//!
//! A document `essays/entropy.mdx` keeps its annotation definitions in
//! `essays/entropy.annotations.json` (the suffix is configurable). The file
//! holds three independent lists:
//!
//! ```json
//! {
//!   "terms": [{ "key": "entropy", "definition": "..." }],
//!   "references": [{ "key": "shannon-1948", "title": "...", "authors": "...", "summary": "..." }],
//!   "links": [{ "key": "wiki", "url": "...", "title": "...", "source": "...", "summary": "..." }]
//! }
//! ```
//!
//! Missing lists are empty. Keys must be unique within a list; the same key
//! may appear in different lists.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::model::{
    AnnotationDefinition, LinkDefinition, Mode, ReferenceDefinition, TermDefinition,
};

pub const DEFAULT_SIDECAR_SUFFIX: &str = ".annotations.json";

/// A sidecar file that exists but cannot be used. Fatal to the document's
/// transform.
#[derive(Debug, thiserror::Error)]
pub enum SidecarError {
    #[error("failed to read sidecar {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed sidecar {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {mode} key `{key}` in sidecar {}", .path.display())]
    DuplicateKey {
        path: PathBuf,
        mode: Mode,
        key: String,
    },
}

impl SidecarError {
    pub fn path(&self) -> &Path {
        match self {
            SidecarError::Io { path, .. }
            | SidecarError::Malformed { path, .. }
            | SidecarError::DuplicateKey { path, .. } => path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Entry<T> {
    key: String,
    #[serde(flatten)]
    definition: T,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SidecarFile {
    #[serde(default)]
    terms: Vec<Entry<TermDefinition>>,
    #[serde(default)]
    references: Vec<Entry<ReferenceDefinition>>,
    #[serde(default)]
    links: Vec<Entry<LinkDefinition>>,
}

/// Annotation definitions for one document, keyed per mode
#[derive(Debug, Clone, Default)]
pub struct SidecarDataset {
    terms: HashMap<String, TermDefinition>,
    references: HashMap<String, ReferenceDefinition>,
    links: HashMap<String, LinkDefinition>,
}

fn index<T>(
    entries: Vec<Entry<T>>,
    mode: Mode,
    path: &Path,
) -> Result<HashMap<String, T>, SidecarError> {
    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        if map.contains_key(&entry.key) {
            return Err(SidecarError::DuplicateKey {
                path: path.to_path_buf(),
                mode,
                key: entry.key,
            });
        }
        map.insert(entry.key, entry.definition);
    }
    Ok(map)
}

impl SidecarDataset {
    /// Parse sidecar JSON. `path` is only used for error reporting.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, SidecarError> {
        let file: SidecarFile =
            serde_json::from_str(json).map_err(|source| SidecarError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            terms: index(file.terms, Mode::Term, path)?,
            references: index(file.references, Mode::Ref, path)?,
            links: index(file.links, Mode::Link, path)?,
        })
    }

    pub fn insert_term(&mut self, key: impl Into<String>, definition: TermDefinition) {
        self.terms.insert(key.into(), definition);
    }

    pub fn insert_reference(&mut self, key: impl Into<String>, definition: ReferenceDefinition) {
        self.references.insert(key.into(), definition);
    }

    pub fn insert_link(&mut self, key: impl Into<String>, definition: LinkDefinition) {
        self.links.insert(key.into(), definition);
    }

    /// Look up `key` in the namespace for `mode`
    pub fn lookup(&self, mode: Mode, key: &str) -> Option<AnnotationDefinition> {
        match mode {
            Mode::Term => self.terms.get(key).cloned().map(AnnotationDefinition::Term),
            Mode::Ref => self
                .references
                .get(key)
                .cloned()
                .map(AnnotationDefinition::Reference),
            Mode::Link => self.links.get(key).cloned().map(AnnotationDefinition::Link),
        }
    }

    /// Number of definitions for `mode`
    pub fn count(&self, mode: Mode) -> usize {
        match mode {
            Mode::Term => self.terms.len(),
            Mode::Ref => self.references.len(),
            Mode::Link => self.links.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Mode::all().iter().all(|mode| self.count(*mode) == 0)
    }
}

/// Sidecar location for a document: same directory, extension replaced by
/// `suffix`
pub fn sidecar_path(document: &Path, suffix: &str) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    document.with_file_name(format!("{}{}", stem, suffix))
}

/// Load the sidecar for `document`.
///
/// Returns `Ok(None)` when no sidecar exists. That is not an error: the
/// document simply has no annotations.
pub fn load_for_document(
    document: &Path,
    suffix: &str,
) -> Result<Option<SidecarDataset>, SidecarError> {
    let path = sidecar_path(document, suffix);
    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("event=sidecar_missing path={}", path.display());
            return Ok(None);
        }
        Err(source) => return Err(SidecarError::Io { path, source }),
    };

    let dataset = SidecarDataset::from_json(&json, &path)?;
    debug!(
        "event=sidecar_loaded path={} terms={} references={} links={}",
        path.display(),
        dataset.count(Mode::Term),
        dataset.count(Mode::Ref),
        dataset.count(Mode::Link)
    );
    Ok(Some(dataset))
}
