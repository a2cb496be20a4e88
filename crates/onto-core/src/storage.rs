//! Read/write built ontologies from disk.

use crate::config::StorageConfig;
use crate::model::Ontology;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const ONTO_DIR: &str = ".ontograph";
const ONTO_FILE: &str = "ontology.json";

/// Get the path to the ontograph directory for a given project root.
pub fn onto_dir(project_root: &Path) -> PathBuf {
    project_root.join(ONTO_DIR)
}

/// Get the path to the saved ontology for a given project root.
pub fn onto_file(project_root: &Path) -> PathBuf {
    onto_dir(project_root).join(ONTO_FILE)
}

/// Check if a saved ontology exists for the given project root.
pub fn onto_exists(project_root: &Path) -> bool {
    onto_file(project_root).exists()
}

/// Load a saved ontology from disk.
pub fn load(project_root: &Path) -> Result<Ontology> {
    let path = onto_file(project_root);
    if !path.exists() {
        anyhow::bail!(
            "no saved ontology at {}; run `ontograph build <file>` first",
            path.display()
        );
    }
    let json = fs::read_to_string(&path)
        .with_context(|| format!("failed to read ontology from {}", path.display()))?;
    schema::from_json(&json).with_context(|| format!("invalid ontology in {}", path.display()))
}

/// Save an ontology to disk, creating the .ontograph directory if needed.
///
/// The JSON is written to a temporary file in the same directory and renamed
/// over `ontology.json`, so readers never see a partial file.
pub fn save(project_root: &Path, ontology: &Ontology, config: &StorageConfig) -> Result<()> {
    schema::validate_references(ontology)?;

    let dir = onto_dir(project_root);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create ontograph directory {}", dir.display()))?;

    let path = onto_file(project_root);
    let json = schema::to_json(ontology, config.pretty)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("failed to write ontology to {}", tmp.path().display()))?;
    tmp.persist(&path)
        .with_context(|| format!("failed to write ontology to {}", path.display()))?;

    Ok(())
}
