//! Free-text notes per client, persisted as a JSON object.

use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn read_notes(path: &Path) -> Result<BTreeMap<String, String>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Client name → note, backed by a single JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStore {
    path: PathBuf,
    notes: BTreeMap<String, String>,
}

impl AnnotationStore {
    /// Read the store at `path`.
    ///
    /// A missing, unreadable, or malformed file yields an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let notes = if path.exists() {
            match read_notes(&path) {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unreadable annotations file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, notes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, client: &str) -> Option<&str> {
        self.notes.get(client).map(String::as_str)
    }

    pub fn contains(&self, client: &str) -> bool {
        self.notes.contains_key(client)
    }

    /// Set the note for `client`. A blank note removes it.
    pub fn set(&mut self, client: &str, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            self.notes.remove(client);
        } else {
            self.notes.insert(client.to_string(), note.to_string());
        }
    }

    /// Remove the note for `client`, returning it if there was one.
    pub fn remove(&mut self, client: &str) -> Option<String> {
        self.notes.remove(client)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.notes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Overwrite the file with the current notes.
    ///
    /// Written to a temp file in the same directory and renamed into place.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(tmp.as_file_mut(), formatter);
            self.notes.serialize(&mut ser)?;
        }
        tmp.as_file_mut().flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::debug!("Saved {} notes to {}", self.notes.len(), self.path.display());
        Ok(())
    }
}
