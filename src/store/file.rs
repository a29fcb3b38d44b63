use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::model::{Concepto, ConceptoDraft, ConceptoStats, ConceptoUpdate};
use crate::store::traits::ConceptoStore;

/// File-backed store: the whole collection lives in a single JSON array that
/// is read and rewritten wholesale on every mutating call.
///
/// Mutations take `write_lock` for the full read-modify-write cycle, so two
/// concurrent creates cannot interleave and drop each other's record. The
/// I/O inside the guard is synchronous `std::fs` with no await points. Reads
/// are unguarded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the full collection. A missing file is an empty collection.
    fn read_collection(&self) -> Result<Vec<Concepto>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write_collection(&self, conceptos: &[Concepto]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let raw = serde_json::to_string_pretty(conceptos)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    // Next id = max existing id + 1, or 1 when the collection is empty.
    fn next_id(conceptos: &[Concepto]) -> i64 {
        conceptos.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

#[async_trait::async_trait]
impl ConceptoStore for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<Concepto>> {
        self.read_collection()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Concepto>> {
        Ok(self.read_collection()?.into_iter().find(|c| c.id == id))
    }

    async fn insert(&self, draft: ConceptoDraft) -> Result<Concepto> {
        let _guard = self.write_lock.lock();

        let mut conceptos = self.read_collection()?;
        let concepto = Concepto {
            id: Self::next_id(&conceptos),
            name: draft.name,
            description: draft.description,
        };
        conceptos.push(concepto.clone());
        self.write_collection(&conceptos)?;

        Ok(concepto)
    }

    async fn update_by_id(&self, id: i64, patch: ConceptoUpdate) -> Result<Option<Concepto>> {
        let _guard = self.write_lock.lock();

        let mut conceptos = self.read_collection()?;
        let Some(concepto) = conceptos.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            concepto.name = name;
        }
        if let Some(description) = patch.description {
            concepto.description = description;
        }
        let updated = concepto.clone();
        self.write_collection(&conceptos)?;

        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock();

        let mut conceptos = self.read_collection()?;
        let before = conceptos.len();
        conceptos.retain(|c| c.id != id);
        if conceptos.len() == before {
            return Ok(false);
        }
        self.write_collection(&conceptos)?;

        Ok(true)
    }

    async fn delete_all(&self) -> Result<u64> {
        let _guard = self.write_lock.lock();

        let conceptos = self.read_collection()?;
        let cantidad = conceptos.len() as u64;
        self.write_collection(&[])?;

        Ok(cantidad)
    }

    async fn search(&self, term: &str) -> Result<Vec<Concepto>> {
        let needle = term.to_lowercase();
        Ok(self
            .read_collection()?
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.description.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn stats(&self) -> Result<ConceptoStats> {
        let conceptos = self.read_collection()?;
        Ok(ConceptoStats {
            count: conceptos.len() as u64,
            last_id: conceptos.iter().map(|c| c.id).max(),
        })
    }
}
