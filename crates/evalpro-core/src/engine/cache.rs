use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[error("Failed to load structure '{}': {source}", .path.display())]
pub struct CacheError {
    pub path: PathBuf,
    #[source]
    pub source: Box<dyn Error + Send + Sync>,
}

pub type LoadResult = Result<Structure, Box<dyn Error + Send + Sync>>;
pub type StructureLoader = Box<dyn Fn(&Path) -> LoadResult + Send + Sync>;

type Slot = Arc<Mutex<Option<Arc<Structure>>>>;

/// Parse-once memoization of structure files, keyed by canonical path.
///
/// Entries are never evicted or invalidated for the lifetime of the cache: a file
/// that changes on disk after its first load keeps being served from memory.
/// Callers that need a fresh parse must [`clear`](StructureCache::clear) the cache.
///
/// The cache is safe to share between threads. Concurrent first requests for the
/// same path parse the file exactly once; the other requesters wait for that parse
/// and receive the same `Arc`. Requests for different paths never wait on each
/// other. A failed parse is not stored, so a later request retries it.
pub struct StructureCache {
    loader: StructureLoader,
    entries: Mutex<HashMap<PathBuf, Slot>>,
}

impl Default for StructureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureCache {
    /// A cache that parses PDB files.
    pub fn new() -> Self {
        Self::with_loader(Box::new(|path: &Path| -> LoadResult {
            let (structure, _) = PdbFile::read_from_path(path)?;
            Ok(structure)
        }))
    }

    pub fn with_loader(loader: StructureLoader) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Structure>, CacheError> {
        let key = canonical_key(path.as_ref());
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(structure) = value.as_ref() {
            return Ok(Arc::clone(structure));
        }

        debug!(path = %key.display(), "Parsing structure file.");
        let structure = Arc::new((self.loader)(&key).map_err(|source| CacheError {
            path: key.clone(),
            source,
        })?);
        *value = Some(Arc::clone(&structure));
        Ok(structure)
    }

    /// Whether a parsed structure for `path` is held.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let key = canonical_key(path.as_ref());
        let slot = {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&key) {
                Some(slot) => Arc::clone(slot),
                None => return false,
            }
        };
        let value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        value.is_some()
    }

    /// Number of successfully parsed structures held.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.values().cloned().collect()
        };
        slots
            .iter()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn canonical_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
