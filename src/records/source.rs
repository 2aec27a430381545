//! RecordSource trait definition
//!
//! Defines the abstract interface for suppliers of teaching facts. The
//! network layer only ever sees this trait, so graph construction is
//! decoupled from where the records live (JSON exports, in-memory fixtures,
//! future database backends).

use crate::records::models::{FactBatch, RawTeachingFact, TeachingFact, Window};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Abstract interface for reading teaching facts.
///
/// Implementations must be deterministic: repeated calls with the same
/// window return the same facts unless the underlying data changed.
pub trait RecordSource: Send + Sync {
    /// Return every fact whose year falls inside `window`, along with a
    /// count of raw rows skipped during validation.
    fn teaching_facts(&self, window: Window) -> Result<FactBatch>;
}

// ============================================================================
// In-memory source
// ============================================================================

/// Record source over an owned, already-validated fact list. Used by tests
/// and by the sample-data path.
pub struct MemoryRecordSource {
    facts: Vec<TeachingFact>,
}

impl MemoryRecordSource {
    pub fn new(facts: Vec<TeachingFact>) -> Self {
        Self { facts }
    }
}

impl RecordSource for MemoryRecordSource {
    fn teaching_facts(&self, window: Window) -> Result<FactBatch> {
        let facts = self
            .facts
            .iter()
            .filter(|f| window.contains(f.year))
            .cloned()
            .collect();
        Ok(FactBatch { facts, skipped: 0 })
    }
}

// ============================================================================
// JSON file source
// ============================================================================

/// Record source reading raw facts from a JSON file (an array of fact
/// objects, possibly with null/missing fields from the upstream join).
///
/// The file is re-read on every call; the source holds no cache, so a
/// changed file is picked up by the next build.
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and validate the whole file. Rows failing validation are
    /// dropped, logged at debug, and counted in `skipped`.
    fn load(&self) -> Result<FactBatch> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read facts file {}", self.path.display()))?;
        let raw: Vec<RawTeachingFact> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse facts file {}", self.path.display()))?;

        let total = raw.len();
        let mut facts = Vec::with_capacity(total);
        let mut skipped = 0usize;
        for row in raw {
            match row.validate() {
                Ok(fact) => facts.push(fact),
                Err(missing) => {
                    tracing::debug!("Skipping fact row with missing {missing}");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            tracing::warn!(
                "Skipped {skipped}/{total} malformed fact rows from {}",
                self.path.display()
            );
        }
        Ok(FactBatch { facts, skipped })
    }
}

impl RecordSource for JsonRecordSource {
    fn teaching_facts(&self, window: Window) -> Result<FactBatch> {
        let batch = self.load()?;
        let facts = batch
            .facts
            .into_iter()
            .filter(|f| window.contains(f.year))
            .collect();
        Ok(FactBatch {
            facts,
            skipped: batch.skipped,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
