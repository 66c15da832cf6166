//! Expanding a mask for many records at once.
//!
//! Every record expands independently, so the records are split into chunks
//! and each chunk runs on a blocking worker task. Results come back in the
//! order of the input records regardless of which worker finishes first.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::error::BatchError;
use crate::expander::{ErrorPolicy, Expander};
use crate::record::DirectoryEntry;

/// A username and the password generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprayCombo {
    pub username: String,
    pub password: String,
}

impl fmt::Display for SprayCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.username, self.password)
    }
}

/// Expand one record into its combo.
pub fn expand_entry(
    expander: &Expander,
    entry: &DirectoryEntry,
    policy: ErrorPolicy,
) -> Result<SprayCombo, BatchError> {
    let password = expander
        .expand_with(entry, policy)
        .map_err(|source| BatchError::Mask {
            dn: entry.dn.clone(),
            source,
        })?;
    Ok(SprayCombo {
        username: entry.username(),
        password,
    })
}

/// Expand every record using up to `workers` blocking tasks.
///
/// With [`ErrorPolicy::Abort`] the batch fails with the error of the first
/// failing record in input order, regardless of which worker finishes first.
pub async fn expand_entries(
    expander: Arc<Expander>,
    entries: Vec<DirectoryEntry>,
    policy: ErrorPolicy,
    workers: usize,
) -> Result<Vec<SprayCombo>, BatchError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    let chunk_size = entries.len().div_ceil(workers.max(1));
    let entries = Arc::new(entries);
    debug!(
        records = entries.len(),
        workers,
        chunk_size,
        "expanding records"
    );

    let mut tasks = JoinSet::new();
    for (chunk_index, start) in (0..entries.len()).step_by(chunk_size).enumerate() {
        let expander = Arc::clone(&expander);
        let entries = Arc::clone(&entries);
        tasks.spawn_blocking(move || {
            let end = (start + chunk_size).min(entries.len());
            let combos = entries[start..end]
                .iter()
                .map(|entry| expand_entry(&expander, entry, policy))
                .collect::<Result<Vec<_>, _>>();
            (chunk_index, combos)
        });
    }

    let mut chunks = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        chunks.push(joined?);
    }
    chunks.sort_by_key(|(chunk_index, _)| *chunk_index);

    let mut combos = Vec::with_capacity(entries.len());
    for (_, chunk) in chunks {
        combos.extend(chunk?);
    }
    Ok(combos)
}
