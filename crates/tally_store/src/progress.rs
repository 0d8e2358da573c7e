use bot_logging::{bot_error, bot_info, bot_warn};
use serde::{Deserialize, Serialize};
use tally_core::ProgressSnapshot;

use crate::blob::BlobStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedTally {
    user: u64,
    counts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedProgress {
    last_count: f64,
    last_counter: Option<u64>,
    tallies: Vec<PersistedTally>,
}

/// Loads the persisted progress stored under `key`.
///
/// Missing or corrupt blobs degrade to the zero-valued default: losing game
/// progress is recoverable, refusing to start is not.
pub fn load_progress(store: &dyn BlobStore, key: &str) -> ProgressSnapshot {
    let content = match store.read(key) {
        Ok(Some(content)) => content,
        Ok(None) => return ProgressSnapshot::default(),
        Err(err) => {
            bot_warn!("Failed to read persisted progress for {:?}: {}", key, err);
            return ProgressSnapshot::default();
        }
    };

    let persisted: PersistedProgress = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            bot_warn!("Failed to parse persisted progress for {:?}: {}", key, err);
            return ProgressSnapshot::default();
        }
    };

    bot_info!("Loaded persisted progress for {:?}", key);
    ProgressSnapshot {
        last_count: persisted.last_count,
        last_counter: persisted.last_counter,
        tallies: persisted
            .tallies
            .into_iter()
            .map(|tally| (tally.user, tally.counts))
            .collect(),
    }
}

/// Writes the progress blob for `key`.
///
/// Failures are logged and swallowed: in-memory state stays authoritative
/// and a stale blob on disk is an accepted, recoverable risk.
pub fn save_progress(store: &dyn BlobStore, key: &str, snapshot: &ProgressSnapshot) {
    let persisted = PersistedProgress {
        last_count: snapshot.last_count,
        last_counter: snapshot.last_counter,
        tallies: snapshot
            .tallies
            .iter()
            .map(|(user, counts)| PersistedTally {
                user: *user,
                counts: *counts,
            })
            .collect(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(content) => content,
        Err(err) => {
            bot_error!("Failed to serialize progress for {:?}: {}", key, err);
            return;
        }
    };

    if let Err(err) = store.write(key, &content) {
        bot_error!("Failed to write persisted progress for {:?}: {}", key, err);
    }
}
