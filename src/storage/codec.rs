//! Snapshot codec: bridges the in-memory study data and the key-value store.
//!
//! Loading never fails: a missing key yields a fresh default snapshot, and
//! a corrupt value is discarded (with a warning) instead of propagating a
//! decode error. Every successfully decoded snapshot goes through a
//! normalization pass before the store sees it.

use std::collections::HashSet;

use crate::storage::kv::{KeyValueStore, Result};
use crate::study::ident;
use crate::study::models::StudyData;

/// Fixed key the snapshot lives under. Kept from earlier releases so
/// previously persisted data keeps loading.
pub const STORAGE_KEY: &str = "studyXP_data";

/// Load the persisted snapshot, falling back to a default one if it is
/// absent, unreadable, or corrupt.
pub fn load_snapshot(store: &dyn KeyValueStore) -> StudyData {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return StudyData::new(),
        Err(e) => {
            log::warn!("Failed to read persisted study data: {}", e);
            return StudyData::new();
        }
    };

    match serde_json::from_slice::<StudyData>(&raw) {
        Ok(data) => normalize(data),
        Err(e) => {
            log::warn!("Discarding corrupt study data snapshot: {}", e);
            StudyData::new()
        }
    }
}

/// Encode the full snapshot and write it under the fixed key.
pub fn save_snapshot(store: &mut dyn KeyValueStore, data: &StudyData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    store.set(STORAGE_KEY, json.as_bytes())
}

/// Repair pass for freshly decoded snapshots.
///
/// Topic ids must be unique within their subject; a duplicate (possible
/// under the weak fallback id scheme) would make one toggle flip several
/// topics at once. Duplicates get a fresh id; titles, done flags and
/// order are left untouched. The once-missing `exams` field is repaired
/// by `#[serde(default)]` on [`StudyData`] at decode time.
fn normalize(mut data: StudyData) -> StudyData {
    for subject in &mut data.subjects {
        let mut seen: HashSet<String> = HashSet::new();
        for topic in &mut subject.topics {
            if !seen.insert(topic.id.clone()) {
                let fresh = ident::create_id();
                log::info!(
                    "Reassigning duplicate topic id {} -> {} in subject {}",
                    topic.id,
                    fresh,
                    subject.id
                );
                seen.insert(fresh.clone());
                topic.id = fresh;
            }
        }
    }
    data
}
