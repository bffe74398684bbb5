//! Unique identifier generation for subjects, topics and exams.

use rand::distributions::Alphanumeric;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

/// Generate a collision-resistant string identifier.
///
/// Prefers a random RFC 4122 v4 UUID. When the OS random source is
/// unavailable this degrades to a millisecond timestamp plus a short
/// alphanumeric suffix instead of failing; the snapshot normalization
/// pass repairs any topic-id collision the weak path might produce.
pub fn create_id() -> String {
    let mut bytes = [0u8; 16];
    if OsRng.try_fill_bytes(&mut bytes).is_ok() {
        return uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string();
    }
    fallback_id()
}

fn fallback_id() -> String {
    let now = chrono::Utc::now();
    // Time-seeded PRNG: the OS entropy source just failed, so don't ask
    // it to seed anything either
    let seed = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_millis()) as u64;
    let suffix: String = StdRng::seed_from_u64(seed)
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}
