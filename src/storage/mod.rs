//! Snapshot persistence: key-value port, backends, and the JSON codec.

pub mod codec;
mod kv;

pub use kv::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
