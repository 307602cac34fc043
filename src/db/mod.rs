pub mod keys;
pub mod store;

pub use keys::StorageKey;
pub use store::{read_json, write_json, FileStore, KeyValueStore, MemoryStore};
