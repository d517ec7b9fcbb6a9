//! Local key-value persistence for the score counters.

mod error;
mod kv;
mod score;

pub use error::StorageError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use score::{SCORE_O_KEY, SCORE_X_KEY, Score, ScoreStore};
