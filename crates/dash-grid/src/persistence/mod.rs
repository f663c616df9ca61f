//! Persistence module
//!
//! - `storage`: the key-value store abstraction and an in-memory store
//! - `document`: persisted and exported JSON documents, tolerant decoding
//! - `scheduler`: the debounced save timer

mod document;
mod scheduler;
mod storage;

pub use document::{decode_state, parse_document, LayoutExport, PersistedState, MAX_LAYOUT_ROWS};
pub use scheduler::PersistScheduler;
pub use storage::{MemoryStorage, Storage};
