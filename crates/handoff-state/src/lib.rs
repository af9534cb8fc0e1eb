//! Persistent session state and on-disk layout for handoff hooks

mod io;
mod paths;
mod project;
mod store;
mod types;

pub use io::{atomic_write, read_json};
pub use paths::Paths;
pub use project::{find_handoff_dir, recent_handoffs, resolve_handoff_dir, ProjectConfig};
pub use store::{state_key, FileStateStore, MemoryStateStore, StateError, StateStore};
pub use types::SessionStateRecord;
