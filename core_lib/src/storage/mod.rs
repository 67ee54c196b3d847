//! Storage backend abstraction and the shipped implementations.

pub mod backend;
pub mod local;
pub mod memory;
pub mod models;

pub use backend::{StorageBackend, StorageError, StorageResult};
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use models::{DisplayMode, StoredFile};
