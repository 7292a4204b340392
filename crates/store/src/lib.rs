pub mod actor;
pub mod error;
pub mod exchange;
pub mod service;
pub mod state;
pub mod storage;

pub use error::{Result, StoreError};
pub use exchange::ExportDocument;
pub use service::{StoreActor, StoreHandle, StoreRef};
pub use state::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageConfig};
