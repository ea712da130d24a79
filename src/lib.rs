pub mod cli;
pub mod config;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod form;
pub mod search;
pub mod storage;

pub use config::BlogdeskConfig;
pub use entity::{BlogFields, BlogPatch, BlogRecord, BlogStatus, Category};
pub use error::{BlogdeskError, Result};
pub use storage::{BlogStore, FileStorage, LoadReport, MemoryStorage, Storage, StoreOptions};
