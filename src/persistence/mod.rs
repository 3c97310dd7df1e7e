//! Durable session preferences.
//!
//! Only one fact survives a restart: whether the user explicitly
//! disconnected. While that marker is set, auto-connect stays off.

pub mod store;

use thiserror::Error;

pub use store::{FileMarkerStore, MemoryMarker};

/// Key under which the disconnect marker is stored.
pub const DISCONNECT_KEY: &str = "wallet_disconnected";

/// Value written for a set marker.
pub const DISCONNECT_VALUE: &str = "1";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the "user explicitly disconnected" flag lives.
pub trait DisconnectMarker: Send + Sync {
    fn is_set(&self) -> Result<bool, PersistenceError>;

    fn set(&self) -> Result<(), PersistenceError>;

    fn clear(&self) -> Result<(), PersistenceError>;
}
