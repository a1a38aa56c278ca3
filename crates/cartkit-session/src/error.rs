//! # Session Error Types
//!
//! Error types for session stores and the cart engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionError ← store or codec failure                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError ← also wraps CartError and ConfigError from cartkit-core  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Host maps to its own response type                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cartkit_core::{CartError, ConfigError};
use thiserror::Error;

/// Session store failures.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing medium failed.
    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not a valid cart, or the cart could not be encoded.
    #[error("Session value could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),

    /// The session key cannot be used by this store.
    #[error("Invalid session key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Backend-specific failure reported by a host-provided store.
    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned by [`CartEngine`](crate::CartEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// The cart-level error, if this is one.
    pub fn as_cart(&self) -> Option<&CartError> {
        match self {
            EngineError::Cart(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_cart().is_some_and(CartError::is_not_found)
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
