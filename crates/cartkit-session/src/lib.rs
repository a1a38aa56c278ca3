//! # cartkit-session: Session Persistence for Carts
//!
//! Binds the pure cart model from `cartkit-core` to a key-value session
//! store and exposes the cart operations a host application calls.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One session interaction                              │
//! │                                                                         │
//! │  CartEngine::new(config, store)                                        │
//! │       │  store.get(session_key) ──► decode ──► sanitize                │
//! │       ▼                                                                 │
//! │  engine.add / update / remove / add_quantity / set_discount ...        │
//! │       │  validate ──► mutate in memory ──► encode ──► store.put        │
//! │       │  (put failed? in-memory cart is rolled back)                   │
//! │       ▼                                                                 │
//! │  engine.summary() / engine.total() ...   (read only)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The [`SessionStore`] contract and [`MemorySessionStore`]
//! - [`file`] - [`FileSessionStore`], one JSON file per session slot
//! - [`codec`] - Encoding of the cart into the stored string
//! - [`engine`] - [`CartEngine`], the public cart API
//! - [`error`] - Store and engine error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cartkit_core::{CartConfig, ManagedRecord};
//! use cartkit_session::{CartEngine, MemorySessionStore};
//!
//! let mut store = MemorySessionStore::new();
//! let mut cart = CartEngine::new(CartConfig::default(), &mut store).unwrap();
//!
//! let product = ManagedRecord::new("Product").with("id", 22).with("price", 500);
//! cart.add(&product, 2).unwrap();
//!
//! assert_eq!(cart.count(), 1);
//! assert_eq!(cart.sub_total(), 1000.0);
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod file;
pub mod store;

pub use engine::CartEngine;
pub use error::{EngineError, EngineResult, SessionError, SessionResult};
pub use file::FileSessionStore;
pub use store::{MemorySessionStore, SessionStore};
