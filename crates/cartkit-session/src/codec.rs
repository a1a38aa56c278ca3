//! # Session Codec
//!
//! The cart is stored as one JSON document per session slot:
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "identity": 22,
//!       "entityType": "Product",
//!       "quantity": 2,
//!       "price": 500.0,
//!       "attributes": { "name": "Chair" },
//!       "addedAt": "2026-10-18T09:30:00Z"
//!     }
//!   ],
//!   "discount": 10
//! }
//! ```
//!
//! Missing `discount` or `attributes` decode to their defaults, so values
//! written by older hosts still load.

use cartkit_core::CartCollection;

use crate::error::SessionResult;

/// Serializes the cart for [`SessionStore::put`](crate::SessionStore::put).
pub fn encode(cart: &CartCollection) -> SessionResult<String> {
    Ok(serde_json::to_string(cart)?)
}

/// Parses a stored value. Does not sanitize; see [`CartCollection::sanitize`].
pub fn decode(raw: &str) -> SessionResult<CartCollection> {
    Ok(serde_json::from_str(raw)?)
}
