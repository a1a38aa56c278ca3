//! # cartkit-core: Pure Cart Logic
//!
//! This crate is the **heart** of cartkit. It holds the line item model,
//! the cart collection and all of the arithmetic behind totals and
//! discounts, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        cartkit Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host application / cartkit-cli                  │   │
//! │  │        builds one CartEngine per session interaction           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cartkit-session (CartEngine)                    │   │
//! │  │        hydrate ──► mutate ──► persist (write-through)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartkit-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ collection │  │ validation│  │   │
//! │  │   │ EntityKey │  │ rounding  │  │  LineItem  │  │   rules   │  │   │
//! │  │   │ Attribute │  │ discounts │  │  Summary   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SESSION ACCESS • NO CLOCK READS                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identity and attribute value types
//! - [`buyable`] - The [`Buyable`] capability and [`ManagedRecord`]
//! - [`item`] - [`LineItem`], one cart entry
//! - [`collection`] - [`CartCollection`] and [`CartSummary`]
//! - [`money`] - Decimal rounding for prices and totals
//! - [`config`] - [`CartConfig`], the read-only engine configuration
//! - [`validation`] - Field-level validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cartkit_core::money::round_half_away;
//!
//! // Half away from zero, on the decimal the float prints as
//! assert_eq!(round_half_away(1.005, 2), 1.01);
//! assert_eq!(round_half_away(-2.5, 0), -3.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod buyable;
pub mod collection;
pub mod config;
pub mod error;
pub mod item;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use buyable::{Buyable, ManagedRecord};
pub use collection::{CartCollection, CartSummary};
pub use config::CartConfig;
pub use error::{CartError, CartResult, ConfigError, ValidationError};
pub use item::LineItem;
pub use types::{AttributeValue, Attributes, EntityKey, Identity};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Session slot used when the configuration does not name one.
pub const DEFAULT_SESSION_KEY: &str = "webAppShoppingCart";

/// Attribute read for the unit price when no per-type field is configured.
pub const DEFAULT_PRICE_FIELD: &str = "price";

/// Decimal digits used for totals unless the caller asks otherwise.
pub const DEFAULT_PRECISION: u32 = 2;

/// Upper bound for any rounding precision.
///
/// f64 carries roughly 15-17 significant digits; beyond 10 fractional
/// digits rounding stops meaning anything for currency amounts.
pub const MAX_PRECISION: u32 = 10;

/// Highest accepted cart discount, in percent.
pub const MAX_DISCOUNT_PERCENT: i64 = 100;

/// Keys owned by dedicated [`LineItem`] fields.
///
/// These never land in the attribute bag and cannot be written through
/// [`LineItem::set_attribute`].
pub const RESERVED_KEYS: [&str; 4] = ["identity", "entityType", "quantity", "price"];

/// Returns true if `key` is one of [`RESERVED_KEYS`].
#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}
