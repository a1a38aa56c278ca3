//! # Error Types
//!
//! Domain-specific error types for cartkit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartkit-core errors (this file)                                       │
//! │  ├── CartError        - Cart operation failures                        │
//! │  ├── ValidationError  - Field-level input failures (used as sources)   │
//! │  └── ConfigError      - Invalid or unparsable configuration            │
//! │                                                                         │
//! │  cartkit-session errors (separate crate)                               │
//! │  ├── SessionError     - Store and codec failures                       │
//! │  └── EngineError      - What engine callers see                        │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → EngineError → host                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the identity in error messages (type + key)
//! 3. Errors are enum variants, never String
//! 4. Every failure is terminal for the single operation

use thiserror::Error;

use crate::types::Identity;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart operation errors.
///
/// Each variant is raised before the collection is touched, so an error
/// never leaves a half-applied change behind.
#[derive(Debug, Error)]
pub enum CartError {
    /// The value does not satisfy the [`Buyable`](crate::Buyable) capability.
    ///
    /// ## When This Occurs
    /// - The entity reports no identity (no primary key)
    /// - The entity type name is empty
    /// - A required price is missing, negative or not numeric
    #[error("Invalid buyable entity '{entity_type}': {reason}")]
    InvalidEntity { entity_type: String, reason: String },

    /// A positive quantity was required.
    ///
    /// ## User Workflow
    /// ```text
    /// add_quantity(product, 0)
    ///      │
    ///      ▼
    /// validate_quantity(0) → MustBePositive
    ///      │
    ///      ▼
    /// InvalidQuantity { identity: "Product#22", quantity: 0 }
    /// ```
    #[error("Invalid cart quantity '{quantity}' for {identity}: {source}")]
    InvalidQuantity {
        identity: Identity,
        quantity: i64,
        #[source]
        source: ValidationError,
    },

    /// Discount percent outside [0, 100].
    #[error("Invalid discount '{percent}': {source}")]
    InvalidDiscount {
        percent: i64,
        #[source]
        source: ValidationError,
    },

    /// The entity is already in the cart.
    #[error("Cart item {identity} already exists")]
    DuplicateEntity { identity: Identity },

    /// The entity is not in the cart.
    #[error("Cart item {identity} not found")]
    ItemNotFound { identity: Identity },

    /// Attempt to write a reserved key through the attribute bag.
    #[error("Attribute '{key}' is reserved and cannot be set directly")]
    ReservedAttribute { key: String },
}

impl CartError {
    /// Creates an InvalidEntity error.
    pub fn invalid_entity(entity_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CartError::InvalidEntity {
            entity_type: entity_type.into(),
            reason: reason.into(),
        }
    }

    /// True for the "not in the cart" case, which hosts often map to a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CartError::ItemNotFound { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the helpers in [`crate::validation`] and carried as the
/// `source` of the richer [`CartError`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. a text price, a NaN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Failed to parse cart config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but breaks a rule.
    #[error("Invalid cart config: {0}")]
    Invalid(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
