//! # Validation Module
//!
//! Field-level validation rules for cart operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Type system                                                  │
//! │  └── Only `Buyable` values reach the engine at all                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity > 0                                                      │
//! │  ├── 0 <= discount <= 100                                              │
//! │  └── price finite, numeric, >= 0                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CartEngine                                                   │
//! │  └── Wraps failures with identity context (CartError)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule runs before any mutation, which is what keeps failed
//! operations free of side effects.

use crate::error::ValidationError;
use crate::types::AttributeValue;
use crate::MAX_DISCOUNT_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use cartkit_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount percent and narrows it to `u8`.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_discount(percent: i64) -> ValidationResult<u8> {
    if !(0..=MAX_DISCOUNT_PERCENT).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: MAX_DISCOUNT_PERCENT,
        });
    }

    Ok(percent as u8)
}

/// Validates a unit price read from an entity attribute.
///
/// ## Rules
/// - Must be an integer or a float (text is never parsed)
/// - Must be finite
/// - Must be non-negative (zero is allowed: free items)
///
/// ## Example
/// ```rust
/// use cartkit_core::validation::validate_price;
/// use cartkit_core::AttributeValue;
///
/// assert_eq!(validate_price(&AttributeValue::Int(500)), Ok(500.0));
/// assert!(validate_price(&AttributeValue::from("500")).is_err());
/// assert!(validate_price(&AttributeValue::Float(-1.0)).is_err());
/// ```
pub fn validate_price(value: &AttributeValue) -> ValidationResult<f64> {
    let price = value.as_f64().ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: format!("expected a number, got '{}'", value),
    })?;

    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(price)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a name-like field is not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
