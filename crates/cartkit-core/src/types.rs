//! # Domain Types
//!
//! Identity and attribute value types shared by every cart component.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   EntityKey     │   │ AttributeValue  │   │    Identity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Int(22)        │   │  Null           │   │  entity_type    │       │
//! │  │  Text("sku-1")  │   │  Bool / Int     │   │  key            │       │
//! │  └─────────────────┘   │  Float / Text   │   │  "Product#22"   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both value enums serialize untagged, so the session payload reads as
//! plain JSON scalars (`22`, `"sku-1"`, `4.5`, `null`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Entity Key
// =============================================================================

/// The primary key a buyable entity reports: an integer or a string.
///
/// Equality is strict. `22` and `"22"` name different entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Int(n) => write!(f, "{}", n),
            EntityKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(n: i64) -> Self {
        EntityKey::Int(n)
    }
}

impl From<i32> for EntityKey {
    fn from(n: i32) -> Self {
        EntityKey::Int(n as i64)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        EntityKey::Text(s.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        EntityKey::Text(s)
    }
}

impl From<EntityKey> for AttributeValue {
    fn from(key: EntityKey) -> Self {
        match key {
            EntityKey::Int(n) => AttributeValue::Int(n),
            EntityKey::Text(s) => AttributeValue::Text(s),
        }
    }
}

// =============================================================================
// Attribute Value
// =============================================================================

/// A scalar attribute snapshotted from an entity or passed as an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Attribute bag, sorted by key so the serialized form is stable.
pub type Attributes = BTreeMap<String, AttributeValue>;

impl AttributeValue {
    /// Numeric view of the value. Text is never coerced.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(n) => Some(*n as f64),
            AttributeValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Replaces NaN and infinities with `Null`.
    ///
    /// JSON has no encoding for them, so the bag only ever holds values
    /// that read back unchanged from the session.
    pub fn into_storable(self) -> Self {
        match self {
            AttributeValue::Float(x) if !x.is_finite() => AttributeValue::Null,
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Interprets the value as a primary key.
    ///
    /// Integers and non-empty strings qualify; everything else does not.
    pub fn as_key(&self) -> Option<EntityKey> {
        match self {
            AttributeValue::Int(n) => Some(EntityKey::Int(*n)),
            AttributeValue::Text(s) if !s.trim().is_empty() => Some(EntityKey::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => f.write_str("null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(n) => write!(f, "{}", n),
            AttributeValue::Float(x) => write!(f, "{}", x),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Int(n)
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        AttributeValue::Int(n as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        AttributeValue::Float(x)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeValue::Null, Into::into)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The `(entity_type, key)` pair that names one line item.
///
/// Displayed as `Type#key`, e.g. `Product#22`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub entity_type: String,
    pub key: EntityKey,
}

impl Identity {
    pub fn new(entity_type: impl Into<String>, key: impl Into<EntityKey>) -> Self {
        Identity {
            entity_type: entity_type.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity_type, self.key)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
