//! # Buyable Capability
//!
//! Anything that can sit in a cart implements [`Buyable`].
//!
//! ## Two Recognized Forms
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     What the engine accepts                            │
//! │                                                                         │
//! │  1. Domain types implementing Buyable directly                         │
//! │     struct Ticket { .. }  impl Buyable for Ticket { .. }               │
//! │                                                                         │
//! │  2. ManagedRecord: a generic attribute record with a primary key       │
//! │     ManagedRecord::new("Product").with("id", 22).with("price", 500)    │
//! │                                                                         │
//! │  Either way the engine sees the same capability:                       │
//! │    entity_type() ──► discriminator ("Product")                        │
//! │    identity()    ──► EntityKey, or None if the record has no key       │
//! │    attributes()  ──► everything the entity can report                  │
//! │    price()       ──► optional direct price                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The type system keeps non-buyable values out entirely; what is left to
//! check at runtime (missing key, blank type name) is reported as
//! [`CartError::InvalidEntity`].

use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};
use crate::types::{AttributeValue, Attributes, EntityKey, Identity};
use crate::validation::validate_required;

/// Attribute a [`ManagedRecord`] reads its identity from by default.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

// =============================================================================
// Buyable Trait
// =============================================================================

/// A domain object that can be represented as a cart line item.
pub trait Buyable {
    /// Discriminator naming the kind of entity.
    ///
    /// Defaults to the fully-qualified Rust type name. Override it when the
    /// configuration refers to entity types by a shorter name.
    fn entity_type(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// The entity's primary key, or `None` if it has not been assigned one.
    fn identity(&self) -> Option<EntityKey>;

    /// Every attribute the entity can report.
    fn attributes(&self) -> Attributes;

    /// Direct unit price.
    ///
    /// Consulted only when no price attribute is configured for the type.
    fn price(&self) -> Option<f64> {
        None
    }
}

/// Resolves and checks the identity of `entity`.
///
/// ## Failure Modes
/// - blank entity type → `InvalidEntity`
/// - no identity → `InvalidEntity`
/// - blank string key → `InvalidEntity`
pub fn identity_of<E: Buyable + ?Sized>(entity: &E) -> CartResult<Identity> {
    let entity_type = entity.entity_type();
    validate_required("entity type", &entity_type)
        .map_err(|e| CartError::invalid_entity(&entity_type, e.to_string()))?;

    let key = entity.identity().ok_or_else(|| {
        CartError::invalid_entity(
            &entity_type,
            "entity has no identity; it needs an 'id' or primary key attribute",
        )
    })?;

    if let EntityKey::Text(ref s) = key {
        validate_required("identity", s)
            .map_err(|e| CartError::invalid_entity(&entity_type, e.to_string()))?;
    }

    Ok(Identity { entity_type, key })
}

// =============================================================================
// Managed Record
// =============================================================================

/// A generic attribute record that is buyable through its primary key.
///
/// ## Example
/// ```rust
/// use cartkit_core::{Buyable, EntityKey, ManagedRecord};
///
/// let product = ManagedRecord::new("Product")
///     .with("id", 22)
///     .with("name", "Product name")
///     .with("price", 500);
///
/// assert_eq!(product.identity(), Some(EntityKey::Int(22)));
/// assert_eq!(product.entity_type(), "Product");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedRecord {
    entity_type: String,
    primary_key: String,
    attributes: Attributes,
}

impl ManagedRecord {
    /// Creates an empty record keyed by `id`.
    pub fn new(entity_type: impl Into<String>) -> Self {
        ManagedRecord {
            entity_type: entity_type.into(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            attributes: Attributes::new(),
        }
    }

    /// Reads the identity from `primary_key` instead of `id`.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

impl Buyable for ManagedRecord {
    fn entity_type(&self) -> String {
        self.entity_type.clone()
    }

    fn identity(&self) -> Option<EntityKey> {
        self.attributes
            .get(&self.primary_key)
            .and_then(AttributeValue::as_key)
    }

    fn attributes(&self) -> Attributes {
        self.attributes.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
