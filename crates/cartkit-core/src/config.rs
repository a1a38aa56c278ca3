//! # Cart Configuration
//!
//! The read-only configuration a `CartEngine` is built with.
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! session_key = "webAppShoppingCart"
//! price_required = true
//! precision = 2
//!
//! # Only these attributes are snapshotted for `Product`;
//! # every other entity type keeps everything it reports.
//! [model_attributes]
//! Product = ["name", "price", "image"]
//!
//! # `BuyableProduct` is priced from a different attribute.
//! [model_price_field]
//! BuyableProduct = "price_vat_inc"
//! ```
//!
//! Parsing from a string is pure; reading files and environment overrides
//! belong to the host (see `cartkit-cli`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{DEFAULT_PRECISION, DEFAULT_PRICE_FIELD, DEFAULT_SESSION_KEY, MAX_PRECISION};

/// Cart engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Session slot holding the serialized cart.
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// When false, a missing price resolves to 0 instead of failing.
    #[serde(default = "default_true")]
    pub price_required: bool,

    /// Decimal digits used by totals unless a call asks otherwise.
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Entity type → attribute names to snapshot, in order.
    ///
    /// Entity types missing from this map snapshot every attribute.
    #[serde(default)]
    pub model_attributes: BTreeMap<String, Vec<String>>,

    /// Entity type → attribute that supplies the unit price.
    #[serde(default)]
    pub model_price_field: BTreeMap<String, String>,
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            session_key: default_session_key(),
            price_required: true,
            precision: DEFAULT_PRECISION,
            model_attributes: BTreeMap::new(),
            model_price_field: BTreeMap::new(),
        }
    }
}

impl CartConfig {
    /// Creates the default configuration bound to `session_key`.
    pub fn with_session_key(session_key: impl Into<String>) -> Self {
        CartConfig {
            session_key: session_key.into(),
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: CartConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_key.trim().is_empty() {
            return Err(ConfigError::Invalid("session_key must not be empty".into()));
        }

        if self.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "precision must be at most {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }

        for (entity_type, attributes) in &self.model_attributes {
            if entity_type.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "model_attributes contains an empty entity type".into(),
                ));
            }
            if attributes.iter().any(|a| a.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "model_attributes.{} contains an empty attribute name",
                    entity_type
                )));
            }
        }

        for (entity_type, field) in &self.model_price_field {
            if entity_type.trim().is_empty() || field.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "model_price_field entries need a type and a field name".into(),
                ));
            }
        }

        Ok(())
    }

    /// Attribute names to snapshot for `entity_type`, or `None` for "all".
    pub fn attributes_for(&self, entity_type: &str) -> Option<&[String]> {
        self.model_attributes.get(entity_type).map(Vec::as_slice)
    }

    /// Explicitly configured price attribute for `entity_type`.
    pub fn price_field_for(&self, entity_type: &str) -> Option<&str> {
        self.model_price_field.get(entity_type).map(String::as_str)
    }

    /// Price attribute for `entity_type`, falling back to `price`.
    pub fn price_field_or_default(&self, entity_type: &str) -> &str {
        self.price_field_for(entity_type).unwrap_or(DEFAULT_PRICE_FIELD)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
