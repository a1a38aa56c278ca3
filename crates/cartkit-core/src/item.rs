//! # Line Item
//!
//! One cart entry: identity, quantity, unit price and an attribute bag.
//!
//! ## Two-Tier Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItem                                                               │
//! │                                                                         │
//! │  Fixed fields (dedicated accessors only)                               │
//! │  ├── identity     22                                                   │
//! │  ├── entityType   "Product"                                            │
//! │  ├── quantity     2                                                    │
//! │  └── price        500.0                                                │
//! │                                                                         │
//! │  Attribute bag (set_attribute / options)                               │
//! │  ├── name         "Product name"                                       │
//! │  └── image        "storage/cart"                                       │
//! │                                                                         │
//! │  get("price") → fixed field    get("name") → bag    get("x") → None    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Attributes and price are copied from the entity when the item is
//! created, so the cart keeps showing what the customer added even if the
//! entity changes afterwards. `refresh_from` re-reads them on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::buyable::Buyable;
use crate::config::CartConfig;
use crate::error::{CartError, CartResult};
use crate::types::{AttributeValue, Attributes, EntityKey, Identity};
use crate::validation::validate_price;
use crate::is_reserved_key;

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    #[ts(type = "string | number")]
    identity: EntityKey,

    entity_type: String,

    #[ts(type = "number")]
    quantity: i64,

    /// Unit price, frozen when the item was added.
    price: f64,

    #[serde(default)]
    #[ts(type = "Record<string, string | number | boolean | null>")]
    attributes: Attributes,

    /// When this item entered the cart.
    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates an item with an empty attribute bag.
    pub fn new(identity: Identity, price: f64, quantity: i64, added_at: DateTime<Utc>) -> Self {
        LineItem {
            identity: identity.key,
            entity_type: identity.entity_type,
            quantity,
            price,
            attributes: Attributes::new(),
            added_at,
        }
    }

    /// Snapshots `entity` into a new item.
    ///
    /// ## Steps
    /// 1. Resolve the unit price (see [`resolve_price`])
    /// 2. Copy attributes per `config.model_attributes`
    /// 3. Drop reserved keys from the copy
    pub fn snapshot<E: Buyable + ?Sized>(
        entity: &E,
        identity: Identity,
        quantity: i64,
        config: &CartConfig,
        added_at: DateTime<Utc>,
    ) -> CartResult<Self> {
        let reported = entity.attributes();
        let price = resolve_price(entity, &identity.entity_type, &reported, config)?;
        let attributes = snapshot_attributes(reported, &identity.entity_type, config);

        let mut item = LineItem::new(identity, price, quantity, added_at);
        item.attributes = attributes;
        Ok(item)
    }

    /// Re-reads price and tracked attributes from `entity`.
    ///
    /// Only keys already in the bag are refreshed; keys the entity no
    /// longer reports keep their snapshot value. Fails without changing
    /// anything if the price can no longer be resolved.
    pub fn refresh_from<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        config: &CartConfig,
    ) -> CartResult<()> {
        let reported = entity.attributes();
        let price = resolve_price(entity, &self.entity_type, &reported, config)?;

        self.price = price;
        for (key, value) in self.attributes.iter_mut() {
            if let Some(fresh) = reported.get(key) {
                *value = fresh.clone().into_storable();
            }
        }
        Ok(())
    }

    // =========================================================================
    // Fixed Fields
    // =========================================================================

    pub fn key(&self) -> &EntityKey {
        &self.identity
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn identity(&self) -> Identity {
        Identity {
            entity_type: self.entity_type.clone(),
            key: self.identity.clone(),
        }
    }

    /// True if this item represents `identity`.
    pub fn matches(&self, identity: &Identity) -> bool {
        self.entity_type == identity.entity_type && self.identity == identity.key
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Unit price × quantity, unrounded.
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    // =========================================================================
    // Attribute Bag
    // =========================================================================

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Reads from the attribute bag only.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Reads any key: reserved keys resolve to their fixed fields.
    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        match key {
            "identity" => Some(self.identity.clone().into()),
            "entityType" => Some(AttributeValue::Text(self.entity_type.clone())),
            "quantity" => Some(AttributeValue::Int(self.quantity)),
            "price" => Some(AttributeValue::Float(self.price)),
            _ => self.attributes.get(key).cloned(),
        }
    }

    /// Writes to the attribute bag.
    ///
    /// Reserved keys fail with [`CartError::ReservedAttribute`]; they only
    /// change through their dedicated setters.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> CartResult<()> {
        let key = key.into();
        check_attribute_key(&key)?;
        self.attributes.insert(key, value.into().into_storable());
        Ok(())
    }

    /// Applies caller options on top of the snapshot. All-or-nothing.
    pub fn apply_options(&mut self, options: &Attributes) -> CartResult<()> {
        check_options(options)?;
        for (key, value) in options {
            self.attributes
                .insert(key.clone(), value.clone().into_storable());
        }
        Ok(())
    }
}

// =============================================================================
// Snapshot Helpers
// =============================================================================

/// Rejects reserved keys.
pub fn check_attribute_key(key: &str) -> CartResult<()> {
    if is_reserved_key(key) {
        return Err(CartError::ReservedAttribute {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Rejects an options map containing any reserved key.
pub fn check_options(options: &Attributes) -> CartResult<()> {
    options.keys().try_for_each(|key| check_attribute_key(key))
}

/// Resolves the unit price of `entity`.
///
/// ## Lookup Order
/// ```text
/// model_price_field[entity_type] configured?
///      ├── yes → that attribute
///      └── no  → entity.price() ──► else attribute "price"
///
/// found (and not null) → must be numeric, finite, >= 0   else InvalidEntity
/// missing              → InvalidEntity if price_required, else 0.0
/// ```
pub fn resolve_price<E: Buyable + ?Sized>(
    entity: &E,
    entity_type: &str,
    reported: &Attributes,
    config: &CartConfig,
) -> CartResult<f64> {
    let field = config.price_field_or_default(entity_type);

    let raw = match config.price_field_for(entity_type) {
        Some(_) => reported.get(field).cloned(),
        None => entity
            .price()
            .map(AttributeValue::Float)
            .or_else(|| reported.get(field).cloned()),
    };

    match raw {
        Some(value) if !value.is_null() => validate_price(&value)
            .map_err(|e| CartError::invalid_entity(entity_type, e.to_string())),
        _ if config.price_required => Err(CartError::invalid_entity(
            entity_type,
            format!("missing required price attribute '{}'", field),
        )),
        _ => Ok(0.0),
    }
}

/// Applies the `model_attributes` policy to a reported attribute map.
///
/// Listed attributes the entity does not report are stored as `Null`, so
/// they are still tracked by later refreshes. Non-finite floats are stored
/// as `Null` too.
pub fn snapshot_attributes(
    reported: Attributes,
    entity_type: &str,
    config: &CartConfig,
) -> Attributes {
    match config.attributes_for(entity_type) {
        Some(names) => names
            .iter()
            .filter(|name| !is_reserved_key(name))
            .map(|name| {
                let value = reported.get(name).cloned().unwrap_or(AttributeValue::Null);
                (name.clone(), value.into_storable())
            })
            .collect(),
        None => reported
            .into_iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key, value.into_storable()))
            .collect(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buyable::ManagedRecord;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn product() -> ManagedRecord {
        ManagedRecord::new("Product")
            .with("id", 22)
            .with("name", "Product name")
            .with("price", 500)
            .with("image", "storage/cart")
            .with("vendor", "Vendor name")
    }

    fn restricted_config() -> CartConfig {
        let mut config = CartConfig::default();
        config.model_attributes.insert(
            "Product".into(),
            vec!["name".into(), "price".into(), "image".into()],
        );
        config
    }

    fn snapshot(entity: &ManagedRecord, config: &CartConfig) -> CartResult<LineItem> {
        LineItem::snapshot(entity, Identity::new("Product", 22), 1, config, at())
    }

    #[test]
    fn test_snapshot_all_attributes_when_unconfigured() {
        let item = snapshot(&product(), &CartConfig::default()).unwrap();

        assert_eq!(item.price(), 500.0);
        assert_eq!(item.attribute("vendor"), Some(&AttributeValue::from("Vendor name")));
        assert_eq!(item.attribute("id"), Some(&AttributeValue::Int(22)));
        // Reserved keys never enter the bag
        assert_eq!(item.attribute("price"), None);
    }

    #[test]
    fn test_snapshot_only_listed_attributes() {
        let item = snapshot(&product(), &restricted_config()).unwrap();

        assert_eq!(item.attribute("name"), Some(&AttributeValue::from("Product name")));
        assert_eq!(item.attribute("image"), Some(&AttributeValue::from("storage/cart")));
        assert_eq!(item.attribute("vendor"), None);
        assert_eq!(item.attributes().len(), 2);
    }

    #[test]
    fn test_listed_but_missing_attribute_is_null() {
        let mut config = CartConfig::default();
        config
            .model_attributes
            .insert("Product".into(), vec!["colour".into()]);

        let item = snapshot(&product(), &config).unwrap();
        assert_eq!(item.attribute("colour"), Some(&AttributeValue::Null));
    }

    #[test]
    fn test_non_finite_attributes_stored_as_null() {
        let entity = product()
            .with("weight", f64::NAN)
            .with("depth", f64::INFINITY);
        let mut item = snapshot(&entity, &CartConfig::default()).unwrap();

        assert_eq!(item.attribute("weight"), Some(&AttributeValue::Null));
        assert_eq!(item.attribute("depth"), Some(&AttributeValue::Null));

        item.set_attribute("ratio", f64::NEG_INFINITY).unwrap();
        let options = Attributes::from([("scale".to_string(), AttributeValue::Float(f64::NAN))]);
        item.apply_options(&options).unwrap();
        assert_eq!(item.attribute("ratio"), Some(&AttributeValue::Null));
        assert_eq!(item.attribute("scale"), Some(&AttributeValue::Null));

        // Reading the serialized item back yields the same item
        let json = serde_json::to_string(&item).unwrap();
        let decoded: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_configured_price_field() {
        let mut config = CartConfig::default();
        config
            .model_price_field
            .insert("Product".into(), "price_vat_inc".into());

        let entity = product().with("price_vat_inc", 605.0);
        let item = snapshot(&entity, &config).unwrap();
        assert_eq!(item.price(), 605.0);
    }

    #[test]
    fn test_missing_price_required() {
        let entity = ManagedRecord::new("Product").with("id", 22);
        let err = snapshot(&entity, &CartConfig::default()).unwrap_err();
        assert!(matches!(err, CartError::InvalidEntity { .. }));
        assert!(err.to_string().contains("missing required price attribute 'price'"));
    }

    #[test]
    fn test_missing_price_optional_defaults_to_zero() {
        let config = CartConfig {
            price_required: false,
            ..CartConfig::default()
        };
        let entity = ManagedRecord::new("Product").with("id", 22);
        let item = snapshot(&entity, &config).unwrap();
        assert_eq!(item.price(), 0.0);
        assert_eq!(item.line_total(), 0.0);
    }

    #[test]
    fn test_invalid_price_rejected_even_when_optional() {
        let config = CartConfig {
            price_required: false,
            ..CartConfig::default()
        };
        let entity = product().with("price", "five hundred");
        assert!(matches!(
            snapshot(&entity, &config),
            Err(CartError::InvalidEntity { .. })
        ));
    }

    #[test]
    fn test_get_resolves_reserved_keys() {
        let mut item = snapshot(&product(), &restricted_config()).unwrap();
        item.set_quantity(3);

        assert_eq!(item.get("identity"), Some(AttributeValue::Int(22)));
        assert_eq!(item.get("entityType"), Some(AttributeValue::from("Product")));
        assert_eq!(item.get("quantity"), Some(AttributeValue::Int(3)));
        assert_eq!(item.get("price"), Some(AttributeValue::Float(500.0)));
        assert_eq!(item.get("name"), Some(AttributeValue::from("Product name")));
        assert_eq!(item.get("nope"), None);
        assert_eq!(item.line_total(), 1500.0);
    }

    #[test]
    fn test_set_attribute_rejects_reserved() {
        let mut item = LineItem::new(Identity::new("Product", 1), 1.0, 1, at());

        for key in crate::RESERVED_KEYS {
            assert!(matches!(
                item.set_attribute(key, 5),
                Err(CartError::ReservedAttribute { .. })
            ));
        }
        item.set_attribute("colour", "red").unwrap();
        assert_eq!(item.attribute("colour"), Some(&AttributeValue::from("red")));
    }

    #[test]
    fn test_apply_options_is_all_or_nothing() {
        let mut item = LineItem::new(Identity::new("Product", 1), 1.0, 1, at());
        let mut options = Attributes::new();
        options.insert("colour".into(), "red".into());
        options.insert("quantity".into(), 9.into());

        assert!(item.apply_options(&options).is_err());
        assert!(item.attributes().is_empty());
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_refresh_updates_tracked_keys_only() {
        let mut item = snapshot(&product(), &restricted_config()).unwrap();

        let changed = product()
            .with("name", "Renamed")
            .with("price", 450)
            .with("vendor", "Other vendor");
        item.refresh_from(&changed, &restricted_config()).unwrap();

        assert_eq!(item.attribute("name"), Some(&AttributeValue::from("Renamed")));
        assert_eq!(item.attribute("vendor"), None);
        assert_eq!(item.price(), 450.0);
    }

    #[test]
    fn test_refresh_keeps_state_when_price_breaks() {
        let mut item = snapshot(&product(), &restricted_config()).unwrap();
        let before = item.clone();

        let broken = ManagedRecord::new("Product")
            .with("id", 22)
            .with("name", "Renamed");
        assert!(item.refresh_from(&broken, &restricted_config()).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn test_serialized_shape() {
        let item = snapshot(&product(), &restricted_config()).unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["identity"], 22);
        assert_eq!(json["entityType"], "Product");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["price"], 500.0);
        assert_eq!(json["attributes"]["name"], "Product name");
        assert!(json["addedAt"].is_string());
    }
}
