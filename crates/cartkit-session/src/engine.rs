//! # Cart Engine
//!
//! The cart API a host calls during one session interaction.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every mutating operation                             │
//! │                                                                         │
//! │  identity_of(entity) ──► InvalidEntity                                  │
//! │       │                                                                 │
//! │  validate quantity / existence / options ──► CartError                  │
//! │       │                                                                 │
//! │  previous = cart.clone()                                                │
//! │       │                                                                 │
//! │  mutate cart in memory                                                  │
//! │       │                                                                 │
//! │  encode ──► store.put(session_key)                                      │
//! │       │          │                                                      │
//! │       │          └── failed → cart = previous, return SessionError      │
//! │       ▼                                                                 │
//! │  return a copy of the affected LineItem                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns its store. Hosts that keep the store elsewhere lend it
//! with `CartEngine::new(config, &mut store)`.

use cartkit_core::buyable::identity_of;
use cartkit_core::item::check_options;
use cartkit_core::validation::validate_quantity;
use cartkit_core::{
    Attributes, Buyable, CartCollection, CartConfig, CartError, CartResult, CartSummary, Identity,
    LineItem,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{EngineResult, SessionResult};
use crate::store::SessionStore;

/// Session-backed shopping cart.
#[derive(Debug)]
pub struct CartEngine<S: SessionStore> {
    config: CartConfig,
    store: S,
    cart: CartCollection,
}

impl<S: SessionStore> CartEngine<S> {
    /// Validates `config` and hydrates the cart from `store`.
    ///
    /// An absent slot yields an empty cart. A stored value that does not
    /// decode fails with [`SessionError::Codec`](crate::SessionError::Codec).
    /// Items that break the collection invariants (non-positive quantity,
    /// duplicate identity) are dropped with a warning.
    pub fn new(config: CartConfig, store: S) -> EngineResult<Self> {
        config.validate()?;

        let cart = match store.get(&config.session_key)? {
            Some(raw) => {
                let mut cart = codec::decode(&raw)?;
                let report = cart.sanitize();
                if !report.is_clean() {
                    warn!(
                        session_key = %config.session_key,
                        dropped_items = report.dropped_items,
                        discount_clamped = report.discount_clamped,
                        "Stored cart contained invalid entries"
                    );
                }
                cart
            }
            None => CartCollection::new(),
        };

        info!(
            session_key = %config.session_key,
            items = cart.len(),
            discount = cart.discount(),
            "Cart hydrated"
        );

        Ok(Self {
            config,
            store,
            cart,
        })
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Adds `entity` with `quantity`.
    ///
    /// ## Errors
    /// - `InvalidEntity`: no identity, or the price cannot be resolved
    /// - `InvalidQuantity`: `quantity <= 0`
    /// - `DuplicateEntity`: already in the cart (use [`Self::add_quantity`])
    pub fn add<E: Buyable + ?Sized>(&mut self, entity: &E, quantity: i64) -> EngineResult<LineItem> {
        self.add_with_options(entity, quantity, &Attributes::new())
    }

    /// Adds `entity`, then writes `options` over the snapshotted attributes.
    ///
    /// A reserved option key fails with `ReservedAttribute` and nothing is
    /// added.
    pub fn add_with_options<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        quantity: i64,
        options: &Attributes,
    ) -> EngineResult<LineItem> {
        let identity = identity_of(entity)?;
        debug!(%identity, quantity, options = options.len(), "Adding item to cart");

        check_quantity(&identity, quantity)?;
        if self.cart.contains(&identity) {
            return Err(CartError::DuplicateEntity { identity }.into());
        }
        check_options(options)?;

        let mut item = LineItem::snapshot(entity, identity, quantity, &self.config, Utc::now())?;
        item.apply_options(options)?;

        let previous = self.cart.clone();
        self.cart.push(item.clone())?;
        self.commit(previous)?;
        Ok(item)
    }

    /// Refreshes an existing item from `entity`.
    ///
    /// `None` leaves the quantity alone. Tracked attributes and the price
    /// are re-read from the entity.
    pub fn update<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        quantity: Option<i64>,
    ) -> EngineResult<LineItem> {
        self.update_with_options(entity, quantity, &Attributes::new())
    }

    pub fn update_with_options<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        quantity: Option<i64>,
        options: &Attributes,
    ) -> EngineResult<LineItem> {
        let identity = identity_of(entity)?;
        debug!(%identity, ?quantity, options = options.len(), "Updating cart item");

        self.require(&identity)?;
        if let Some(quantity) = quantity {
            check_quantity(&identity, quantity)?;
        }
        check_options(options)?;

        let previous = self.cart.clone();
        let updated = {
            let item = self
                .cart
                .find_mut(&identity)
                .ok_or_else(|| not_found(&identity))?;
            // refresh_from leaves the item untouched when it fails
            item.refresh_from(entity, &self.config)?;
            item.apply_options(options)?;
            if let Some(quantity) = quantity {
                item.set_quantity(quantity);
            }
            item.clone()
        };

        self.commit(previous)?;
        Ok(updated)
    }

    /// Removes `entity` from the cart.
    pub fn remove<E: Buyable + ?Sized>(&mut self, entity: &E) -> EngineResult<bool> {
        let identity = identity_of(entity)?;
        debug!(%identity, "Removing item from cart");

        self.require(&identity)?;
        let previous = self.cart.clone();
        self.cart.remove(&identity)?;
        self.commit(previous)?;
        Ok(true)
    }

    /// Increases the quantity of an existing item.
    pub fn add_quantity<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        quantity: i64,
    ) -> EngineResult<LineItem> {
        let identity = identity_of(entity)?;
        debug!(%identity, quantity, "Increasing item quantity");

        check_quantity(&identity, quantity)?;
        self.require(&identity)?;

        let previous = self.cart.clone();
        let updated = {
            let item = self
                .cart
                .find_mut(&identity)
                .ok_or_else(|| not_found(&identity))?;
            item.set_quantity(item.quantity().saturating_add(quantity));
            item.clone()
        };

        self.commit(previous)?;
        Ok(updated)
    }

    /// Decreases the quantity of an existing item.
    ///
    /// Reaching zero (or below) removes the item; the detached item is
    /// returned with quantity 0.
    pub fn remove_quantity<E: Buyable + ?Sized>(
        &mut self,
        entity: &E,
        quantity: i64,
    ) -> EngineResult<LineItem> {
        let identity = identity_of(entity)?;
        debug!(%identity, quantity, "Decreasing item quantity");

        check_quantity(&identity, quantity)?;
        self.require(&identity)?;

        let previous = self.cart.clone();
        let remaining = self
            .cart
            .find(&identity)
            .map(|item| item.quantity() - quantity)
            .ok_or_else(|| not_found(&identity))?;

        let result = if remaining <= 0 {
            let mut detached = self.cart.remove(&identity)?;
            detached.set_quantity(0);
            detached
        } else {
            let item = self
                .cart
                .find_mut(&identity)
                .ok_or_else(|| not_found(&identity))?;
            item.set_quantity(remaining);
            item.clone()
        };

        self.commit(previous)?;
        Ok(result)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The item for `entity`, if it is in the cart.
    pub fn find<E: Buyable + ?Sized>(&self, entity: &E) -> EngineResult<Option<&LineItem>> {
        let identity = identity_of(entity)?;
        Ok(self.cart.find(&identity))
    }

    /// Whether `entity` is in the cart. Invalid entities report `false`.
    pub fn item_exists<E: Buyable + ?Sized>(&self, entity: &E) -> bool {
        match identity_of(entity) {
            Ok(identity) => self.cart.contains(&identity),
            Err(err) => {
                warn!(error = %err, "item_exists called with an invalid entity");
                false
            }
        }
    }

    pub fn get(&self) -> &CartCollection {
        &self.cart
    }

    /// Number of distinct items.
    pub fn count(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.cart.total_quantity()
    }

    // =========================================================================
    // Totals & Discount
    // =========================================================================

    pub fn sub_total(&self) -> f64 {
        self.sub_total_at(self.config.precision)
    }

    pub fn sub_total_at(&self, precision: u32) -> f64 {
        self.cart.sub_total(precision)
    }

    pub fn discount_price(&self) -> f64 {
        self.discount_price_at(self.config.precision)
    }

    pub fn discount_price_at(&self, precision: u32) -> f64 {
        self.cart.discount_price(precision)
    }

    pub fn total(&self) -> f64 {
        self.total_at(self.config.precision)
    }

    pub fn total_at(&self, precision: u32) -> f64 {
        self.cart.total(precision)
    }

    pub fn get_discount(&self) -> u8 {
        self.cart.discount()
    }

    /// Sets the cart discount percent and persists it.
    ///
    /// ## Errors
    /// - `InvalidDiscount` outside [0, 100]
    pub fn set_discount(&mut self, percent: i64) -> EngineResult<()> {
        debug!(percent, "Setting cart discount");

        let previous = self.cart.clone();
        self.cart.set_discount(percent)?;
        self.commit(previous)
    }

    /// Totals and items at the configured precision.
    pub fn summary(&self) -> CartSummary {
        self.cart.summary(self.config.precision)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Deletes the session slot, then empties the cart.
    ///
    /// If the store fails, the in-memory cart is left as it was.
    pub fn destroy(&mut self) -> EngineResult<()> {
        self.store.delete(&self.config.session_key)?;
        self.cart.clear();
        info!(session_key = %self.config.session_key, "Cart destroyed");
        Ok(())
    }

    /// Writes the current cart to the store again.
    pub fn save(&mut self) -> EngineResult<()> {
        self.persist()?;
        Ok(())
    }

    pub fn session_key(&self) -> &str {
        &self.config.session_key
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hands the store back to the host.
    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require(&self, identity: &Identity) -> CartResult<()> {
        if self.cart.contains(identity) {
            Ok(())
        } else {
            Err(not_found(identity))
        }
    }

    fn persist(&mut self) -> SessionResult<()> {
        let raw = codec::encode(&self.cart)?;
        self.store.put(&self.config.session_key, raw)
    }

    /// Persists the mutated cart, restoring `previous` if the store fails.
    fn commit(&mut self, previous: CartCollection) -> EngineResult<()> {
        if let Err(err) = self.persist() {
            warn!(
                session_key = %self.config.session_key,
                error = %err,
                "Persisting cart failed, rolling back"
            );
            self.cart = previous;
            return Err(err.into());
        }
        Ok(())
    }
}

fn check_quantity(identity: &Identity, quantity: i64) -> CartResult<()> {
    validate_quantity(quantity).map_err(|source| CartError::InvalidQuantity {
        identity: identity.clone(),
        quantity,
        source,
    })
}

fn not_found(identity: &Identity) -> CartError {
    CartError::ItemNotFound {
        identity: identity.clone(),
    }
}
