//! Quotation cart
//!
//! An ordered collection of configured items awaiting submission. Items
//! are either catalog matches or free-form "special order" configurations;
//! either way the item owns a snapshot of the selection history taken at
//! add time, never a live link into the catalog.

use crate::catalog::Product;
use crate::order::{CustomerInfo, OrderItem, OrderPayload};
use crate::selection::Selection;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use ulid::Ulid;

/// What a cart item points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    /// A read-only snapshot of a catalog product
    Catalog(Product),
    /// Synthesized placeholder for a custom configuration: no price, no
    /// catalog id
    SpecialOrder { name: String, description: String },
}

impl ProductRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Catalog(p) => &p.name,
            Self::SpecialOrder { name, .. } => name,
        }
    }

    pub fn catalog_id(&self) -> Option<&str> {
        match self {
            Self::Catalog(p) => Some(&p.id),
            Self::SpecialOrder { .. } => None,
        }
    }
}

/// One configured line item, exclusively owned by the cart.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique, time-derived id
    pub id: Ulid,
    pub product: ProductRef,
    /// Copy of the selection history at add time
    pub selections: Vec<Selection>,
    /// Always at least 1
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn is_special_order(&self) -> bool {
        matches!(self.product, ProductRef::SpecialOrder { .. })
    }
}

/// Notification emitted by cart mutations, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { id: Ulid, special_order: bool },
    ItemRemoved { id: Ulid },
    QuantityChanged { id: Ulid, quantity: u32 },
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a catalog match with quantity 1.
    pub fn add_from_catalog(&mut self, product: Product, snapshot: Vec<Selection>) -> CartEvent {
        self.push(ProductRef::Catalog(product), snapshot)
    }

    /// Append a special-order item for a custom configuration.
    pub fn add_special_order(&mut self, snapshot: Vec<Selection>) -> CartEvent {
        self.push(
            ProductRef::SpecialOrder {
                name: "Custom Strainer (Special Order)".to_owned(),
                description: "Custom configuration strainer that will be special ordered"
                    .to_owned(),
            },
            snapshot,
        )
    }

    fn push(&mut self, product: ProductRef, snapshot: Vec<Selection>) -> CartEvent {
        let item = CartItem {
            id: Ulid::new(),
            product,
            selections: snapshot,
            quantity: 1,
            added_at: Utc::now(),
        };
        let event = CartEvent::ItemAdded {
            id: item.id,
            special_order: item.is_special_order(),
        };
        tracing::debug!(id = %item.id, special = item.is_special_order(), "cart item added");
        self.items.push(item);
        event
    }

    /// Remove an item by id. An absent id is a no-op, not an error.
    pub fn remove(&mut self, item_id: Ulid) -> Option<CartEvent> {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        (self.items.len() < before).then_some(CartEvent::ItemRemoved { id: item_id })
    }

    /// Set an item's quantity, clamped to a minimum of 1.
    pub fn set_quantity(&mut self, item_id: Ulid, quantity: i64) -> Option<CartEvent> {
        let item = self.items.iter_mut().find(|item| item.id == item_id)?;
        item.quantity = quantity.max(1).min(u32::MAX as i64) as u32;
        Some(CartEvent::QuantityChanged {
            id: item_id,
            quantity: item.quantity,
        })
    }

    /// Set an item's quantity from raw user input. Non-numeric input is
    /// coerced to 1.
    pub fn set_quantity_from_input(&mut self, item_id: Ulid, raw: &str) -> Option<CartEvent> {
        let quantity = raw.trim().parse::<i64>().unwrap_or(1);
        self.set_quantity(item_id, quantity)
    }

    /// Empty the cart; used after a confirmed submission.
    pub fn clear(&mut self) -> CartEvent {
        self.items.clear();
        CartEvent::Cleared
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, item_id: Ulid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the cart into the submission wire shape: each item's selection
    /// snapshot is flattened into a stage-title -> value map, with custom
    /// values already in their plain display form.
    pub fn to_order_payload(&self, customer: CustomerInfo) -> OrderPayload {
        let items = self
            .items
            .iter()
            .map(|item| {
                let selections: BTreeMap<String, String> = item
                    .selections
                    .iter()
                    .map(|sel| (sel.stage_title.to_owned(), sel.display_label.clone()))
                    .collect();
                OrderItem {
                    product_id: item.product.catalog_id().map(str::to_owned),
                    product_name: item.product.name().to_owned(),
                    is_special_order: item.is_special_order(),
                    quantity: item.quantity,
                    selections,
                }
            })
            .collect();

        OrderPayload {
            customer,
            items,
            timestamp: Utc::now(),
        }
    }
}
