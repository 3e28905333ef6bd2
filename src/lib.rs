//! Strainer Selector Library
//!
//! This library provides the core functionality for the strainer selector:
//! the stage roster, selection ledger, cart, wizard state machine, and the
//! catalog and order collaborators behind the TUI.

pub mod app;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod input;
pub mod order;
pub mod selection;
pub mod stage;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use cart::{Cart, CartEvent, CartItem, ProductRef};
pub use catalog::{CatalogSource, FilterSet, LocalCatalog, Product};
pub use error::{Result, SelectorError};
pub use order::{
    CustomerInfo, LocalOrderSink, OrderConfirmation, OrderItem, OrderPayload, OrderSink,
};
pub use selection::{Selection, SelectionLedger, SelectionValue};
pub use stage::{StageDef, StageId, StageKind, StageOption};
pub use wizard::{ListingStatus, QueryTicket, Screen, WizardController};
