//! Wizard Controller
//!
//! The finite-state driver behind the selector: advances and rewinds
//! stages, issues catalog queries on entering the listing, and owns every
//! mutation of the Selection Ledger and Cart. The UI layer calls into the
//! controller and renders what it reads back; it never touches ledger or
//! cart directly.
//!
//! Two pieces of discipline keep the single-actor model honest:
//!
//! - a transition hold: a short fixed pause after each stage change during
//!   which further `select_option`/`go_back` calls are rejected (not
//!   queued), so a visual acknowledgment can finish before the next input
//!   lands;
//! - a request token on catalog queries: only the most recently initiated
//!   query's result is ever applied, regardless of completion order, so a
//!   rewind-and-requery can never be clobbered by a stale response.

use crate::cart::{Cart, CartEvent};
use crate::catalog::{FilterSet, Product};
use crate::error::Result;
use crate::order::{CustomerInfo, OrderConfirmation, OrderPayload, OrderSink};
use crate::selection::{SelectionLedger, SelectionValue};
use crate::stage;
use std::time::{Duration, Instant};
use ulid::Ulid;

/// Where the wizard currently is.
///
/// Choice screens are linear; Cart is reachable from anywhere and returns
/// to wherever it was entered from. There is no terminal screen: the
/// machine is cyclic by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// One of the choice stages (index below the listing stage)
    Stage(usize),
    /// The computed product listing
    Listing,
    /// The cart / quotation form
    Cart,
    /// Submission acknowledgment
    Submitted,
}

/// State of the product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    /// No query issued for the current selection set yet
    Idle,
    /// A query is in flight
    Loading { token: u64 },
    /// Results for the current selection set
    Ready(Vec<Product>),
    /// The query failed; retry or reset
    Failed(String),
}

/// A catalog query the application layer should run. Carries the request
/// token the result must be tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub token: u64,
    pub filters: FilterSet,
}

/// The wizard state machine. One instance per session; no globals.
#[derive(Debug)]
pub struct WizardController {
    ledger: SelectionLedger,
    cart: Cart,
    screen: Screen,
    /// Screen to restore when leaving the cart
    return_screen: Screen,

    transition_hold: Duration,
    transition_until: Option<Instant>,

    next_token: u64,
    listing: ListingStatus,
    /// Filter set of the most recently issued query; used to guarantee
    /// one query per distinct selection set
    queried_filters: Option<FilterSet>,

    submitting: bool,
    submit_error: Option<String>,
    confirmation: Option<OrderConfirmation>,
    /// Delay between acknowledgment and automatic clearing
    clear_after: Duration,
    clear_at: Option<Instant>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Production timings: a 150ms transition hold, cart cleared five
    /// seconds after the acknowledgment.
    pub fn new() -> Self {
        Self::with_timings(Duration::from_millis(150), Duration::from_secs(5))
    }

    /// Custom timings; tests pass `Duration::ZERO` for both.
    pub fn with_timings(transition_hold: Duration, clear_after: Duration) -> Self {
        Self {
            ledger: SelectionLedger::new(),
            cart: Cart::new(),
            screen: Screen::Stage(0),
            return_screen: Screen::Stage(0),
            transition_hold,
            transition_until: None,
            next_token: 0,
            listing: ListingStatus::Idle,
            queried_filters: None,
            submitting: false,
            submit_error: None,
            confirmation: None,
            clear_after,
            clear_at: None,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn listing(&self) -> &ListingStatus {
        &self.listing
    }

    /// Listed products, if the current query has resolved.
    pub fn products(&self) -> &[Product] {
        match &self.listing {
            ListingStatus::Ready(products) => products,
            _ => &[],
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// True while the post-transition display pause is in effect.
    pub fn is_transitioning(&self) -> bool {
        self.transition_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// True when the listing resolved to no matches but at least one
    /// answer was custom: instead of a bare "no products" message the user
    /// is offered a special-order submission.
    pub fn offers_special_order(&self) -> bool {
        matches!(&self.listing, ListingStatus::Ready(products) if products.is_empty())
            && self.ledger.has_custom_selection()
    }

    // ------------------------------------------------------------------
    // Stage navigation
    // ------------------------------------------------------------------

    fn begin_hold(&mut self) {
        if !self.transition_hold.is_zero() {
            self.transition_until = Some(Instant::now() + self.transition_hold);
        }
    }

    /// Record an answer and advance.
    ///
    /// Rejected (returns `false`, nothing recorded) while a transition
    /// hold is in effect or when not on a choice screen. Advancing past
    /// the last choice stage enters the listing.
    pub fn select_option(&mut self, stage_index: usize, value: SelectionValue) -> bool {
        if self.is_transitioning() {
            tracing::debug!(stage = stage_index, "select_option rejected mid-transition");
            return false;
        }
        if !matches!(self.screen, Screen::Stage(_)) {
            return false;
        }

        self.ledger.record_selection(stage_index, value);

        let next = stage_index + 1;
        if next >= stage::listing_index() {
            self.enter_listing();
        } else {
            self.screen = Screen::Stage(next);
        }
        self.begin_hold();
        true
    }

    /// Step back one screen. No-op at stage 0; rejected mid-transition.
    /// Going back never clears downstream selections — only a subsequent
    /// `select_option` at the earlier stage does that.
    pub fn go_back(&mut self) -> bool {
        if self.is_transitioning() {
            return false;
        }
        match self.screen {
            Screen::Stage(0) => true,
            Screen::Stage(i) => {
                self.screen = Screen::Stage(i - 1);
                self.begin_hold();
                true
            }
            Screen::Listing => {
                self.screen = Screen::Stage(stage::listing_index() - 1);
                self.begin_hold();
                true
            }
            Screen::Cart | Screen::Submitted => false,
        }
    }

    fn enter_listing(&mut self) {
        self.screen = Screen::Listing;
        // A changed selection set invalidates any previous results; the
        // next poll_query_ticket() will issue a fresh query.
        if self.queried_filters.as_ref() != Some(&self.ledger.to_filter_set()) {
            self.listing = ListingStatus::Idle;
        }
    }

    /// The query the application layer should run now, if any.
    ///
    /// Issues exactly one ticket per distinct selection set: repeated
    /// polls while a query is in flight, or after its results arrived,
    /// return `None`. A rewind that changes the selection set yields a new
    /// ticket whose token supersedes the old one.
    pub fn poll_query_ticket(&mut self) -> Option<QueryTicket> {
        if self.screen != Screen::Listing {
            return None;
        }
        let filters = self.ledger.to_filter_set();
        let fresh = !matches!(self.listing, ListingStatus::Idle)
            && self.queried_filters.as_ref() == Some(&filters);
        if fresh {
            return None;
        }

        self.next_token += 1;
        let token = self.next_token;
        self.listing = ListingStatus::Loading { token };
        self.queried_filters = Some(filters.clone());
        tracing::debug!(token, filters = %filters, "catalog query issued");
        Some(QueryTicket { token, filters })
    }

    /// Apply a catalog query result. Results whose token is not the most
    /// recently issued one are discarded, whatever their arrival order.
    pub fn apply_query_result(&mut self, token: u64, result: Result<Vec<Product>>) {
        if token != self.next_token || !matches!(self.listing, ListingStatus::Loading { .. }) {
            tracing::debug!(token, current = self.next_token, "stale query result discarded");
            return;
        }
        self.listing = match result {
            Ok(products) => {
                tracing::debug!(token, matches = products.len(), "catalog query resolved");
                ListingStatus::Ready(products)
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "catalog query failed");
                ListingStatus::Failed(e.to_string())
            }
        };
    }

    /// Synchronous convenience for a blocking catalog source: issue the
    /// pending ticket (if any) and apply its result immediately.
    pub fn run_pending_query(&mut self, catalog: &dyn crate::catalog::CatalogSource) {
        if let Some(ticket) = self.poll_query_ticket() {
            let result = catalog.query_products(&ticket.filters);
            self.apply_query_result(ticket.token, result);
        }
    }

    // ------------------------------------------------------------------
    // Cart operations
    // ------------------------------------------------------------------

    /// Add a listed product to the cart by catalog id.
    pub fn add_product_to_cart(&mut self, product_id: &str) -> Option<CartEvent> {
        let product = self
            .products()
            .iter()
            .find(|p| p.id == product_id)?
            .clone();
        let snapshot = self.ledger.history_snapshot();
        Some(self.cart.add_from_catalog(product, snapshot))
    }

    /// Add the current custom configuration as a special-order item.
    pub fn add_special_order_to_cart(&mut self) -> CartEvent {
        let snapshot = self.ledger.history_snapshot();
        self.cart.add_special_order(snapshot)
    }

    pub fn remove_cart_item(&mut self, item_id: Ulid) -> Option<CartEvent> {
        self.cart.remove(item_id)
    }

    pub fn set_cart_quantity(&mut self, item_id: Ulid, raw: &str) -> Option<CartEvent> {
        self.cart.set_quantity_from_input(item_id, raw)
    }

    // ------------------------------------------------------------------
    // Screen toggles and resets
    // ------------------------------------------------------------------

    /// Switch to the cart without touching selections.
    pub fn view_cart(&mut self) {
        if self.screen != Screen::Cart {
            self.return_screen = self.screen.clone();
            self.screen = Screen::Cart;
        }
    }

    /// Return from the cart to wherever it was entered from.
    pub fn return_from_cart(&mut self) {
        if self.screen == Screen::Cart {
            self.screen = self.return_screen.clone();
        }
    }

    /// Clear the ledger and return to stage 0. The cart is kept: the user
    /// may be mid-way through collecting several configurations.
    pub fn reset_all(&mut self) {
        self.ledger.reset();
        self.listing = ListingStatus::Idle;
        self.queried_filters = None;
        self.screen = Screen::Stage(0);
        self.return_screen = Screen::Stage(0);
        self.submit_error = None;
        tracing::debug!("wizard reset");
    }

    /// Start configuring another item; intended to be invoked from the
    /// cart after at least one item has been added.
    pub fn add_new_configuration(&mut self) {
        self.reset_all();
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Validate and build the order payload, and mark submission as in
    /// flight. No collaborator is contacted: a validation failure is
    /// returned inline and nothing leaves the process.
    pub fn begin_submission(&mut self, customer: CustomerInfo) -> Result<OrderPayload> {
        let payload = self.cart.to_order_payload(customer);
        if let Err(e) = payload.validate() {
            self.submit_error = Some(e.to_string());
            return Err(e);
        }
        self.submit_error = None;
        self.submitting = true;
        Ok(payload)
    }

    /// Apply the collaborator's response. On success the acknowledgment
    /// screen is shown and cart + ledger are scheduled for clearing; on
    /// failure the cart and contact form are left intact so a retry
    /// requires no re-entry.
    pub fn apply_submission_result(&mut self, result: Result<OrderConfirmation>) {
        self.submitting = false;
        match result {
            Ok(confirmation) => {
                tracing::info!(order_id = %confirmation.order_id, "submission acknowledged");
                self.confirmation = Some(confirmation);
                self.screen = Screen::Submitted;
                self.clear_at = Some(Instant::now() + self.clear_after);
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission failed");
                self.submit_error = Some(e.to_string());
            }
        }
    }

    /// Blocking submission against an in-process sink; composes
    /// [`begin_submission`](Self::begin_submission) and
    /// [`apply_submission_result`](Self::apply_submission_result).
    pub fn submit_order(
        &mut self,
        customer: CustomerInfo,
        sink: &dyn OrderSink,
    ) -> Result<()> {
        let payload = self.begin_submission(customer)?;
        match sink.submit_order(&payload) {
            Ok(confirmation) => {
                self.apply_submission_result(Ok(confirmation));
                Ok(())
            }
            Err(e) => {
                self.submitting = false;
                self.submit_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Leave the acknowledgment screen and begin a fresh selection.
    pub fn start_new_selection(&mut self) {
        if self.screen == Screen::Submitted {
            self.cart.clear();
            self.confirmation = None;
            self.clear_at = None;
        }
        self.reset_all();
    }

    /// Drive time-based behavior: expire the post-acknowledgment delay and
    /// clear cart + ledger once it elapses. Call once per event-loop turn.
    pub fn tick(&mut self) {
        if let Some(at) = self.clear_at {
            if Instant::now() >= at {
                self.cart.clear();
                self.ledger.reset();
                self.listing = ListingStatus::Idle;
                self.queried_filters = None;
                self.clear_at = None;
                tracing::debug!("cart cleared after acknowledgment");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSource, LocalCatalog};

    fn controller() -> WizardController {
        WizardController::with_timings(Duration::ZERO, Duration::ZERO)
    }

    fn answer_all(wizard: &mut WizardController) {
        let ids = ["y-strainer", "stainless-steel", "flanged", "2", "150"];
        for (i, id) in ids.iter().enumerate() {
            assert!(wizard.select_option(i, SelectionValue::standard(*id)));
        }
    }

    #[test]
    fn test_select_advances_through_stages_to_listing() {
        let mut wizard = controller();
        assert_eq!(*wizard.screen(), Screen::Stage(0));
        answer_all(&mut wizard);
        assert_eq!(*wizard.screen(), Screen::Listing);
        assert_eq!(wizard.ledger().len(), 5);
    }

    #[test]
    fn test_transition_hold_rejects_input() {
        let mut wizard =
            WizardController::with_timings(Duration::from_secs(60), Duration::ZERO);
        assert!(wizard.select_option(0, SelectionValue::standard("y-strainer")));
        // Hold in effect: both select and go_back are rejected, not queued
        assert!(!wizard.select_option(1, SelectionValue::standard("cast-iron")));
        assert!(!wizard.go_back());
        assert_eq!(*wizard.screen(), Screen::Stage(1));
        assert_eq!(wizard.ledger().len(), 1);
    }

    #[test]
    fn test_go_back_is_noop_at_stage_zero() {
        let mut wizard = controller();
        assert!(wizard.go_back());
        assert_eq!(*wizard.screen(), Screen::Stage(0));
    }

    #[test]
    fn test_go_back_does_not_clear_selections() {
        let mut wizard = controller();
        answer_all(&mut wizard);
        assert!(wizard.go_back());
        assert_eq!(*wizard.screen(), Screen::Stage(4));
        assert_eq!(wizard.ledger().len(), 5);
    }

    #[test]
    fn test_one_query_per_selection_set() {
        let mut wizard = controller();
        answer_all(&mut wizard);

        let ticket = wizard.poll_query_ticket().expect("first poll issues a query");
        // Re-render polls while in flight issue nothing
        assert!(wizard.poll_query_ticket().is_none());
        wizard.apply_query_result(ticket.token, Ok(vec![]));
        assert!(wizard.poll_query_ticket().is_none());

        // Leaving and re-entering with the same answers does not re-query
        assert!(wizard.go_back());
        assert!(wizard.select_option(4, SelectionValue::standard("150")));
        assert!(wizard.poll_query_ticket().is_none());
    }

    #[test]
    fn test_stale_query_result_discarded() {
        let mut wizard = controller();
        answer_all(&mut wizard);
        let first = wizard.poll_query_ticket().unwrap();

        // Rewind and change the pressure rating: a new, superseding query
        assert!(wizard.go_back());
        assert!(wizard.select_option(4, SelectionValue::standard("300")));
        let second = wizard.poll_query_ticket().unwrap();
        assert!(second.token > first.token);

        let catalog = LocalCatalog::builtin();
        let stale = catalog.query_products(&first.filters);
        let current = catalog.query_products(&second.filters);

        // Second query resolves first; the stale first result must not
        // overwrite it regardless of arrival order
        wizard.apply_query_result(second.token, current);
        let settled = wizard.listing().clone();
        wizard.apply_query_result(first.token, stale);
        assert_eq!(*wizard.listing(), settled);
    }

    #[test]
    fn test_query_failure_leaves_listing_screen() {
        let mut wizard = controller();
        answer_all(&mut wizard);
        let ticket = wizard.poll_query_ticket().unwrap();
        wizard.apply_query_result(
            ticket.token,
            Err(crate::error::SelectorError::catalog("backend unreachable")),
        );
        assert!(matches!(wizard.listing(), ListingStatus::Failed(_)));
        assert_eq!(*wizard.screen(), Screen::Listing);
        assert_eq!(wizard.ledger().len(), 5);
    }

    #[test]
    fn test_special_order_offered_for_custom_no_match() {
        let mut wizard = controller();
        assert!(wizard.select_option(0, SelectionValue::standard("y-strainer")));
        assert!(wizard.select_option(1, SelectionValue::custom("Hastelloy C-276")));
        assert!(wizard.select_option(2, SelectionValue::standard("flanged")));
        assert!(wizard.select_option(3, SelectionValue::standard("2")));
        assert!(wizard.select_option(4, SelectionValue::standard("150")));

        wizard.run_pending_query(&LocalCatalog::builtin());
        assert_eq!(wizard.products().len(), 0);
        assert!(wizard.offers_special_order());

        let event = wizard.add_special_order_to_cart();
        assert!(matches!(event, CartEvent::ItemAdded { special_order: true, .. }));
    }

    #[test]
    fn test_view_cart_round_trip_preserves_selections() {
        let mut wizard = controller();
        answer_all(&mut wizard);
        wizard.view_cart();
        assert_eq!(*wizard.screen(), Screen::Cart);
        wizard.return_from_cart();
        assert_eq!(*wizard.screen(), Screen::Listing);
        assert_eq!(wizard.ledger().len(), 5);
    }

    #[test]
    fn test_reset_all_keeps_cart() {
        let mut wizard = controller();
        answer_all(&mut wizard);
        wizard.run_pending_query(&LocalCatalog::builtin());
        assert!(wizard.add_product_to_cart("YS-SS-150-2").is_some());

        wizard.reset_all();
        assert_eq!(*wizard.screen(), Screen::Stage(0));
        assert!(wizard.ledger().is_empty());
        assert_eq!(wizard.cart().len(), 1);
    }
}
