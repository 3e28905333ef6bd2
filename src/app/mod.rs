//! Application module
//!
//! The event loop that ties the wizard controller to the terminal: polls
//! key events, runs catalog queries and order submission on background
//! threads, and drains their results back into the controller through an
//! mpsc channel. All wizard and cart mutation goes through the controller;
//! this module only routes.

mod state;

pub use state::{Overlay, UiState};

use crate::cart::CartEvent;
use crate::catalog::{CatalogSource, Product};
use crate::error::Result as SelectorResult;
use crate::input::{FormResult, InputResult, TextEntry};
use crate::order::{OrderConfirmation, OrderSink};
use crate::selection::SelectionValue;
use crate::stage;
use crate::ui;
use crate::wizard::{ListingStatus, QueryTicket, Screen, WizardController};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Messages sent from background worker threads to the main UI loop.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Catalog query finished; `token` identifies the originating request
    QueryResult {
        token: u64,
        result: SelectorResult<Vec<Product>>,
    },
    /// Order submission finished
    SubmissionResult(SelectorResult<OrderConfirmation>),
}

/// Main application struct.
pub struct App {
    wizard: WizardController,
    ui: UiState,
    catalog: Arc<dyn CatalogSource>,
    sink: Arc<dyn OrderSink>,
    /// Channel sender for worker output (cloned into threads)
    worker_tx: Sender<WorkerMessage>,
    /// Channel receiver polled in the main loop
    worker_rx: Receiver<WorkerMessage>,
}

impl App {
    pub fn new(catalog: Arc<dyn CatalogSource>, sink: Arc<dyn OrderSink>) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            wizard: WizardController::new(),
            ui: UiState::new(),
            catalog,
            sink,
            worker_tx,
            worker_rx,
        }
    }

    /// Run the event loop until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        loop {
            self.wizard.tick();
            self.pump_workers();
            self.issue_pending_query();

            terminal.draw(|frame| ui::render(frame, &self.wizard, &self.ui))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if self.ui.should_quit {
                return Ok(());
            }
        }
    }

    /// Spawn a catalog query thread for any ticket the controller issued.
    fn issue_pending_query(&mut self) {
        if let Some(QueryTicket { token, filters }) = self.wizard.poll_query_ticket() {
            let catalog = Arc::clone(&self.catalog);
            let tx = self.worker_tx.clone();
            thread::spawn(move || {
                let result = catalog.query_products(&filters);
                // Receiver gone means the app is shutting down
                let _ = tx.send(WorkerMessage::QueryResult { token, result });
            });
        }
    }

    /// Drain worker results into the controller.
    fn pump_workers(&mut self) {
        while let Ok(message) = self.worker_rx.try_recv() {
            match message {
                WorkerMessage::QueryResult { token, result } => {
                    self.wizard.apply_query_result(token, result);
                    match self.wizard.listing() {
                        ListingStatus::Ready(products) if products.is_empty() => {
                            if self.wizard.offers_special_order() {
                                self.ui.notify(
                                    "No catalog match for your custom configuration; press s to request a special order",
                                );
                            } else {
                                self.ui.notify("No products match your selections");
                            }
                        }
                        ListingStatus::Ready(products) => {
                            self.ui
                                .notify(format!("Found {} matching products", products.len()));
                        }
                        ListingStatus::Failed(message) => {
                            self.ui.notify(format!(
                                "Error fetching products: {message} (press r to reset)"
                            ));
                        }
                        _ => {}
                    }
                    self.ui.clamp_cursor(self.wizard.products().len());
                }
                WorkerMessage::SubmissionResult(result) => {
                    self.wizard.apply_submission_result(result);
                    if let Some(error) = self.wizard.submit_error() {
                        // Form stays open and populated for a retry
                        self.ui.notify(error.to_owned());
                    } else {
                        self.ui.overlay = None;
                        self.ui.notify("Quotation request submitted");
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.ui.should_quit = true;
            return;
        }

        if self.ui.overlay.is_some() {
            self.handle_overlay_key(key);
            return;
        }

        match self.wizard.screen().clone() {
            Screen::Stage(index) => self.handle_stage_key(index, key),
            Screen::Listing => self.handle_listing_key(key),
            Screen::Cart => self.handle_cart_key(key),
            Screen::Submitted => self.handle_submitted_key(key),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        let Some(overlay) = self.ui.overlay.as_mut() else {
            return;
        };
        match overlay {
            Overlay::CustomValue { stage_index, entry } => {
                let stage_index = *stage_index;
                match entry.handle_key(key) {
                    InputResult::Confirm(value) => {
                        self.ui.overlay = None;
                        let value = value.trim().to_owned();
                        if value.is_empty() {
                            self.ui.notify("Custom value cannot be empty");
                        } else if self
                            .wizard
                            .select_option(stage_index, SelectionValue::custom(value))
                        {
                            self.ui.cursor = 0;
                        }
                    }
                    InputResult::Cancel => self.ui.overlay = None,
                    InputResult::Pending => {}
                }
            }
            Overlay::Quantity { item_id, entry } => {
                let item_id = *item_id;
                match entry.handle_key(key) {
                    InputResult::Confirm(raw) => {
                        self.ui.overlay = None;
                        if let Some(CartEvent::QuantityChanged { quantity, .. }) =
                            self.wizard.set_cart_quantity(item_id, &raw)
                        {
                            self.ui.notify(format!("Quantity set to {quantity}"));
                        }
                    }
                    InputResult::Cancel => self.ui.overlay = None,
                    InputResult::Pending => {}
                }
            }
            Overlay::ContactForm(form) => match form.handle_key(key) {
                FormResult::Submit(customer) => match self.wizard.begin_submission(customer) {
                    Ok(payload) => {
                        let sink = Arc::clone(&self.sink);
                        let tx = self.worker_tx.clone();
                        thread::spawn(move || {
                            let result = sink.submit_order(&payload);
                            let _ = tx.send(WorkerMessage::SubmissionResult(result));
                        });
                        self.ui.notify("Submitting quotation request...");
                    }
                    Err(e) => self.ui.notify(e.to_string()),
                },
                FormResult::Cancel => self.ui.overlay = None,
                FormResult::Pending => {}
            },
        }
    }

    fn handle_stage_key(&mut self, stage_index: usize, key: KeyEvent) {
        let def = match stage::stage(stage_index) {
            Some(def) => def,
            None => return,
        };
        match key.code {
            KeyCode::Char('q') => self.ui.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.ui.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.ui.cursor_down(def.options.len()),
            KeyCode::Enter => {
                if let Some(option) = def.options.get(self.ui.cursor) {
                    if self
                        .wizard
                        .select_option(stage_index, SelectionValue::standard(option.id))
                    {
                        self.ui.cursor = 0;
                    }
                }
            }
            KeyCode::Char('c') if def.accepts_custom() => {
                self.ui.overlay = Some(Overlay::CustomValue {
                    stage_index,
                    entry: TextEntry::new(format!("Custom value for: {}", def.title)),
                });
            }
            KeyCode::Char('v') => {
                self.wizard.view_cart();
                self.ui.cursor = 0;
            }
            KeyCode::Esc | KeyCode::Left => {
                if self.wizard.go_back() {
                    self.ui.cursor = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.ui.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.ui.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.cursor_down(self.wizard.products().len())
            }
            KeyCode::Enter => {
                let id = self
                    .wizard
                    .products()
                    .get(self.ui.cursor)
                    .map(|p| p.id.clone());
                if let Some(id) = id {
                    if self.wizard.add_product_to_cart(&id).is_some() {
                        self.ui.notify("Product has been added to your cart");
                    }
                }
            }
            KeyCode::Char('s') if self.wizard.offers_special_order() => {
                self.wizard.add_special_order_to_cart();
                self.wizard.view_cart();
                self.ui.cursor = 0;
                self.ui.notify("Special order has been added to your cart");
            }
            KeyCode::Char('v') => {
                self.wizard.view_cart();
                self.ui.cursor = 0;
            }
            KeyCode::Char('r') => {
                self.wizard.reset_all();
                self.ui.cursor = 0;
                self.ui.notify("Selections cleared");
            }
            KeyCode::Esc | KeyCode::Left => {
                if self.wizard.go_back() {
                    self.ui.cursor = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_cart_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.ui.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.ui.cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => self.ui.cursor_down(self.wizard.cart().len()),
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = self
                    .wizard
                    .cart()
                    .items()
                    .get(self.ui.cursor)
                    .map(|item| item.id);
                if let Some(id) = id {
                    if self.wizard.remove_cart_item(id).is_some() {
                        self.ui.notify("Item removed from cart");
                    }
                    self.ui.clamp_cursor(self.wizard.cart().len());
                }
            }
            KeyCode::Char('e') => {
                if let Some(item) = self.wizard.cart().items().get(self.ui.cursor) {
                    self.ui.overlay = Some(Overlay::Quantity {
                        item_id: item.id,
                        entry: TextEntry::with_value("Quantity", item.quantity.to_string()),
                    });
                }
            }
            KeyCode::Char('n') => {
                self.wizard.add_new_configuration();
                self.ui.cursor = 0;
                self.ui.notify("Started configuring a new strainer");
            }
            KeyCode::Enter => {
                if self.wizard.cart().is_empty() {
                    self.ui.notify("Your cart is empty");
                } else {
                    self.ui.overlay =
                        Some(Overlay::ContactForm(crate::input::ContactForm::new()));
                }
            }
            KeyCode::Esc => {
                self.wizard.return_from_cart();
                self.ui.cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_submitted_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.ui.should_quit = true,
            KeyCode::Enter | KeyCode::Char('n') => {
                self.wizard.start_new_selection();
                self.ui.cursor = 0;
                self.ui.notify("Started a new selection");
            }
            _ => {}
        }
    }
}
