//! Input handling module
//!
//! Small self-contained input widgets: a single-line text entry used for
//! custom values and quantity editing, and the multi-field contact form.
//! Each widget consumes key events and reports a result; the application
//! layer decides what a confirmation means.

use crate::order::CustomerInfo;
use crossterm::event::{KeyCode, KeyEvent};

/// Outcome of feeding a key event to a text entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// Enter pressed; carries the entered value
    Confirm(String),
    /// Esc pressed
    Cancel,
    /// Still editing
    Pending,
}

/// Single-line text entry state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub label: String,
    pub value: String,
}

impl TextEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
        }
    }

    pub fn with_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => InputResult::Confirm(self.value.clone()),
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Backspace => {
                self.value.pop();
                InputResult::Pending
            }
            KeyCode::Char(c) => {
                self.value.push(c);
                InputResult::Pending
            }
            _ => InputResult::Pending,
        }
    }
}

/// Fields of the contact form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Company,
    Email,
    Phone,
    NeedsDelivery,
    DeliveryAddress,
    Submit,
}

impl ContactField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Company,
            Self::Company => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::NeedsDelivery,
            Self::NeedsDelivery => Self::DeliveryAddress,
            Self::DeliveryAddress => Self::Submit,
            Self::Submit => Self::Name,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Name => Self::Submit,
            Self::Company => Self::Name,
            Self::Email => Self::Company,
            Self::Phone => Self::Email,
            Self::NeedsDelivery => Self::Phone,
            Self::DeliveryAddress => Self::NeedsDelivery,
            Self::Submit => Self::DeliveryAddress,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Company => "Company Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::NeedsDelivery => "Needs Delivery",
            Self::DeliveryAddress => "Delivery Address",
            Self::Submit => "Submit Request",
        }
    }
}

/// Outcome of feeding a key event to the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult {
    /// Submit requested with the collected details
    Submit(CustomerInfo),
    /// Esc pressed; back to the cart
    Cancel,
    Pending,
}

/// Customer contact form state.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub needs_delivery: bool,
    pub delivery_address: String,
    pub focused: Option<ContactField>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            focused: Some(ContactField::Name),
            ..Self::default()
        }
    }

    pub fn focused(&self) -> ContactField {
        self.focused.unwrap_or(ContactField::Name)
    }

    /// The collected details in collaborator form. Empty delivery address
    /// maps to `None` so validation reports it as missing.
    pub fn customer_info(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.trim().to_owned(),
            company: self.company.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            needs_delivery: self.needs_delivery,
            delivery_address: {
                let addr = self.delivery_address.trim();
                (!addr.is_empty()).then(|| addr.to_owned())
            },
        }
    }

    fn field_mut(&mut self, field: ContactField) -> Option<&mut String> {
        match field {
            ContactField::Name => Some(&mut self.name),
            ContactField::Company => Some(&mut self.company),
            ContactField::Email => Some(&mut self.email),
            ContactField::Phone => Some(&mut self.phone),
            ContactField::DeliveryAddress => Some(&mut self.delivery_address),
            ContactField::NeedsDelivery | ContactField::Submit => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormResult {
        let focused = self.focused();
        match key.code {
            KeyCode::Esc => return FormResult::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                let mut next = focused.next();
                // Skip the address field when delivery is not requested
                if next == ContactField::DeliveryAddress && !self.needs_delivery {
                    next = next.next();
                }
                self.focused = Some(next);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let mut prev = focused.previous();
                if prev == ContactField::DeliveryAddress && !self.needs_delivery {
                    prev = prev.previous();
                }
                self.focused = Some(prev);
            }
            KeyCode::Enter => match focused {
                ContactField::Submit => return FormResult::Submit(self.customer_info()),
                ContactField::NeedsDelivery => self.needs_delivery = !self.needs_delivery,
                _ => self.focused = Some(focused.next()),
            },
            KeyCode::Char(' ') if focused == ContactField::NeedsDelivery => {
                self.needs_delivery = !self.needs_delivery;
            }
            KeyCode::Backspace => {
                if let Some(value) = self.field_mut(focused) {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = self.field_mut(focused) {
                    value.push(c);
                }
            }
            _ => {}
        }
        FormResult::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_entry_editing() {
        let mut entry = TextEntry::new("Custom material");
        assert_eq!(entry.handle_key(key(KeyCode::Char('p'))), InputResult::Pending);
        entry.handle_key(key(KeyCode::Char('v')));
        entry.handle_key(key(KeyCode::Char('c')));
        entry.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            entry.handle_key(key(KeyCode::Enter)),
            InputResult::Confirm("pv".to_owned())
        );
        assert_eq!(entry.handle_key(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn test_form_focus_cycle_skips_address_without_delivery() {
        let mut form = ContactForm::new();
        form.focused = Some(ContactField::NeedsDelivery);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), ContactField::Submit);

        form.needs_delivery = true;
        form.focused = Some(ContactField::NeedsDelivery);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), ContactField::DeliveryAddress);
    }

    #[test]
    fn test_form_collects_customer_info() {
        let mut form = ContactForm::new();
        form.name = " Ada Nguyen ".to_owned();
        form.company = "Pipeline Services".to_owned();
        form.email = "ada@pipeline.example".to_owned();
        form.phone = "+61 2 5550 1234".to_owned();
        form.needs_delivery = true;
        form.delivery_address = "  ".to_owned();

        let info = form.customer_info();
        assert_eq!(info.name, "Ada Nguyen");
        assert!(info.needs_delivery);
        // Blank address collapses to None so validation catches it
        assert_eq!(info.delivery_address, None);
    }

    #[test]
    fn test_submit_from_submit_field() {
        let mut form = ContactForm::new();
        form.focused = Some(ContactField::Submit);
        assert!(matches!(
            form.handle_key(key(KeyCode::Enter)),
            FormResult::Submit(_)
        ));
    }

    #[test]
    fn test_delivery_toggle() {
        let mut form = ContactForm::new();
        form.focused = Some(ContactField::NeedsDelivery);
        form.handle_key(key(KeyCode::Enter));
        assert!(form.needs_delivery);
        form.handle_key(key(KeyCode::Char(' ')));
        assert!(!form.needs_delivery);
    }
}
