//! Order submission collaborator
//!
//! Wire shapes for the quotation request, pre-submission validation, and
//! the [`OrderSink`] trait the wizard submits through. Validation runs
//! before any collaborator call: a rejected payload never leaves the
//! process.

use crate::error::{Result, SelectorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use ulid::Ulid;

/// Customer contact details collected on the quotation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub needs_delivery: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

/// One line item in the submission wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub product_name: String,
    pub is_special_order: bool,
    pub quantity: u32,
    /// Stage title -> chosen value, custom values in plain text
    pub selections: BTreeMap<String, String>,
}

/// The finalized quotation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub timestamp: DateTime<Utc>,
}

impl OrderPayload {
    /// Validate the payload before it is handed to a collaborator.
    ///
    /// Every failure here is a client-category [`SelectorError::Validation`]
    /// with a message the UI can show inline.
    pub fn validate(&self) -> Result<()> {
        let customer = &self.customer;
        let mut missing = Vec::new();
        for (label, value) in [
            ("name", &customer.name),
            ("company", &customer.company),
            ("email", &customer.email),
            ("phone", &customer.phone),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        if !missing.is_empty() {
            return Err(SelectorError::validation(format!(
                "Please fill in the following required fields: {}",
                missing.join(", ")
            )));
        }

        if !validate_email(&customer.email) {
            return Err(SelectorError::validation(
                "Please enter a valid email address",
            ));
        }

        if customer.needs_delivery
            && customer
                .delivery_address
                .as_deref()
                .map_or(true, |addr| addr.trim().is_empty())
        {
            return Err(SelectorError::validation(
                "Delivery address is required when delivery is needed",
            ));
        }

        if self.items.is_empty() {
            return Err(SelectorError::validation("No items in the order"));
        }

        for (i, item) in self.items.iter().enumerate() {
            if item.selections.is_empty() {
                return Err(SelectorError::validation(format!(
                    "Item #{} is missing selections",
                    i + 1
                )));
            }
        }

        Ok(())
    }
}

/// Plausibility check for an email address: non-empty local part, exactly
/// one `@`, a dot inside the domain, no whitespace anywhere.
pub fn validate_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Acknowledgment returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: String,
    pub message: String,
    /// Human-readable response window, e.g. "24 hours"
    pub estimated_response: String,
    pub email_sent: bool,
    pub items: Vec<OrderItem>,
    pub customer: CustomerInfo,
    pub timestamp: DateTime<Utc>,
}

/// Destination for finalized quotation requests.
pub trait OrderSink: Send + Sync {
    fn submit_order(&self, payload: &OrderPayload) -> Result<OrderConfirmation>;
}

/// In-process order sink: validates, assigns an order id, and appends a
/// plain-text quotation summary to a log file when one is configured.
///
/// Stands in for the persistence + email backend; a failure to write the
/// summary does not fail the order, it only reports `email_sent: false`.
#[derive(Debug, Clone, Default)]
pub struct LocalOrderSink {
    log_path: Option<PathBuf>,
}

impl LocalOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_path(path: PathBuf) -> Self {
        Self {
            log_path: Some(path),
        }
    }

    fn append_summary(&self, summary: &str) -> std::io::Result<()> {
        let Some(path) = &self.log_path else {
            return Ok(());
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{summary}")?;
        Ok(())
    }
}

impl OrderSink for LocalOrderSink {
    fn submit_order(&self, payload: &OrderPayload) -> Result<OrderConfirmation> {
        payload.validate()?;

        let order_id = format!("ORD-{}", Ulid::new());
        let summary = format_order_summary(payload, &order_id);
        let email_sent = match self.append_summary(&summary) {
            Ok(()) => self.log_path.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to write order summary");
                false
            }
        };

        tracing::info!(order_id, items = payload.items.len(), "order accepted");
        Ok(OrderConfirmation {
            order_id,
            message: "Your quotation request has been successfully submitted".to_owned(),
            estimated_response: "24 hours".to_owned(),
            email_sent,
            items: payload.items.clone(),
            customer: payload.customer.clone(),
            timestamp: payload.timestamp,
        })
    }
}

/// Render the plain-text quotation-request summary used for the order log
/// and the notification email body.
pub fn format_order_summary(payload: &OrderPayload, order_id: &str) -> String {
    let customer = &payload.customer;
    let mut body = String::new();
    body.push_str("New quotation request details:\n\n");
    body.push_str(&format!("Order ID: {order_id}\n"));
    body.push_str("Customer Information:\n");
    body.push_str(&format!("Name: {}\n", customer.name));
    body.push_str(&format!("Company: {}\n", customer.company));
    body.push_str(&format!("Email: {}\n", customer.email));
    body.push_str(&format!("Phone: {}\n", customer.phone));
    if let Some(address) = &customer.delivery_address {
        body.push_str(&format!("Delivery Address: {address}\n"));
    }
    body.push_str(&format!(
        "Needs Delivery: {}\n\n",
        if customer.needs_delivery { "Yes" } else { "No" }
    ));

    body.push_str("Order Details:\n");
    for (i, item) in payload.items.iter().enumerate() {
        body.push_str(&format!(
            "Item {}: {} (ID: {})\n",
            i + 1,
            item.product_name,
            item.product_id.as_deref().unwrap_or("N/A")
        ));
        if item.is_special_order {
            body.push_str("(Special Order)\n");
        }
        body.push_str(&format!("Quantity: {}\n", item.quantity));
        body.push_str("Specifications:\n");
        for (stage, value) in &item.selections {
            body.push_str(&format!("- {stage}: {value}\n"));
        }
        body.push('\n');
    }

    body.push_str(&format!("Timestamp: {}\n", payload.timestamp.to_rfc3339()));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> OrderItem {
        let mut selections = BTreeMap::new();
        selections.insert("Select A Strainer Type".to_owned(), "Y Strainer".to_owned());
        OrderItem {
            product_id: Some("YS-SS-150-2".to_owned()),
            product_name: "ACE-YS62-SS-2".to_owned(),
            is_special_order: false,
            quantity: 2,
            selections,
        }
    }

    fn sample_payload() -> OrderPayload {
        OrderPayload {
            customer: CustomerInfo {
                name: "Ada Nguyen".to_owned(),
                company: "Pipeline Services".to_owned(),
                email: "ada@pipeline.example".to_owned(),
                phone: "+61 2 5550 1234".to_owned(),
                needs_delivery: false,
                delivery_address: None,
            },
            items: vec![sample_item()],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        sample_payload().validate().unwrap();
    }

    #[test]
    fn test_missing_customer_fields_listed() {
        let mut payload = sample_payload();
        payload.customer.name.clear();
        payload.customer.phone = "  ".to_owned();
        let err = payload.validate().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("name"));
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_delivery_address_required_when_needed() {
        let mut payload = sample_payload();
        payload.customer.needs_delivery = true;
        assert!(payload.validate().is_err());

        payload.customer.delivery_address = Some("  ".to_owned());
        assert!(payload.validate().is_err());

        payload.customer.delivery_address = Some("12 Dock Rd, Newcastle".to_owned());
        payload.validate().unwrap();
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut payload = sample_payload();
        payload.items.clear();
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("No items"));
    }

    #[test]
    fn test_item_without_selections_rejected() {
        let mut payload = sample_payload();
        payload.items[0].selections.clear();
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("Item #1"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last@sub.example.co"));
        assert!(!validate_email("user"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@@example.com"));
        assert!(!validate_email("us er@example.com"));
        assert!(!validate_email("user@example."));
    }

    #[test]
    fn test_local_sink_confirms_and_echoes() {
        let sink = LocalOrderSink::new();
        let payload = sample_payload();
        let confirmation = sink.submit_order(&payload).unwrap();
        assert!(confirmation.order_id.starts_with("ORD-"));
        assert_eq!(confirmation.estimated_response, "24 hours");
        assert_eq!(confirmation.items, payload.items);
        assert_eq!(confirmation.customer, payload.customer);
        assert!(!confirmation.email_sent);
    }

    #[test]
    fn test_local_sink_rejects_invalid_before_side_effects() {
        let sink = LocalOrderSink::new();
        let mut payload = sample_payload();
        payload.customer.email = "not-an-email".to_owned();
        let err = sink.submit_order(&payload).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_summary_contains_item_and_custom_fields() {
        let mut payload = sample_payload();
        payload.items[0]
            .selections
            .insert("Choose A Material of Construction".to_owned(), "Monel 400".to_owned());
        let summary = format_order_summary(&payload, "ORD-TEST");
        assert!(summary.contains("Order ID: ORD-TEST"));
        assert!(summary.contains("Item 1: ACE-YS62-SS-2 (ID: YS-SS-150-2)"));
        assert!(summary.contains("- Choose A Material of Construction: Monel 400"));
        assert!(summary.contains("Quantity: 2"));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_string(&sample_payload()).unwrap();
        assert!(json.contains("\"productId\""));
        assert!(json.contains("\"isSpecialOrder\""));
        assert!(json.contains("\"needsDelivery\""));
        assert!(!json.contains("\"deliveryAddress\""));
    }
}
