//! Order ledger models.
//!
//! An order is the persisted record of one checkout attempt. Its line items
//! are snapshotted at order-creation time (product id, name, unit price,
//! quantity) so later catalog edits never alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use maplewood_core::{Email, EmailError, OrderId, OrderItemId, OrderStatus, ProductId};

/// A persisted order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Gateway receipt reference, unique per order.
    pub receipt: String,
    pub customer_name: String,
    pub customer_email: Email,
    pub customer_phone: Option<String>,
    /// Total amount frozen at creation time.
    pub total: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    /// Remote payment-intent identifier from the gateway.
    pub gateway_order_id: String,
    /// Payment identifier recorded at verification.
    pub gateway_payment_id: Option<String>,
    /// Callback signature recorded at verification.
    pub gateway_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A snapshotted order line.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Weak reference; the product may no longer exist.
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Customer contact fields captured at checkout.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
}

/// Validation errors for checkout contact fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl CustomerDetails {
    /// Validate raw checkout input into customer details.
    ///
    /// Name and phone are trimmed; a blank phone becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `CustomerValidationError` if the name is blank or the email
    /// doesn't parse.
    pub fn parse(
        name: &str,
        email: &str,
        phone: Option<String>,
    ) -> Result<Self, CustomerValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerValidationError::EmptyName);
        }

        let email = Email::parse(email)?;
        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            name: name.to_string(),
            email,
            phone,
        })
    }
}

/// One line of an order draft, frozen from the catalog at draft time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl SnapshotLine {
    /// Line subtotal (`unit_price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An order ready to be persisted, before the gateway intent exists.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer: CustomerDetails,
    pub lines: Vec<SnapshotLine>,
    pub total: Decimal,
    pub receipt: String,
}

/// Generate a receipt reference for a new order draft.
#[must_use]
pub fn generate_receipt() -> String {
    let suffix: u32 = rand::random();
    format!("rcpt_{suffix:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_line_subtotal() {
        let line = SnapshotLine {
            product_id: ProductId::new(1),
            name: "Vitamin D3".to_string(),
            unit_price: Decimal::new(100, 0),
            quantity: 2,
        };
        assert_eq!(line.subtotal(), Decimal::new(200, 0));
    }

    #[test]
    fn test_customer_details_parse() {
        let customer =
            CustomerDetails::parse("  Asha Rao ", "asha@example.com", Some("  ".to_string()))
                .expect("valid input");
        assert_eq!(customer.name, "Asha Rao");
        assert_eq!(customer.email.as_str(), "asha@example.com");
        assert_eq!(customer.phone, None);

        assert!(matches!(
            CustomerDetails::parse("   ", "asha@example.com", None),
            Err(CustomerValidationError::EmptyName)
        ));
        assert!(matches!(
            CustomerDetails::parse("Asha", "not-an-email", None),
            Err(CustomerValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_generate_receipt_format() {
        let receipt = generate_receipt();
        assert!(receipt.starts_with("rcpt_"));
        assert_eq!(receipt.len(), "rcpt_".len() + 8);
    }
}
