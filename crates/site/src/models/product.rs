//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use maplewood_core::ProductId;

/// A catalog product.
///
/// Created, edited, and deleted only through admin operations. Inactive
/// products are excluded from the public catalog and from cart-add.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in the site currency's standard unit. Never negative.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can be added to a cart or ordered.
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        self.active
    }
}

/// Validation errors for product input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("price must not be negative")]
    NegativePrice,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProduct {
    /// Validate the catalog invariants (`price >= 0`, non-empty name).
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError` on violation.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.price < Decimal::ZERO {
            return Err(ProductValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// Input for updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// Validate the catalog invariants (`price >= 0`, non-empty name).
    ///
    /// # Errors
    ///
    /// Returns `ProductValidationError` on violation.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.price < Decimal::ZERO {
            return Err(ProductValidationError::NegativePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_rejects_negative_price() {
        let input = NewProduct {
            name: "Vitamin D3".to_string(),
            description: String::new(),
            price: Decimal::new(-100, 2),
            image_url: None,
        };
        assert_eq!(
            input.validate(),
            Err(ProductValidationError::NegativePrice)
        );
    }

    #[test]
    fn test_new_product_rejects_blank_name() {
        let input = NewProduct {
            name: "   ".to_string(),
            description: String::new(),
            price: Decimal::new(100, 0),
            image_url: None,
        };
        assert_eq!(input.validate(), Err(ProductValidationError::EmptyName));
    }

    #[test]
    fn test_new_product_accepts_zero_price() {
        let input = NewProduct {
            name: "Consultation voucher".to_string(),
            description: String::new(),
            price: Decimal::ZERO,
            image_url: None,
        };
        assert!(input.validate().is_ok());
    }
}
