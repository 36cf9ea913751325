//! Order ledger repository.
//!
//! Orders and their snapshotted line items are written in a single
//! transaction. The session cart is cleared separately by the caller, so a
//! crash between the two writes can leave a populated cart behind an order
//! that already exists.

use sqlx::PgPool;

use maplewood_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::order::{Order, OrderDraft, OrderItem};

const ORDER_COLUMNS: &str = r"id, receipt, customer_name, customer_email, customer_phone,
       total, currency, status, gateway_order_id, gateway_payment_id, gateway_signature,
       created_at, updated_at";

/// Convert a line quantity to the INTEGER column type.
///
/// A quantity the column cannot hold is rejected rather than clamped; a
/// truncated snapshot would no longer match the charged total.
fn quantity_to_db(quantity: u32) -> Result<i32, RepositoryError> {
    i32::try_from(quantity).map_err(|_| {
        RepositoryError::Conflict(format!("quantity {quantity} exceeds the supported range"))
    })
}

/// Repository for order ledger operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order draft and its line items in one transaction.
    ///
    /// The order starts in status `created` with the gateway intent already
    /// attached; nothing is written if any insert fails.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create(
        &self,
        draft: &OrderDraft,
        currency: &str,
        gateway_order_id: &str,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO "order"
                (receipt, customer_name, customer_email, customer_phone,
                 total, currency, gateway_order_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&draft.receipt)
        .bind(&draft.customer.name)
        .bind(&draft.customer.email)
        .bind(&draft.customer.phone)
        .bind(draft.total)
        .bind(currency)
        .bind(gateway_order_id)
        .fetch_one(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, name, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.unit_price)
            .bind(quantity_to_db(line.quantity)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM "order" WHERE id = $1"#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Get the snapshotted line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, name, unit_price, quantity
            FROM order_item
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// List orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM "order"
            WHERE $1::text IS NULL OR status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(status.map(|s| s.as_str().to_owned()))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Record a verified payment, moving the order to `paid`.
    ///
    /// Re-applying the same payment id converges to the same state, which
    /// makes verification idempotent at the ledger level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<Order, RepositoryError> {
        self.record_outcome(id, OrderStatus::Paid, payment_id, signature)
            .await
    }

    /// Record a failed verification, moving the order to `failed`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_failed(
        &self,
        id: OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<Order, RepositoryError> {
        self.record_outcome(id, OrderStatus::Failed, payment_id, signature)
            .await
    }

    async fn record_outcome(
        &self,
        id: OrderId,
        status: OrderStatus,
        payment_id: &str,
        signature: &str,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE "order"
            SET status = $2, gateway_payment_id = $3, gateway_signature = $4, updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(payment_id)
        .bind(signature)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_to_db_rejects_oversized() {
        assert_eq!(quantity_to_db(1).unwrap(), 1);
        assert_eq!(quantity_to_db(250).unwrap(), 250);
        assert!(matches!(
            quantity_to_db(u32::MAX),
            Err(RepositoryError::Conflict(_))
        ));
    }
}
