//! Persisted order record.
//!
//! Orders are append-only: inserted once by the submission pipeline
//! after the remote PDF/email dispatch succeeds, immutable thereafter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use etn_core::ClientCode;

/// One line item embedded in an order's `items` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Article reference code.
    pub code: String,
    /// Human-readable label.
    pub designation: String,
    /// Ordered quantity.
    pub quantity: u32,
}

/// The `items` JSON column shape: `{products: [...], total_items: n}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItems {
    /// Ordered sequence of line items.
    pub products: Vec<OrderItem>,
    /// Sum of line quantities, denormalized for the back-office.
    pub total_items: u32,
}

impl OrderItems {
    /// Build the JSON column value from line items.
    #[must_use]
    pub fn new(products: Vec<OrderItem>) -> Self {
        let total_items = products.iter().map(|p| p.quantity).sum();
        Self {
            products,
            total_items,
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Database identifier.
    pub id: Uuid,
    /// Code of the client who placed the order.
    pub client_code: ClientCode,
    /// First name entered on the order form.
    pub first_name: String,
    /// Last name entered on the order form.
    pub last_name: String,
    /// User-supplied order number; uniqueness is not enforced.
    pub order_number: String,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Embedded line items.
    pub items: OrderItems,
    /// Insertion timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_items_totals_quantities() {
        let items = OrderItems::new(vec![
            OrderItem {
                code: "A1".to_owned(),
                designation: "Gants".to_owned(),
                quantity: 2,
            },
            OrderItem {
                code: "B2".to_owned(),
                designation: "Visserie".to_owned(),
                quantity: 3,
            },
        ]);
        assert_eq!(items.total_items, 5);
    }

    #[test]
    fn order_items_json_shape() {
        let items = OrderItems::new(vec![OrderItem {
            code: "A1".to_owned(),
            designation: "Gants".to_owned(),
            quantity: 2,
        }]);
        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json["total_items"], 2);
        assert_eq!(json["products"][0]["code"], "A1");
        assert_eq!(json["products"][0]["quantity"], 2);
    }
}
