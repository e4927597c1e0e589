//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use etn_core::Quantity;

use super::Article;

/// One article-and-quantity entry in the cart.
///
/// The article code is the line's stable identity: scanning the same
/// article twice merges quantities instead of appending a second line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Article reference code (line identity).
    pub article_code: String,
    /// Human-readable label.
    pub designation: String,
    /// Quantity, strictly positive.
    pub quantity: Quantity,
    /// Unit price at the time the article was added.
    pub unit_price: Decimal,
    /// Known stock upper bound; `None` when stock is not tracked.
    pub stock_limit: Option<u32>,
}

impl CartLine {
    /// Build a line from a catalog article and a requested quantity.
    #[must_use]
    pub fn from_article(article: &Article, quantity: Quantity) -> Self {
        Self {
            article_code: article.code.clone(),
            designation: article.designation.clone(),
            quantity,
            unit_price: article.prix,
            stock_limit: article.stock_limit(),
        }
    }

    /// Line total (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity.get())
    }
}
