//! Cart store.
//!
//! Per-device line-item collection, serialized into the tower-session
//! between requests. All operations are synchronous; every rejected
//! mutation leaves the cart untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use etn_core::Quantity;

use crate::models::CartLine;

/// Errors surfaced by cart mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The resulting quantity would exceed the known stock limit.
    #[error("stock insuffisant: maximum disponible {available}")]
    StockInsufficient {
        /// Maximum quantity the stock allows.
        available: u32,
    },
    /// A quantity edit targeted a line that is not in the cart.
    #[error("article {0} is not in the cart")]
    UnknownLine(String),
}

/// The pending order's line items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, l| acc.saturating_add(l.quantity.get()))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add a line, merging quantities when the article is already in
    /// the cart.
    ///
    /// The stock check applies identically to the merged quantity and
    /// to a first insert: when a limit is known and the resulting
    /// quantity exceeds it, the mutation is rejected and the cart is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StockInsufficient`] naming the maximum
    /// allowed quantity.
    pub fn add_line(&mut self, candidate: CartLine) -> Result<(), CartError> {
        match self
            .lines
            .iter_mut()
            .find(|l| l.article_code == candidate.article_code)
        {
            Some(existing) => {
                let merged = existing.quantity.saturating_add(candidate.quantity);
                check_stock(merged, candidate.stock_limit)?;
                existing.quantity = merged;
            }
            None => {
                check_stock(candidate.quantity, candidate.stock_limit)?;
                self.lines.push(candidate);
            }
        }
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// Quantities are strictly positive by construction ([`Quantity`]);
    /// a requested edit to zero or below is rejected upstream rather
    /// than silently clamped.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] when the article is not in
    /// the cart, or [`CartError::StockInsufficient`] when the new
    /// quantity exceeds the known limit.
    pub fn update_quantity(
        &mut self,
        article_code: &str,
        quantity: Quantity,
    ) -> Result<(), CartError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.article_code == article_code)
            .ok_or_else(|| CartError::UnknownLine(article_code.to_owned()))?;
        check_stock(quantity, line.stock_limit)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line. A no-op (not an error) when the article is absent.
    pub fn remove_line(&mut self, article_code: &str) {
        self.lines.retain(|l| l.article_code != article_code);
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Reject a quantity exceeding a known stock limit.
fn check_stock(quantity: Quantity, stock_limit: Option<u32>) -> Result<(), CartError> {
    if let Some(available) = stock_limit
        && quantity.get() > available
    {
        return Err(CartError::StockInsufficient { available });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(code: &str, qty: u32, stock: Option<u32>) -> CartLine {
        CartLine {
            article_code: code.to_owned(),
            designation: format!("Article {code}"),
            quantity: Quantity::new(i64::from(qty)).unwrap(),
            unit_price: Decimal::new(1000, 2),
            stock_limit: stock,
        }
    }

    #[test]
    fn add_appends_new_line() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, None)).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn add_merges_quantities_for_same_article() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, Some(10))).unwrap();
        cart.add_line(line("A1", 3, Some(10))).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity.get(), 5);
    }

    #[test]
    fn merge_exceeding_stock_is_rejected_and_state_unchanged() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, Some(4))).unwrap();
        let err = cart.add_line(line("A1", 3, Some(4))).unwrap_err();
        assert_eq!(err, CartError::StockInsufficient { available: 4 });
        assert_eq!(cart.lines()[0].quantity.get(), 2);
    }

    #[test]
    fn first_insert_exceeding_stock_is_rejected() {
        let mut cart = CartStore::new();
        let err = cart.add_line(line("A1", 5, Some(4))).unwrap_err();
        assert_eq!(err, CartError::StockInsufficient { available: 4 });
        assert!(cart.is_empty());
    }

    #[test]
    fn depleted_stock_rejects_any_add() {
        let mut cart = CartStore::new();
        let err = cart.add_line(line("A1", 1, Some(0))).unwrap_err();
        assert_eq!(err, CartError::StockInsufficient { available: 0 });
        assert!(cart.is_empty());
    }

    #[test]
    fn unknown_stock_means_no_limit() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 999, None)).unwrap();
        cart.update_quantity("A1", Quantity::new(5000).unwrap())
            .unwrap();
        assert_eq!(cart.lines()[0].quantity.get(), 5000);
    }

    #[test]
    fn update_quantity_enforces_stock() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, Some(4))).unwrap();
        let err = cart
            .update_quantity("A1", Quantity::new(5).unwrap())
            .unwrap_err();
        assert_eq!(err, CartError::StockInsufficient { available: 4 });
        assert_eq!(cart.lines()[0].quantity.get(), 2);
    }

    #[test]
    fn update_quantity_on_absent_line_errors() {
        let mut cart = CartStore::new();
        let err = cart
            .update_quantity("GHOST", Quantity::ONE)
            .unwrap_err();
        assert_eq!(err, CartError::UnknownLine("GHOST".to_owned()));
    }

    #[test]
    fn remove_absent_line_is_a_silent_noop() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, None)).unwrap();
        cart.remove_line("GHOST");
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn remove_then_clear() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, None)).unwrap();
        cart.add_line(line("B2", 1, None)).unwrap();
        cart.remove_line("A1");
        assert_eq!(cart.lines().len(), 1);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn no_two_lines_share_an_article_code() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 1, None)).unwrap();
        cart.add_line(line("A1", 1, None)).unwrap();
        cart.add_line(line("B2", 1, None)).unwrap();
        let mut codes: Vec<_> = cart.lines().iter().map(|l| l.article_code.clone()).collect();
        codes.dedup();
        assert_eq!(codes.len(), cart.lines().len());
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let mut cart = CartStore::new();
        cart.add_line(line("A1", 2, None)).unwrap();
        cart.add_line(line("B2", 1, None)).unwrap();
        // 3 units at 10.00 each
        assert_eq!(cart.subtotal(), Decimal::new(3000, 2));
    }
}
