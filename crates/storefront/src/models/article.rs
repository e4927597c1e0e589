//! Article catalog entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable article from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    /// Database identifier.
    pub id: Uuid,
    /// Article reference code, as printed on article QR labels.
    pub code: String,
    /// Human-readable label.
    pub designation: String,
    /// Unit price.
    pub prix: Decimal,
    /// Known stock level; `None` means stock is not tracked and no
    /// limit is enforced on cart quantities.
    pub stock: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Article {
    /// Stock as a cart limit.
    ///
    /// `None` only when stock is not tracked; a zero or negative
    /// stored stock is a known limit of zero, so adds are rejected
    /// rather than unbounded.
    #[must_use]
    pub fn stock_limit(&self) -> Option<u32> {
        self.stock.map(|s| u32::try_from(s).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(stock: Option<i32>) -> Article {
        Article {
            id: Uuid::new_v4(),
            code: "VER-2040".to_owned(),
            designation: "Vérin hydraulique 20/40".to_owned(),
            prix: Decimal::new(18990, 2),
            stock,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn untracked_stock_has_no_limit() {
        assert_eq!(article(None).stock_limit(), None);
    }

    #[test]
    fn positive_stock_is_the_limit() {
        assert_eq!(article(Some(12)).stock_limit(), Some(12));
    }

    #[test]
    fn depleted_or_negative_stock_limits_to_zero() {
        assert_eq!(article(Some(0)).stock_limit(), Some(0));
        assert_eq!(article(Some(-3)).stock_limit(), Some(0));
    }
}
