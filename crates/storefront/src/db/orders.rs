//! Order history repository and back-office aggregates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use etn_core::ClientCode;

use super::RepositoryError;
use crate::models::{Order, OrderItems};

/// Raw `orders` row, converted to [`Order`] on read.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    client_id: String,
    first_name: String,
    last_name: String,
    order_number: String,
    comment: Option<String>,
    items: Json<OrderItems>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let client_code = ClientCode::parse(&self.client_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid client code in database: {e}"))
        })?;
        Ok(Order {
            id: self.id,
            client_code,
            first_name: self.first_name,
            last_name: self.last_name,
            order_number: self.order_number,
            comment: self.comment,
            items: self.items.0,
            created_at: self.created_at,
        })
    }
}

/// Aggregation bucket size for the back-office charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    /// One bucket per calendar day.
    #[default]
    Day,
    /// One bucket per ISO week.
    Week,
    /// One bucket per calendar month.
    Month,
}

impl StatsPeriod {
    /// `date_trunc` unit for this period.
    #[must_use]
    pub const fn as_trunc_unit(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// Order count for one period bucket.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PeriodCount {
    /// Start of the bucket.
    pub bucket: DateTime<Utc>,
    /// Number of orders in the bucket.
    pub orders: i64,
}

/// Order count for one client.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClientOrderCount {
    /// Client code.
    pub client_id: String,
    /// Client display name (falls back to the code when the directory
    /// has no matching row).
    pub name: String,
    /// Number of orders placed.
    pub orders: i64,
}

/// Login count for one day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyLogins {
    /// Calendar day.
    pub date: NaiveDate,
    /// Distinct clients who logged in that day.
    pub logins: i64,
}

/// Commented/uncommented order split.
#[derive(Debug, Clone, Serialize)]
pub struct CommentSplit {
    /// Orders carrying a non-blank comment.
    pub commented: i64,
    /// Orders without one.
    pub uncommented: i64,
}

/// Repository for order persistence and aggregates.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order row.
    ///
    /// Plain insert, not an upsert: duplicate order numbers are
    /// permitted and not deduplicated at this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        client_code: &ClientCode,
        first_name: &str,
        last_name: &str,
        order_number: &str,
        comment: Option<&str>,
        items: &OrderItems,
    ) -> Result<(Uuid, DateTime<Utc>), RepositoryError> {
        let (id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r"
            INSERT INTO orders (client_id, first_name, last_name, order_number, comment, items)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, created_at
            ",
        )
        .bind(client_code.as_str())
        .bind(first_name)
        .bind(last_name)
        .bind(order_number)
        .bind(comment)
        .bind(Json(items))
        .fetch_one(self.pool)
        .await?;
        Ok((id, created_at))
    }

    /// Order history for one client, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_client(
        &self,
        client_code: &ClientCode,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, client_id, first_name, last_name, order_number,
                   comment, items, created_at
            FROM orders
            WHERE client_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(client_code.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Look up one order by its user-supplied number.
    ///
    /// Order numbers are not unique; the newest match wins, matching
    /// what the PDF retrieval endpoint renders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, client_id, first_name, last_name, order_number,
                   comment, items, created_at
            FROM orders
            WHERE order_number = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(order_number)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Order counts bucketed by period, oldest bucket first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts_by_period(
        &self,
        period: StatsPeriod,
    ) -> Result<Vec<PeriodCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, PeriodCount>(
            r"
            SELECT date_trunc($1, created_at) AS bucket, count(*) AS orders
            FROM orders
            GROUP BY 1
            ORDER BY 1
            ",
        )
        .bind(period.as_trunc_unit())
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// The five clients with the most orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_clients(&self) -> Result<Vec<ClientOrderCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClientOrderCount>(
            r"
            SELECT o.client_id,
                   coalesce(c.nom, o.client_id) AS name,
                   count(*) AS orders
            FROM orders o
            LEFT JOIN clients c ON c.code_client = o.client_id
            GROUP BY o.client_id, c.nom
            ORDER BY orders DESC, o.client_id
            LIMIT 5
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Split of orders with and without a non-blank comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn comment_split(&self) -> Result<CommentSplit, RepositoryError> {
        let (commented, total) = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT count(*) FILTER (WHERE comment IS NOT NULL AND btrim(comment) <> ''),
                   count(*)
            FROM orders
            ",
        )
        .fetch_one(self.pool)
        .await?;
        Ok(CommentSplit {
            commented,
            uncommented: total - commented,
        })
    }

    /// Daily login counts for the last 30 recorded days, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_logins(&self) -> Result<Vec<DailyLogins>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyLogins>(
            r"
            SELECT date, count(*) AS logins
            FROM logins
            GROUP BY date
            ORDER BY date DESC
            LIMIT 30
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
