//! Article catalog repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Article;

const ARTICLE_COLUMNS: &str = "id, code, designation, prix, stock, created_at";

/// Repository for catalog lookups driven by article scans.
pub struct ArticleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an article by its reference code.
    ///
    /// Scanned references do not always match the catalog casing, so
    /// the lookup tries an exact match first, then a case-insensitive
    /// one, then a contains match as a last resort.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Article>, RepositoryError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let exact = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool)
        .await?;
        if exact.is_some() {
            return Ok(exact);
        }

        let folded = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE code ILIKE $1 LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(self.pool)
        .await?;
        if folded.is_some() {
            return Ok(folded);
        }

        let contains = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE code ILIKE '%' || $1 || '%' \
             ORDER BY code LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(self.pool)
        .await?;
        Ok(contains)
    }
}
