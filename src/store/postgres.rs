use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{Concepto, ConceptoDraft, ConceptoStats, ConceptoUpdate};
use crate::store::traits::ConceptoStore;

/// PostgreSQL-backed store. Ids come from a `BIGSERIAL` sequence, so after
/// deletions the sequence keeps advancing where the file store would rescan
/// the max; ids are opaque to clients, so the divergence is acceptable.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Bootstrap the conceptos table. Runs at startup; `IF NOT EXISTS` keeps
    /// it idempotent across restarts.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conceptos (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create conceptos table")?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn concepto_from_row(row: &sqlx::postgres::PgRow) -> Concepto {
        Concepto {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
        }
    }

    // %term% with the LIKE metacharacters in the term itself escaped.
    fn like_pattern(term: &str) -> String {
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }
}

#[async_trait::async_trait]
impl ConceptoStore for PostgresStore {
    async fn list_all(&self) -> Result<Vec<Concepto>> {
        let rows = sqlx::query("SELECT id, name, description FROM conceptos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list conceptos")?;

        Ok(rows.iter().map(Self::concepto_from_row).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Concepto>> {
        let row = sqlx::query("SELECT id, name, description FROM conceptos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch concepto")?;

        Ok(row.as_ref().map(Self::concepto_from_row))
    }

    async fn insert(&self, draft: ConceptoDraft) -> Result<Concepto> {
        let row = sqlx::query(
            "INSERT INTO conceptos (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert concepto")?;

        Ok(Self::concepto_from_row(&row))
    }

    async fn update_by_id(&self, id: i64, patch: ConceptoUpdate) -> Result<Option<Concepto>> {
        let row = sqlx::query(
            r#"
            UPDATE conceptos
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update concepto")?;

        Ok(row.as_ref().map(Self::concepto_from_row))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conceptos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete concepto")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM conceptos")
            .execute(&self.pool)
            .await
            .context("Failed to delete conceptos")?;

        Ok(result.rows_affected())
    }

    async fn search(&self, term: &str) -> Result<Vec<Concepto>> {
        let pattern = Self::like_pattern(term);
        let rows = sqlx::query(
            r#"
            SELECT id, name, description FROM conceptos
            WHERE name ILIKE $1 OR description ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .context("Failed to search conceptos")?;

        Ok(rows.iter().map(Self::concepto_from_row).collect())
    }

    async fn stats(&self) -> Result<ConceptoStats> {
        let row = sqlx::query("SELECT COUNT(*) AS count, MAX(id) AS last_id FROM conceptos")
            .fetch_one(&self.pool)
            .await
            .context("Failed to compute concepto stats")?;

        let count: i64 = row.get("count");
        Ok(ConceptoStats {
            count: count as u64,
            last_id: row.get("last_id"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(PostgresStore::like_pattern("abc"), "%abc%");
        assert_eq!(PostgresStore::like_pattern("50%"), "%50\\%%");
        assert_eq!(PostgresStore::like_pattern("a_b"), "%a\\_b%");
        assert_eq!(PostgresStore::like_pattern("a\\b"), "%a\\\\b%");
    }
}
