use crate::model::{Concepto, ConceptoDraft, ConceptoStats, ConceptoUpdate};
use anyhow::Result;

/// Persistence contract shared by the file-backed and PostgreSQL stores.
/// Both implementations must expose identical semantics; only id sequencing
/// is allowed to diverge after deletions (max-scan vs. sequence).
#[async_trait::async_trait]
pub trait ConceptoStore: Send + Sync {
    /// Every stored record, in storage order. A missing backing file or
    /// table reads as an empty collection, never as an error.
    async fn list_all(&self) -> Result<Vec<Concepto>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Concepto>>;
    /// Persists the draft and returns it with the backend-assigned id.
    async fn insert(&self, draft: ConceptoDraft) -> Result<Concepto>;
    /// Applies only the provided fields. Returns `None` for an unknown id.
    async fn update_by_id(&self, id: i64, patch: ConceptoUpdate) -> Result<Option<Concepto>>;
    /// Returns whether a record was actually removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;
    /// Removes every record and returns the count removed.
    async fn delete_all(&self) -> Result<u64>;
    /// Case-insensitive substring match against name and description.
    async fn search(&self, term: &str) -> Result<Vec<Concepto>>;
    async fn stats(&self) -> Result<ConceptoStats>;
}
