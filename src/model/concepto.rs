use serde::{Deserialize, Serialize};

/// The single domain entity: a named glossary record with a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concepto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request payload for creating a concepto. The id is always assigned by the
/// storage backend; there is no field for the client to supply one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewConcepto {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A validated concepto ready for insertion, still without an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptoDraft {
    pub name: String,
    pub description: String,
}

/// Partial update: only the provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConceptoUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Aggregate counters reported by the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptoStats {
    pub count: u64,
    /// Highest id currently stored; `None` when the collection is empty.
    pub last_id: Option<i64>,
}
