use thiserror::Error;

use crate::model::{Concepto, ConceptoDraft, ConceptoStats, ConceptoUpdate, NewConcepto};
use crate::store::traits::ConceptoStore;

/// Outcomes of a concepto operation that the API layer maps onto status
/// codes: validation -> 400, not-found -> 404, storage -> 500.
#[derive(Debug, Error)]
pub enum ConceptoError {
    #[error("{0}")]
    Validation(String),
    #[error("concepto {id} no encontrado")]
    NotFound { id: i64 },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Validates the payload and delegates id assignment to the store.
/// `description` defaults to the empty string when absent.
pub async fn create<S: ConceptoStore>(
    store: &S,
    input: NewConcepto,
) -> Result<Concepto, ConceptoError> {
    let name = input.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ConceptoError::Validation(
            "El campo \"name\" es requerido y no puede estar vacío".to_string(),
        ));
    }

    let draft = ConceptoDraft {
        name: name.to_string(),
        description: input.description.unwrap_or_default(),
    };

    Ok(store.insert(draft).await?)
}

pub async fn get_all<S: ConceptoStore>(store: &S) -> Result<Vec<Concepto>, ConceptoError> {
    Ok(store.list_all().await?)
}

pub async fn get_by_id<S: ConceptoStore>(store: &S, id: i64) -> Result<Concepto, ConceptoError> {
    store
        .find_by_id(id)
        .await?
        .ok_or(ConceptoError::NotFound { id })
}

/// Applies only the provided fields. An omitted name leaves the stored one
/// untouched; a provided name must not be blank.
pub async fn update<S: ConceptoStore>(
    store: &S,
    id: i64,
    mut patch: ConceptoUpdate,
) -> Result<Concepto, ConceptoError> {
    if let Some(name) = &patch.name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConceptoError::Validation(
                "El campo \"name\" no puede estar vacío".to_string(),
            ));
        }
        patch.name = Some(trimmed.to_string());
    }

    store
        .update_by_id(id, patch)
        .await?
        .ok_or(ConceptoError::NotFound { id })
}

pub async fn delete_one<S: ConceptoStore>(store: &S, id: i64) -> Result<(), ConceptoError> {
    if store.delete_by_id(id).await? {
        Ok(())
    } else {
        Err(ConceptoError::NotFound { id })
    }
}

pub async fn delete_all<S: ConceptoStore>(store: &S) -> Result<u64, ConceptoError> {
    Ok(store.delete_all().await?)
}

/// The search term is a required, non-blank query parameter.
pub async fn search<S: ConceptoStore>(
    store: &S,
    term: Option<&str>,
) -> Result<Vec<Concepto>, ConceptoError> {
    let term = term.map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(ConceptoError::Validation(
            "Parámetro de búsqueda \"q\" es requerido".to_string(),
        ));
    }

    Ok(store.search(term).await?)
}

pub async fn stats<S: ConceptoStore>(store: &S) -> Result<ConceptoStats, ConceptoError> {
    Ok(store.stats().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::file::JsonFileStore;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("conceptos.json"))
    }

    fn nuevo(name: &str, description: &str) -> NewConcepto {
        NewConcepto {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
        }
    }

    #[tokio::test]
    async fn create_rejects_missing_or_blank_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for input in [
            NewConcepto::default(),
            nuevo("", "something"),
            nuevo("   ", "something"),
        ] {
            let result = create(&store, input).await;
            assert!(matches!(result, Err(ConceptoError::Validation(_))));
        }

        // Nothing was persisted by the rejected attempts.
        assert_eq!(stats(&store).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn create_defaults_description_and_trims_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let created = create(
            &store,
            NewConcepto {
                name: Some("  Recursion  ".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(created.name, "Recursion");
        assert_eq!(created.description, "");
        assert_eq!(get_by_id(&store, created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_patches_only_provided_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let created = create(&store, nuevo("Recursion", "a function calling itself"))
            .await
            .unwrap();

        let updated = update(
            &store,
            created.id,
            ConceptoUpdate {
                name: Some("Recursión".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Recursión");
        assert_eq!(updated.description, "a function calling itself");
    }

    #[tokio::test]
    async fn update_rejects_blank_name_and_unknown_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let created = create(&store, nuevo("Recursion", "")).await.unwrap();

        let blank = update(
            &store,
            created.id,
            ConceptoUpdate {
                name: Some("  ".to_string()),
                description: None,
            },
        )
        .await;
        assert!(matches!(blank, Err(ConceptoError::Validation(_))));

        let missing = update(&store, 999, ConceptoUpdate::default()).await;
        assert!(matches!(missing, Err(ConceptoError::NotFound { id: 999 })));
    }

    #[tokio::test]
    async fn search_requires_a_term_and_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        create(&store, nuevo("Recursion", "a FUNCTION calling itself"))
            .await
            .unwrap();
        create(&store, nuevo("Trait", "shared behaviour")).await.unwrap();

        for term in [None, Some(""), Some("   ")] {
            let result = search(&store, term).await;
            assert!(matches!(result, Err(ConceptoError::Validation(_))));
        }

        let matches = search(&store, Some("function")).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Recursion");

        assert!(search(&store, Some("zzz")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_one_reports_not_found_for_unknown_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let result = delete_one(&store, 7).await;
        assert!(matches!(result, Err(ConceptoError::NotFound { id: 7 })));
    }
}
