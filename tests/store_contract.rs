//! One contract suite, both backends. The file store runs unconditionally in
//! a temp dir; the PostgreSQL store runs only when TEST_DATABASE_URL points
//! at a disposable database, and is skipped otherwise.

use conceptos_api::model::{ConceptoDraft, ConceptoUpdate};
use conceptos_api::store::{ConceptoStore, JsonFileStore, PostgresStore};
use tempfile::TempDir;

fn draft(name: &str, description: &str) -> ConceptoDraft {
    ConceptoDraft {
        name: name.to_string(),
        description: description.to_string(),
    }
}

async fn run_contract_suite<S: ConceptoStore>(store: &S) {
    // Starts empty
    assert!(store.list_all().await.unwrap().is_empty());
    assert_eq!(store.find_by_id(1).await.unwrap(), None);
    let initial = store.stats().await.unwrap();
    assert_eq!(initial.count, 0);
    assert_eq!(initial.last_id, None);

    // Sequential inserts assign distinct increasing ids
    let a = store.insert(draft("Recursion", "a function calling itself")).await.unwrap();
    let b = store.insert(draft("Closure", "captures its environment")).await.unwrap();
    let c = store.insert(draft("Trait", "shared behaviour contract")).await.unwrap();
    assert!(a.id > 0);
    assert!(b.id > a.id);
    assert!(c.id > b.id);

    // Insert then find yields an equal record
    assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a.clone()));

    // list_all holds everything in storage order
    let all = store.list_all().await.unwrap();
    assert_eq!(all, vec![a.clone(), b.clone(), c.clone()]);

    // Update applies only provided fields
    let updated = store
        .update_by_id(
            b.id,
            ConceptoUpdate {
                name: Some("Clausura".to_string()),
                description: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Clausura");
    assert_eq!(updated.description, "captures its environment");

    // An all-empty patch changes nothing
    let untouched = store
        .update_by_id(a.id, ConceptoUpdate::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched, a);

    // Unknown ids are absent, not errors
    assert_eq!(store.update_by_id(99_999, ConceptoUpdate::default()).await.unwrap(), None);
    assert!(!store.delete_by_id(99_999).await.unwrap());

    // Case-insensitive substring search over name and description
    let hits = store.search("FUNCTION").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, a.id);
    let hits = store.search("clausura").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, b.id);
    assert!(store.search("no-such-term").await.unwrap().is_empty());

    // Stats track count and the highest stored id
    let stats = store.stats().await.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.last_id, Some(c.id));

    // Deleting a record removes exactly that record
    assert!(store.delete_by_id(b.id).await.unwrap());
    assert_eq!(store.find_by_id(b.id).await.unwrap(), None);
    assert_eq!(store.list_all().await.unwrap().len(), 2);

    // A new insert never reuses an id below the stored maximum
    let d = store.insert(draft("Borrowing", "")).await.unwrap();
    assert!(d.id > c.id);

    // delete_all reports the count and leaves an empty collection
    assert_eq!(store.delete_all().await.unwrap(), 3);
    assert!(store.list_all().await.unwrap().is_empty());
    assert_eq!(store.stats().await.unwrap().count, 0);
    assert_eq!(store.delete_all().await.unwrap(), 0);
}

#[tokio::test]
async fn file_store_honors_the_contract() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("conceptos.json"));
    run_contract_suite(&store).await;
}

#[tokio::test]
async fn postgres_store_honors_the_contract() {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL contract suite");
        return;
    };

    let store = PostgresStore::new(&url, 5).await.unwrap();
    store.migrate().await.unwrap();
    store.delete_all().await.unwrap();

    run_contract_suite(&store).await;
}
