use pretty_assertions::assert_eq;
use reshub::io::storage::{HubStorage, decode, encode};
use reshub::model::{Category, ResourceId};
use reshub::ops::store::ResourceStore;
use std::fs;
use std::path::Path;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

#[test]
fn current_record_round_trips_byte_for_byte() {
    let source = fixture("v1.json");
    let snapshot = decode(&source).unwrap();
    assert_eq!(snapshot.migrated_from, None);
    assert_eq!(snapshot.next_id, 4);
    assert_eq!(encode(&snapshot.resources, snapshot.next_id), source);
}

#[test]
fn legacy_array_is_upgraded_in_order() {
    let snapshot = decode(&fixture("legacy.json")).unwrap();
    assert_eq!(snapshot.migrated_from, Some(0));
    assert_eq!(snapshot.next_id, 4);

    let summary: Vec<(ResourceId, &str, Category)> = snapshot
        .resources
        .iter()
        .map(|r| (r.id, r.title(), r.category()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ResourceId(1), "Dribbble", Category::Inspiration),
            (ResourceId(2), "MDN", Category::Development),
            (ResourceId(3), "Notion", Category::Productivity),
        ]
    );
    // Missing description reads as empty
    assert_eq!(snapshot.resources[2].description(), "");
    assert_eq!(snapshot.resources[0].added, None);
}

#[test]
fn upgraded_record_is_rewritten_on_first_change() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("resources.json"), fixture("legacy.json")).unwrap();

    let storage = HubStorage::new(tmp.path(), "resources.json");
    let (mut store, warning) = ResourceStore::open(storage.clone(), Category::Design);
    assert!(warning.is_none());

    // Loading alone leaves the legacy file untouched
    assert_eq!(
        fs::read_to_string(storage.path()).unwrap(),
        fixture("legacy.json")
    );

    store.delete(ResourceId(2)).unwrap();
    let rewritten = decode(&fs::read_to_string(storage.path()).unwrap()).unwrap();
    assert_eq!(rewritten.migrated_from, None);
    assert_eq!(rewritten.next_id, 4);
    let titles: Vec<&str> = rewritten.resources.iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Dribbble", "Notion"]);
}

#[test]
fn reopened_store_matches_saved_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("resources.json"), fixture("v1.json")).unwrap();
    let storage = HubStorage::new(tmp.path(), "resources.json");

    let (mut store, _) = ResourceStore::open(storage.clone(), Category::Design);
    store.begin_edit(ResourceId(2)).unwrap();
    store
        .update_draft_field_named("description", "The book")
        .unwrap();
    store.submit().unwrap();
    store.begin_add();
    store.update_draft_field_named("title", "Coolors").unwrap();
    store.update_draft_field_named("link", "https://coolors.co").unwrap();
    store.update_draft_field_named("category", "inspiration").unwrap();
    let new_id = store.submit().unwrap();
    assert_eq!(new_id, ResourceId(4));

    let (reopened, warning) = ResourceStore::open(storage, Category::Design);
    assert!(warning.is_none());
    assert_eq!(reopened.resources(), store.resources());
    assert_eq!(reopened.resources()[0].title(), "Coolors");
    assert_eq!(reopened.get(ResourceId(2)).unwrap().description(), "The book");
}
