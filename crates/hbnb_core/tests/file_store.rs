use hbnb_core::{
    AttributeInput, JsonFileStore, Record, RecordKind, RecordStore, StoreError, StoreKey,
};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(dir.path().join("file.json"))
}

fn read_json(store: &JsonFileStore) -> Value {
    serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap()
}

#[test]
fn persist_then_load_roundtrips_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);

    let mut place = Record::new(RecordKind::Place);
    place.set_attribute("name", AttributeInput::Raw("Loft".into()));
    place.set_attribute("max_guest", AttributeInput::Raw("4".into()));
    place.set_attribute("latitude", AttributeInput::Raw("37.77".into()));
    place.set_attribute("amenity_ids", AttributeInput::Raw("['a1', 'a2']".into()));
    let user = Record::new(RecordKind::User);
    store.register(place.clone()).unwrap();
    store.register(user.clone()).unwrap();
    store.persist().unwrap();

    let reopened = JsonFileStore::open(store.path().to_path_buf()).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(&place.key()), Some(&place));
    assert_eq!(reopened.get(&user.key()), Some(&user));

    let order: Vec<StoreKey> = reopened.all().map(Record::key).collect();
    assert_eq!(order, vec![place.key(), user.key()]);
}

#[test]
fn backing_file_uses_type_dot_id_keys_and_class_discriminator() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let state = Record::new(RecordKind::State);
    store.register(state.clone()).unwrap();
    store.persist().unwrap();

    let document = read_json(&store);
    let entry = &document[format!("State.{}", state.id)];
    assert_eq!(entry["__class__"], json!("State"));
    assert_eq!(entry["id"], json!(state.id));
    let created_at = entry["created_at"].as_str().unwrap();
    assert_eq!(created_at.len(), "2017-09-28T21:05:54.119427".len());
    assert_eq!(
        hbnb_core::model::record::parse_timestamp(created_at),
        Some(state.created_at)
    );
}

#[test]
fn load_drops_unknown_classes_and_accepts_timestamps_without_fraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.json");
    fs::write(
        &path,
        r#"{
            "Ghost.1": {"__class__": "Ghost", "id": "1"},
            "City.2": {"__class__": "City", "id": "2", "created_at": "2017-09-28T21:05:54",
                       "updated_at": "2017-09-28T21:05:54.119427", "name": "Paris"}
        }"#,
    )
    .unwrap();

    let store = JsonFileStore::open(path).unwrap();
    assert_eq!(store.len(), 1);
    let city = store.get(&StoreKey::new(RecordKind::City, "2")).unwrap();
    assert_eq!(city.attribute("name"), Some(&json!("Paris")));
    assert!(city.attribute("__class__").is_none());
}

#[test]
fn missing_file_loads_empty_and_empty_file_counts_as_empty_object() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("absent.json")).unwrap();
    assert!(store.is_empty());

    let path = dir.path().join("blank.json");
    fs::write(&path, "  \n").unwrap();
    assert!(JsonFileStore::open(path).unwrap().is_empty());
}

#[test]
fn malformed_json_is_fatal_and_keeps_previous_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let user = Record::new(RecordKind::User);
    store.register(user.clone()).unwrap();

    fs::write(store.path(), "{not json").unwrap();
    let err = store.reload().unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
    assert_eq!(store.get(&user.key()), Some(&user));
}

#[test]
fn entries_without_timestamps_are_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("file.json");
    fs::write(&path, r#"{"User.1": {"__class__": "User", "id": "1"}}"#).unwrap();

    let err = JsonFileStore::open(path).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn register_requires_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let mut record = Record::new(RecordKind::Amenity);
    record.id.clear();

    let err = store.register(record).unwrap_err();
    assert!(matches!(err, StoreError::MissingIdentifier(RecordKind::Amenity)));
    assert!(store.is_empty());
}

#[test]
fn persist_overwrites_previous_content_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let review = Record::new(RecordKind::Review);
    store.register(review.clone()).unwrap();
    store.persist().unwrap();

    assert_eq!(store.remove(&review.key()).unwrap().record, review);
    store.persist().unwrap();

    assert_eq!(read_json(&store), json!({}));
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("file.json")]);
}

#[test]
fn persist_into_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("missing").join("file.json"));
    store.register(Record::new(RecordKind::BaseModel)).unwrap();

    let err = store.persist().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
