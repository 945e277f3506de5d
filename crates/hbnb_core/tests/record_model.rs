use hbnb_core::{AttributeInput, FieldType, Record, RecordKind};
use serde_json::json;
use std::collections::HashSet;

#[test]
fn new_records_get_unique_uuid_ids_and_equal_timestamps() {
    let ids: HashSet<String> = (0..64).map(|_| Record::new(RecordKind::User).id).collect();
    assert_eq!(ids.len(), 64);

    let record = Record::new(RecordKind::State);
    assert!(uuid::Uuid::parse_str(&record.id).is_ok());
    assert_eq!(record.created_at, record.updated_at);
    assert!(record.attributes.is_empty());
}

#[test]
fn touch_moves_only_updated_at() {
    let mut record = Record::new(RecordKind::City);
    let created_at = record.created_at;
    std::thread::sleep(std::time::Duration::from_millis(2));
    record.touch();
    assert_eq!(record.created_at, created_at);
    assert!(record.updated_at > created_at);
}

#[test]
fn protected_attributes_are_never_written() {
    let mut record = Record::new(RecordKind::User);
    let before = record.clone();
    for name in ["id", "created_at", "updated_at", "__class__"] {
        assert!(!record.set_attribute(name, AttributeInput::Raw("x".into())));
    }
    assert_eq!(record, before);
}

#[test]
fn raw_values_follow_declared_then_existing_type() {
    let mut place = Record::new(RecordKind::Place);
    place.set_attribute("number_rooms", AttributeInput::Raw("3".into()));
    place.set_attribute("longitude", AttributeInput::Raw("2".into()));
    place.set_attribute("name", AttributeInput::Raw("42".into()));
    assert_eq!(place.attribute("number_rooms"), Some(&json!(3)));
    assert_eq!(place.attribute("longitude"), Some(&json!(2.0)));
    assert_eq!(place.attribute("name"), Some(&json!("42")));

    place.set_attribute("rank", AttributeInput::Literal(json!(7)));
    place.set_attribute("rank", AttributeInput::Raw("8".into()));
    assert_eq!(place.attribute("rank"), Some(&json!(8)));

    place.set_attribute("fresh", AttributeInput::Raw("9".into()));
    assert_eq!(place.attribute("fresh"), Some(&json!("9")));
}

#[test]
fn unparsable_raw_value_is_kept_as_text() {
    let mut place = Record::new(RecordKind::Place);
    place.set_attribute("max_guest", AttributeInput::Raw("many".into()));
    assert_eq!(place.attribute("max_guest"), Some(&json!("many")));
}

#[test]
fn literal_values_adapt_to_declared_types() {
    let mut place = Record::new(RecordKind::Place);
    place.set_attribute("price_by_night", AttributeInput::Literal(json!("120")));
    place.set_attribute("latitude", AttributeInput::Literal(json!(5)));
    place.set_attribute("extra", AttributeInput::Literal(json!([1, "two"])));
    assert_eq!(place.attribute("price_by_night"), Some(&json!(120)));
    assert_eq!(place.attribute("latitude"), Some(&json!(5.0)));
    assert_eq!(place.attribute("extra"), Some(&json!([1, "two"])));
}

#[test]
fn display_lists_identity_then_bag_in_insertion_order() {
    let mut user = Record::new(RecordKind::User);
    user.set_attribute("first_name", AttributeInput::Raw("Betty".into()));
    user.set_attribute("verified", AttributeInput::Literal(json!(true)));
    user.set_attribute("nickname", AttributeInput::Literal(json!(null)));

    let text = user.to_string();
    let prefix = format!("[User] ({}) {{'id': '{}', 'created_at': '", user.id, user.id);
    assert!(text.starts_with(&prefix), "{text}");
    assert!(text.ends_with("'first_name': 'Betty', 'verified': True, 'nickname': None}"), "{text}");
    let created = text.find("'created_at'").unwrap();
    let updated = text.find("'updated_at'").unwrap();
    assert!(created < updated);
}

#[test]
fn schema_lookup_is_exact() {
    assert_eq!(RecordKind::from_name("Place"), Some(RecordKind::Place));
    assert_eq!(RecordKind::from_name("place"), None);
    assert_eq!(RecordKind::from_name("Pla"), None);
    assert_eq!(RecordKind::Place.field_type("amenity_ids"), Some(FieldType::List));
    assert_eq!(RecordKind::BaseModel.field_type("name"), None);
}
