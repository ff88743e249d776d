use people_core::{NewPerson, Person, PersonValidationError};
use uuid::Uuid;

#[test]
fn person_new_sets_defaults() {
    let person = Person::new("Justin Lee");

    assert!(!person.id.is_nil());
    assert_eq!(person.name, "Justin Lee");
    assert_eq!(person.age, None);
    assert!(person.favorite_foods.is_empty());
    assert!(person.validate().is_ok());
}

#[test]
fn each_new_person_gets_a_distinct_id() {
    let first = Person::new("Gina");
    let second = Person::new("Gina");
    assert_ne!(first.id, second.id);
}

#[test]
fn validate_rejects_empty_name() {
    let person = Person::new("");
    assert_eq!(
        person.validate().unwrap_err(),
        PersonValidationError::MissingName
    );
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Person::with_id(Uuid::nil(), "nobody").unwrap_err();
    assert_eq!(err, PersonValidationError::NilId);
}

#[test]
fn likes_matches_exact_food_only() {
    let person = Person::new("Kendra").with_favorite_foods(["eggs", "egg rolls"]);

    assert!(person.likes("eggs"));
    assert!(!person.likes("egg"));
    assert!(!person.likes("EGGS"));
}

#[test]
fn serialization_uses_document_field_names() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let person = Person::with_id(id, "Patrick")
        .unwrap()
        .with_age(40)
        .with_favorite_foods(["burgers"]);

    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(json["_id"], id.to_string());
    assert_eq!(json["name"], "Patrick");
    assert_eq!(json["age"], 40);
    assert_eq!(json["favoriteFoods"], serde_json::json!(["burgers"]));

    let decoded: Person = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn deserialize_defaults_optional_fields() {
    let value = serde_json::json!({
        "_id": "11111111-2222-4333-8444-555555555555",
        "name": "Gina"
    });

    let person: Person = serde_json::from_value(value).unwrap();
    assert_eq!(person.age, None);
    assert!(person.favorite_foods.is_empty());
}

#[test]
fn deserialize_rejects_missing_or_empty_name() {
    let missing = serde_json::json!({
        "_id": "11111111-2222-4333-8444-555555555555",
        "age": 3
    });
    assert!(serde_json::from_value::<Person>(missing).is_err());

    let empty = serde_json::json!({
        "_id": "11111111-2222-4333-8444-555555555555",
        "name": ""
    });
    let err = serde_json::from_value::<Person>(empty).unwrap_err();
    assert!(
        err.to_string().contains("name is required"),
        "unexpected error: {err}"
    );
}

#[test]
fn new_person_literal_becomes_person_with_fresh_id() {
    let literal = NewPerson::new("Gina", Some(33), ["bread"]);
    let person = Person::from(literal.clone());

    assert!(!person.id.is_nil());
    assert_eq!(person.name, literal.name);
    assert_eq!(person.age, Some(33));
    assert_eq!(person.favorite_foods, vec!["bread".to_string()]);
}
