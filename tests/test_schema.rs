use diary_bootstrap::schema::{
    self, EMAIL_PATTERN, FRIENDS_COLLECTION, TRAININGS_COLLECTION, USERS_COLLECTION,
};
use diary_bootstrap::utils::enums::{Gender, TrainingType};
use diary_bootstrap::validation::{ValidationError, validate_with_validator};
use mongodb::bson::{Bson, Document, doc};

fn valid_user() -> Document {
    doc! {
        "username": "janek123",
        "email": "janek0@example.com",
        "password_hash": "$2b$04$abcdefghijklmnopqrstuv",
    }
}

fn valid_training() -> Document {
    doc! {
        "user_id": "7b0c4a4e-3f7d-4a6b-9c55-2f1e1c9a8e01",
        "date": "2025-06-04",
        "type": "bieganie",
    }
}

fn check_user(user: &Document) -> Result<(), ValidationError> {
    validate_with_validator(&schema::users_validator(), user)
}

fn check_training(training: &Document) -> Result<(), ValidationError> {
    validate_with_validator(&schema::trainings_validator(), training)
}

#[test]
fn test_declared_collections() {
    let collections = schema::collections();
    let names: Vec<&str> = collections.iter().map(|spec| spec.name).collect();
    assert_eq!(
        names,
        vec![USERS_COLLECTION, TRAININGS_COLLECTION, FRIENDS_COLLECTION]
    );

    assert!(collections[0].json_schema().is_some());
    assert!(collections[1].json_schema().is_some());
    // friends accepts any document shape
    assert!(collections[2].validator.is_none());
    assert!(schema::collection(FRIENDS_COLLECTION).unwrap().json_schema().is_none());
    assert!(schema::collection("workouts").is_none());
}

#[test]
fn test_declared_indexes() {
    let indexes = schema::indexes();
    assert_eq!(indexes.len(), 5);

    let declared: Vec<(&str, String, bool)> = indexes
        .iter()
        .map(|spec| (spec.collection, spec.default_name(), spec.unique))
        .collect();
    assert_eq!(
        declared,
        vec![
            (USERS_COLLECTION, "username_1".to_string(), true),
            (USERS_COLLECTION, "email_1".to_string(), true),
            (TRAININGS_COLLECTION, "user_id_1_date_-1".to_string(), false),
            (TRAININGS_COLLECTION, "type_1".to_string(), false),
            (FRIENDS_COLLECTION, "user_id_1".to_string(), false),
        ]
    );

    // every index sits on a declared collection
    for index in &indexes {
        assert!(schema::collection(index.collection).is_some());
    }
}

#[test]
fn test_users_validator_shape() {
    let validator = schema::users_validator();
    let json_schema = validator.get_document("$jsonSchema").unwrap();
    assert_eq!(json_schema.get_str("bsonType").unwrap(), "object");

    let properties = json_schema.get_document("properties").unwrap();
    let email = properties.get_document("email").unwrap();
    assert_eq!(email.get_str("pattern").unwrap(), EMAIL_PATTERN);

    let age = properties.get_document("age").unwrap();
    assert_eq!(age.get_str("bsonType").unwrap(), "int");
    assert_eq!(age.get_i32("minimum").unwrap(), 13);
    assert_eq!(age.get_i32("maximum").unwrap(), 120);
}

#[test]
fn test_user_required_fields() {
    assert!(check_user(&valid_user()).is_ok());

    for field in ["username", "email", "password_hash"] {
        let mut user = valid_user();
        user.remove(field);
        assert_eq!(
            check_user(&user),
            Err(ValidationError::MissingField(field.to_string())),
            "user without {} should be rejected",
            field
        );
    }
}

#[test]
fn test_user_field_types() {
    let mut user = valid_user();
    user.insert("username", 42);
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::WrongType { .. })
    ));

    let mut user = valid_user();
    user.insert("password_hash", Bson::Null);
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::WrongType { .. })
    ));
}

#[test]
fn test_user_email_pattern() {
    for email in [
        "janek0@example.com",
        "first.last+tag@sub.example.pl",
        "a_b%c-d@x-y.io",
    ] {
        let mut user = valid_user();
        user.insert("email", email);
        assert!(check_user(&user).is_ok(), "{} should be accepted", email);
    }

    for email in [
        "not-an-email",
        "janek@example",
        "janek@example.c",
        "janek kowalski@example.com",
        "@example.com",
        "janek@.com1",
    ] {
        let mut user = valid_user();
        user.insert("email", email);
        assert!(
            matches!(
                check_user(&user),
                Err(ValidationError::PatternMismatch { .. })
            ),
            "{} should be rejected",
            email
        );
    }
}

#[test]
fn test_user_age_bounds() {
    for age in [13, 30, 120] {
        let mut user = valid_user();
        user.insert("age", age);
        assert!(check_user(&user).is_ok(), "age {} should be accepted", age);
    }

    for age in [12, 121, -1] {
        let mut user = valid_user();
        user.insert("age", age);
        assert_eq!(
            check_user(&user),
            Err(ValidationError::OutOfRange {
                field: "age".to_string()
            }),
            "age {} should be rejected",
            age
        );
    }
}

#[test]
fn test_user_age_must_be_int32() {
    let mut user = valid_user();
    user.insert("age", 30_i64);
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::WrongType { .. })
    ));

    let mut user = valid_user();
    user.insert("age", 30.5);
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::WrongType { .. })
    ));

    let mut user = valid_user();
    user.insert("age", "30");
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::WrongType { .. })
    ));
}

#[test]
fn test_user_gender() {
    for gender in Gender::ALL {
        let mut user = valid_user();
        user.insert("gender", gender.as_str());
        assert!(check_user(&user).is_ok());
    }

    let mut user = valid_user();
    user.insert("gender", "Male");
    assert!(matches!(
        check_user(&user),
        Err(ValidationError::NotInEnum { .. })
    ));
}

#[test]
fn test_user_extra_fields_allowed() {
    let mut user = valid_user();
    user.insert(
        "stats",
        doc! { "total_trainings": 0, "total_calories": 0, "total_minutes": 0 },
    );
    assert!(check_user(&user).is_ok());
}

#[test]
fn test_training_required_fields() {
    assert!(check_training(&valid_training()).is_ok());

    for field in ["user_id", "date", "type"] {
        let mut training = valid_training();
        training.remove(field);
        assert_eq!(
            check_training(&training),
            Err(ValidationError::MissingField(field.to_string()))
        );
    }
}

#[test]
fn test_training_types() {
    for kind in TrainingType::ALL {
        let mut training = valid_training();
        training.insert("type", kind.as_str());
        assert!(check_training(&training).is_ok(), "{} should be accepted", kind);
    }

    for kind in ["pilates", "Bieganie", "silownia", ""] {
        let mut training = valid_training();
        training.insert("type", kind);
        assert!(
            matches!(
                check_training(&training),
                Err(ValidationError::NotInEnum { .. })
            ),
            "{:?} should be rejected",
            kind
        );
    }
}

#[test]
fn test_training_date_is_not_checked_as_a_date() {
    let mut training = valid_training();
    training.insert("date", "jutro");
    assert!(check_training(&training).is_ok());
}

#[test]
fn test_training_metrics() {
    let mut training = valid_training();
    training.insert(
        "metrics",
        doc! { "distance_km": 5.2, "anything": { "nested": [1, 2, 3] } },
    );
    assert!(check_training(&training).is_ok());

    let mut training = valid_training();
    training.insert("metrics", "fast");
    assert!(matches!(
        check_training(&training),
        Err(ValidationError::WrongType { .. })
    ));
}

#[test]
fn test_training_type_labels() {
    assert_eq!("rower".parse::<TrainingType>(), Ok(TrainingType::Cycling));
    assert_eq!(
        "trening funkcjonalny".parse::<TrainingType>(),
        Ok(TrainingType::Functional)
    );
    assert!("pilates".parse::<TrainingType>().is_err());

    assert_eq!(
        serde_json::to_value(TrainingType::Gym).unwrap(),
        serde_json::json!("siłownia")
    );
    assert_eq!(
        serde_json::to_value(Gender::Other).unwrap(),
        serde_json::json!("other")
    );
}
