//! Declarative schema of the Training Diary database.
//!
//! Everything the bootstrap creates is described here as data: which
//! collections exist, which `$jsonSchema` validator guards each of them, and
//! which indexes back the uniqueness constraints and the common queries.
use mongodb::bson::{Document, doc};

use crate::utils::enums::{Gender, TrainingType};

pub const DEFAULT_DB_NAME: &str = "training_diary";

pub const USERS_COLLECTION: &str = "users";
pub const TRAININGS_COLLECTION: &str = "trainings";
pub const FRIENDS_COLLECTION: &str = "friends";

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
pub const MIN_AGE: i32 = 13;
pub const MAX_AGE: i32 = 120;

/// A collection the bootstrap creates, with its validator if it has one.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub validator: Option<Document>,
}

impl CollectionSpec {
    /// The `$jsonSchema` body of the validator, if any.
    pub fn json_schema(&self) -> Option<&Document> {
        self.validator
            .as_ref()
            .and_then(|validator| validator.get_document("$jsonSchema").ok())
    }
}

/// An index the bootstrap creates on one of the declared collections.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: Document,
    pub unique: bool,
}

impl IndexSpec {
    /// Name the server gives the index by default, e.g. `user_id_1_date_-1`.
    pub fn default_name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, direction)| format!("{}_{}", field, direction))
            .collect::<Vec<_>>()
            .join("_")
    }
}

pub fn users_validator() -> Document {
    let genders: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["username", "email", "password_hash"],
            "properties": {
                "username": {
                    "bsonType": "string",
                    "description": "Username must be a string and is required"
                },
                "email": {
                    "bsonType": "string",
                    "pattern": EMAIL_PATTERN,
                    "description": "Email must be a valid email address"
                },
                "password_hash": {
                    "bsonType": "string",
                    "description": "Password hash must be a string and is required"
                },
                "age": {
                    "bsonType": "int",
                    "minimum": MIN_AGE,
                    "maximum": MAX_AGE,
                    "description": "Age must be an integer between 13 and 120"
                },
                "gender": {
                    "bsonType": "string",
                    "enum": genders,
                    "description": "Gender must be male, female, or other"
                }
            }
        }
    }
}

pub fn trainings_validator() -> Document {
    let types: Vec<&str> = TrainingType::ALL.iter().map(TrainingType::as_str).collect();
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["user_id", "date", "type"],
            "properties": {
                "user_id": {
                    "bsonType": "string",
                    "description": "User ID must be a string and is required"
                },
                "date": {
                    "bsonType": "string",
                    "description": "Date must be a string and is required"
                },
                "type": {
                    "bsonType": "string",
                    "enum": types,
                    "description": "Type must be one of the allowed training types"
                },
                "metrics": {
                    "bsonType": "object",
                    "description": "Metrics must be an object"
                }
            }
        }
    }
}

/// Collections in creation order.
pub fn collections() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec {
            name: USERS_COLLECTION,
            validator: Some(users_validator()),
        },
        CollectionSpec {
            name: TRAININGS_COLLECTION,
            validator: Some(trainings_validator()),
        },
        CollectionSpec {
            name: FRIENDS_COLLECTION,
            validator: None,
        },
    ]
}

pub fn indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec {
            collection: USERS_COLLECTION,
            keys: doc! { "username": 1 },
            unique: true,
        },
        IndexSpec {
            collection: USERS_COLLECTION,
            keys: doc! { "email": 1 },
            unique: true,
        },
        IndexSpec {
            collection: TRAININGS_COLLECTION,
            keys: doc! { "user_id": 1, "date": -1 },
            unique: false,
        },
        IndexSpec {
            collection: TRAININGS_COLLECTION,
            keys: doc! { "type": 1 },
            unique: false,
        },
        IndexSpec {
            collection: FRIENDS_COLLECTION,
            keys: doc! { "user_id": 1 },
            unique: false,
        },
    ]
}

/// Look up a declared collection by name.
pub fn collection(name: &str) -> Option<CollectionSpec> {
    collections().into_iter().find(|spec| spec.name == name)
}
