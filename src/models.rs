use serde::{Deserialize, Serialize};

use crate::utils::enums::{Gender, TrainingType};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    // i32 so that it is stored as a bson int, which the validator requires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<i32>,
}

/// Activity-specific measurements. The store does not constrain their shape,
/// so the variants are told apart by their fields alone.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Metrics {
    Exercises {
        exercises: Vec<Exercise>,
    },
    Run {
        distance_km: f64,
        duration_min: f64,
        calories_burned: i32,
    },
    Swim {
        laps: i32,
        distance_m: i32,
        stroke: String,
    },
    Yoga {
        duration_min: i32,
        style: String,
    },
    Ride {
        distance_km: f64,
        duration_min: f64,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Training {
    pub user_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TrainingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Friendship {
    pub user_id: String,
    pub friends: Vec<String>,
}
