use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Activity kinds accepted by the `trainings` validator. The stored labels
/// are Polish, as written by the diary application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingType {
    #[serde(rename = "siłownia")]
    Gym,
    #[serde(rename = "bieganie")]
    Running,
    #[serde(rename = "pływanie")]
    Swimming,
    #[serde(rename = "rower")]
    Cycling,
    #[serde(rename = "yoga")]
    Yoga,
    #[serde(rename = "kalistenika")]
    Calisthenics,
    #[serde(rename = "trening funkcjonalny")]
    Functional,
}

impl TrainingType {
    pub const ALL: [TrainingType; 7] = [
        TrainingType::Gym,
        TrainingType::Running,
        TrainingType::Swimming,
        TrainingType::Cycling,
        TrainingType::Yoga,
        TrainingType::Calisthenics,
        TrainingType::Functional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingType::Gym => "siłownia",
            TrainingType::Running => "bieganie",
            TrainingType::Swimming => "pływanie",
            TrainingType::Cycling => "rower",
            TrainingType::Yoga => "yoga",
            TrainingType::Calisthenics => "kalistenika",
            TrainingType::Functional => "trening funkcjonalny",
        }
    }
}

impl std::fmt::Display for TrainingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("unknown training type: {0}")]
pub struct UnknownTrainingType(pub String);

impl std::str::FromStr for TrainingType {
    type Err = UnknownTrainingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrainingType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTrainingType(s.to_string()))
    }
}

/// What the bootstrap does when a declared collection already exists.
#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum OnExisting {
    /// Abort before touching the existing collection.
    #[default]
    Fail,
    /// Keep the collection and re-apply its validator.
    Reconcile,
}

impl std::fmt::Display for OnExisting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnExisting::Fail => write!(f, "fail"),
            OnExisting::Reconcile => write!(f, "reconcile"),
        }
    }
}
