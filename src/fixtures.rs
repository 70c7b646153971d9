//! Sample data for local development: generation, JSON files, and loading into
//! (or clearing out of) a bootstrapped database.
use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use mongodb::bson::{Document, doc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, instrument};

use crate::{
    models::{Exercise, Friendship, Metrics, Training, User},
    schema::{FRIENDS_COLLECTION, TRAININGS_COLLECTION, USERS_COLLECTION},
    utils::enums::{Gender, TrainingType},
};

/// Plain-text password behind every generated `password_hash`.
pub const FIXTURE_PASSWORD: &str = "training123";
/// Lowest cost bcrypt accepts; fixtures don't need slow hashes.
pub const FIXTURE_BCRYPT_COST: u32 = 4;

pub const USERS_FILE: &str = "users.json";
pub const TRAININGS_FILE: &str = "trainings.json";
pub const FRIENDS_FILE: &str = "friends.json";

/// Suffix draws per user before falling back to the generation index.
const USERNAME_DRAWS: usize = 16;

const FIRST_NAMES: [&str; 10] = [
    "janek", "ania", "kasia", "marek", "ola", "bartek", "zosia", "tomek", "gosia", "krzysiek",
];
const STRENGTH_EXERCISES: [&str; 5] = [
    "przysiady",
    "martwy ciąg",
    "wyciskanie leżąc",
    "wiosłowanie",
    "podciąganie",
];
const CALISTHENICS_EXERCISES: [&str; 4] =
    ["pompki", "dipy", "mostek", "podciąganie australijskie"];
const FUNCTIONAL_EXERCISES: [&str; 4] = ["kettlebell swing", "burpees", "box jump", "battle rope"];
const STROKES: [&str; 3] = ["freestyle", "breaststroke", "backstroke"];
const YOGA_STYLES: [&str; 3] = ["vinyasa", "hatha", "yin"];
const WEIGHTS: [i32; 4] = [60, 80, 100, 120];

#[derive(thiserror::Error, Debug)]
pub enum FixtureError {
    #[error("error from std::io")]
    Io(#[from] std::io::Error),
    #[error("error from serde_json")]
    Json(#[from] serde_json::Error),
    #[error("error from bcrypt")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("error from mongodb")]
    Mongodb(#[from] mongodb::error::Error),
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Redraws on a repeat; once the draws run out, the generation index keeps
/// the name unique (`users.username` has a unique index).
fn unique_username<R: Rng + ?Sized>(
    rng: &mut R,
    name: &str,
    index: usize,
    issued: &mut HashSet<String>,
) -> String {
    for _ in 0..USERNAME_DRAWS {
        let candidate = format!("{}{}", name, rng.gen_range(100..=999));
        if issued.insert(candidate.clone()) {
            return candidate;
        }
    }
    let fallback = format!("{}{}_{}", name, rng.gen_range(100..=999), index);
    issued.insert(fallback.clone());
    fallback
}

pub fn generate_users<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    bcrypt_cost: u32,
) -> Result<Vec<User>, FixtureError> {
    let mut users = Vec::with_capacity(count);
    let mut usernames = HashSet::with_capacity(count);
    for i in 0..count {
        let name = pick(rng, &FIRST_NAMES);
        let username = unique_username(rng, name, i, &mut usernames);
        users.push(User {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email: format!("{}{}@example.com", name, i),
            password_hash: bcrypt::hash(FIXTURE_PASSWORD, bcrypt_cost)?,
            age: Some(rng.gen_range(18..=50)),
            gender: Some(*pick(rng, &[Gender::Male, Gender::Female])),
        });
    }
    Ok(users)
}

fn generate_metrics<R: Rng + ?Sized>(rng: &mut R, kind: TrainingType) -> Metrics {
    match kind {
        TrainingType::Gym => Metrics::Exercises {
            exercises: (0..2)
                .map(|_| Exercise {
                    name: pick(rng, &STRENGTH_EXERCISES).to_string(),
                    sets: Some(rng.gen_range(3..=5)),
                    reps: Some(rng.gen_range(6..=12)),
                    weight: Some(*pick(rng, &WEIGHTS)),
                    duration_sec: None,
                    rounds: None,
                })
                .collect(),
        },
        TrainingType::Running => {
            let distance_km = round2(rng.gen_range(3.0..15.0));
            Metrics::Run {
                distance_km,
                duration_min: round2(distance_km * rng.gen_range(4.5..6.5)),
                calories_burned: rng.gen_range(300..=700),
            }
        }
        TrainingType::Swimming => Metrics::Swim {
            laps: rng.gen_range(10..=40),
            distance_m: rng.gen_range(500..=2000),
            stroke: pick(rng, &STROKES).to_string(),
        },
        TrainingType::Cycling => {
            let distance_km = round2(rng.gen_range(5.0..40.0));
            Metrics::Ride {
                distance_km,
                duration_min: round2(distance_km * rng.gen_range(2.0..2.8)),
            }
        }
        TrainingType::Yoga => Metrics::Yoga {
            duration_min: rng.gen_range(30..=90),
            style: pick(rng, &YOGA_STYLES).to_string(),
        },
        TrainingType::Calisthenics => Metrics::Exercises {
            exercises: (0..3)
                .map(|_| Exercise {
                    name: pick(rng, &CALISTHENICS_EXERCISES).to_string(),
                    sets: Some(rng.gen_range(2..=5)),
                    reps: Some(rng.gen_range(8..=20)),
                    weight: None,
                    duration_sec: None,
                    rounds: None,
                })
                .collect(),
        },
        TrainingType::Functional => Metrics::Exercises {
            exercises: (0..3)
                .map(|_| Exercise {
                    name: pick(rng, &FUNCTIONAL_EXERCISES).to_string(),
                    sets: None,
                    reps: None,
                    weight: None,
                    duration_sec: Some(rng.gen_range(20..=60)),
                    rounds: Some(rng.gen_range(2..=5)),
                })
                .collect(),
        },
    }
}

/// One training per day, going back `days` days from `today` (included).
pub fn generate_trainings<R: Rng + ?Sized>(
    rng: &mut R,
    user_id: &str,
    days: u32,
    today: NaiveDate,
) -> Vec<Training> {
    (0..days)
        .map(|offset| {
            let date = today - TimeDelta::days(i64::from(offset));
            let kind = *pick(rng, &TrainingType::ALL);
            Training {
                user_id: user_id.to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                kind,
                notes: Some(format!(
                    "Trening typu {} w dniu {}",
                    kind,
                    date.format("%d-%m-%Y")
                )),
                metrics: Some(generate_metrics(rng, kind)),
            }
        })
        .collect()
}

/// Give every user between 2 and 4 friends among the other users.
pub fn generate_friendships<R: Rng + ?Sized>(rng: &mut R, users: &[User]) -> Vec<Friendship> {
    users
        .iter()
        .map(|user| {
            let others: Vec<&String> = users
                .iter()
                .map(|other| &other.id)
                .filter(|id| **id != user.id)
                .collect();
            let count = rng.gen_range(2..=4).min(others.len());
            Friendship {
                user_id: user.id.clone(),
                friends: others
                    .choose_multiple(rng, count)
                    .map(|id| (*id).clone())
                    .collect(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    pub users: Vec<User>,
    pub trainings: Vec<Training>,
    pub friendships: Vec<Friendship>,
}

impl FixtureSet {
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        user_count: usize,
        days: u32,
        today: NaiveDate,
        bcrypt_cost: u32,
    ) -> Result<Self, FixtureError> {
        let users = generate_users(rng, user_count, bcrypt_cost)?;
        let mut trainings = Vec::with_capacity(user_count * days as usize);
        for user in &users {
            trainings.extend(generate_trainings(rng, &user.id, days, today));
        }
        let friendships = generate_friendships(rng, &users);
        Ok(FixtureSet {
            users,
            trainings,
            friendships,
        })
    }

    pub fn save(&self, dir: &Path) -> Result<(), FixtureError> {
        std::fs::create_dir_all(dir)?;
        write_json(&dir.join(USERS_FILE), &self.users)?;
        write_json(&dir.join(TRAININGS_FILE), &self.trainings)?;
        write_json(&dir.join(FRIENDS_FILE), &self.friendships)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self, FixtureError> {
        Ok(FixtureSet {
            users: read_json(&dir.join(USERS_FILE))?,
            trainings: read_json(&dir.join(TRAININGS_FILE))?,
            friendships: read_json(&dir.join(FRIENDS_FILE))?,
        })
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), FixtureError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionCounts {
    pub users: u64,
    pub trainings: u64,
    pub friendships: u64,
}

async fn replace_all<T>(
    collection: mongodb::Collection<T>,
    documents: &[T],
) -> Result<u64, FixtureError>
where
    T: serde::Serialize + Send + Sync,
{
    collection.delete_many(doc! {}).await?;
    // insert_many refuses an empty batch
    if documents.is_empty() {
        return Ok(0);
    }
    let result = collection.insert_many(documents).await?;
    Ok(result.inserted_ids.len() as u64)
}

/// Replace the contents of the three collections with the fixture documents.
#[instrument(skip_all, fields(database = db.name()))]
pub async fn import_fixtures(
    db: &mongodb::Database,
    set: &FixtureSet,
) -> Result<CollectionCounts, FixtureError> {
    let users = replace_all(db.collection::<User>(USERS_COLLECTION), &set.users).await?;
    info!(count = users, "loaded users");
    let trainings =
        replace_all(db.collection::<Training>(TRAININGS_COLLECTION), &set.trainings).await?;
    info!(count = trainings, "loaded trainings");
    let friendships = replace_all(
        db.collection::<Friendship>(FRIENDS_COLLECTION),
        &set.friendships,
    )
    .await?;
    info!(count = friendships, "loaded friendships");
    Ok(CollectionCounts {
        users,
        trainings,
        friendships,
    })
}

/// Delete every document from the three collections. Collections, validators
/// and indexes are kept.
#[instrument(skip_all, fields(database = db.name()))]
pub async fn wipe(db: &mongodb::Database) -> Result<CollectionCounts, FixtureError> {
    let mut counts = CollectionCounts::default();
    for (name, count) in [
        (USERS_COLLECTION, &mut counts.users),
        (TRAININGS_COLLECTION, &mut counts.trainings),
        (FRIENDS_COLLECTION, &mut counts.friendships),
    ] {
        let result = db.collection::<Document>(name).delete_many(doc! {}).await?;
        *count = result.deleted_count;
        info!(collection = name, deleted = result.deleted_count, "wiped collection");
    }
    Ok(counts)
}
