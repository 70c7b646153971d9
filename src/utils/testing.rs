// Utility for integration tests
use mongodb::bson::{Bson, Document, doc};

use crate::conf::{self, AppConfig, BuildDbError};

pub const TEST_CONFIG_FILE: &str = "tests/config.test.yaml";

/// A throwaway database named after the configured one plus a random suffix,
/// so tests running in parallel never see each other's collections.
pub async fn test_db() -> Result<mongodb::Database, BuildDbError> {
    let mut config = AppConfig::from_path(TEST_CONFIG_FILE)?;
    config.database.name = format!(
        "{}_{}",
        config.database.name,
        uuid::Uuid::new_v4().simple()
    );
    conf::db_from_config(&config.database).await
}

pub async fn drop_test_db(db: &mongodb::Database) -> Result<(), mongodb::error::Error> {
    db.drop().await
}

/// Run `explain` on a find and return the names of the indexes its winning
/// plan scans.
pub async fn winning_plan_indexes(
    db: &mongodb::Database,
    collection: &str,
    filter: Document,
    sort: Document,
) -> Result<Vec<String>, mongodb::error::Error> {
    let explain = db
        .run_command(doc! {
            "explain": { "find": collection, "filter": filter, "sort": sort },
            "verbosity": "queryPlanner",
        })
        .await?;
    let mut names = Vec::new();
    if let Ok(planner) = explain.get_document("queryPlanner") {
        if let Ok(plan) = planner.get_document("winningPlan") {
            collect_index_names(plan, &mut names);
        }
    }
    Ok(names)
}

// stages nest under inputStage/inputStages, and newer servers wrap the
// classic plan in queryPlan
fn collect_index_names(stage: &Document, names: &mut Vec<String>) {
    if let Ok(name) = stage.get_str("indexName") {
        names.push(name.to_string());
    }
    for (_, value) in stage {
        match value {
            Bson::Document(child) => collect_index_names(child, names),
            Bson::Array(children) => {
                for child in children {
                    if let Bson::Document(child) = child {
                        collect_index_names(child, names);
                    }
                }
            }
            _ => {}
        }
    }
}
