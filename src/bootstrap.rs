use crate::{
    schema::{self, CollectionSpec, IndexSpec},
    utils::{
        db::{CreateIndexError, create_index, is_namespace_exists},
        enums::OnExisting,
    },
};
use mongodb::bson::{Document, doc};
use tracing::{info, instrument, warn};

pub const COMPLETION_MESSAGE: &str = "MongoDB initialization completed for Training Diary!";

#[derive(thiserror::Error, Debug)]
pub enum BootstrapError {
    #[error("collection {0} already exists")]
    CollectionExists(String),
    #[error("failed to create collection {name}")]
    CreateCollection {
        name: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to update the validator of collection {name}")]
    UpdateValidator {
        name: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to create index {index} on collection {collection}")]
    CreateIndex {
        collection: String,
        index: String,
        #[source]
        source: CreateIndexError,
    },
}

/// What a bootstrap run did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BootstrapReport {
    pub created_collections: Vec<String>,
    pub reconciled_collections: Vec<String>,
    pub indexes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CollectionOutcome {
    Created,
    Reconciled,
}

#[instrument(skip_all, fields(collection = spec.name))]
async fn create_collection(
    db: &mongodb::Database,
    spec: &CollectionSpec,
    on_existing: OnExisting,
) -> Result<CollectionOutcome, BootstrapError> {
    let action = db.create_collection(spec.name);
    let result = match &spec.validator {
        Some(validator) => action.validator(validator.clone()).await,
        None => action.await,
    };

    match result {
        Ok(()) => {
            info!("created collection");
            Ok(CollectionOutcome::Created)
        }
        Err(e) if is_namespace_exists(&e) => match on_existing {
            OnExisting::Fail => Err(BootstrapError::CollectionExists(spec.name.to_string())),
            OnExisting::Reconcile => {
                warn!("collection already exists, keeping it");
                // an undeclared validator is cleared with an empty one
                let validator = spec.validator.clone().unwrap_or_default();
                update_validator(db, spec.name, &validator).await?;
                Ok(CollectionOutcome::Reconciled)
            }
        },
        Err(e) => Err(BootstrapError::CreateCollection {
            name: spec.name.to_string(),
            source: e,
        }),
    }
}

async fn update_validator(
    db: &mongodb::Database,
    name: &str,
    validator: &Document,
) -> Result<(), BootstrapError> {
    db.run_command(doc! { "collMod": name, "validator": validator.clone() })
        .await
        .map_err(|e| BootstrapError::UpdateValidator {
            name: name.to_string(),
            source: e,
        })?;
    info!(cleared = validator.is_empty(), "re-applied validator");
    Ok(())
}

/// Create the given collections, then the given indexes, in order. The first
/// failure aborts the run; nothing already created is rolled back.
pub async fn initialize_schema(
    db: &mongodb::Database,
    collections: &[CollectionSpec],
    indexes: &[IndexSpec],
    on_existing: OnExisting,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::default();

    for spec in collections {
        match create_collection(db, spec, on_existing).await? {
            CollectionOutcome::Created => report.created_collections.push(spec.name.to_string()),
            CollectionOutcome::Reconciled => {
                report.reconciled_collections.push(spec.name.to_string())
            }
        }
    }

    for spec in indexes {
        let collection = db.collection::<Document>(spec.collection);
        let name = create_index(&collection, spec.keys.clone(), spec.unique)
            .await
            .map_err(|e| BootstrapError::CreateIndex {
                collection: spec.collection.to_string(),
                index: spec.default_name(),
                source: e,
            })?;
        report.indexes.push(name);
    }

    Ok(report)
}

/// Set up the Training Diary collections, validators and indexes.
#[instrument(skip(db), fields(database = db.name()))]
pub async fn bootstrap(
    db: &mongodb::Database,
    on_existing: OnExisting,
) -> Result<BootstrapReport, BootstrapError> {
    let report =
        initialize_schema(db, &schema::collections(), &schema::indexes(), on_existing).await?;
    info!(
        created = report.created_collections.len(),
        reconciled = report.reconciled_collections.len(),
        indexes = report.indexes.len(),
        "{}",
        COMPLETION_MESSAGE
    );
    Ok(report)
}
