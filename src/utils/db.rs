use mongodb::error::{ErrorKind, WriteFailure};
use tracing::instrument;

/// Server error code for "collection already exists".
pub const NAMESPACE_EXISTS: i32 = 48;
/// Server error code for a unique index violation.
pub const DUPLICATE_KEY: i32 = 11000;
/// Server error code for a document rejected by a collection validator.
pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

#[derive(thiserror::Error, Debug)]
#[error("failed to create index")]
pub struct CreateIndexError(#[from] mongodb::error::Error);

#[instrument(skip(collection, index), err, fields(collection = collection.name()))]
pub async fn create_index(
    collection: &mongodb::Collection<mongodb::bson::Document>,
    index: mongodb::bson::Document,
    unique: bool,
) -> Result<String, CreateIndexError> {
    let index_model = mongodb::IndexModel::builder()
        .keys(index)
        .options(
            mongodb::options::IndexOptions::builder()
                .unique(unique)
                .build(),
        )
        .build();
    let result = collection.create_index(index_model).await?;
    Ok(result.index_name)
}

/// Code carried by a command error or a single write error, if any.
pub fn server_error_code(error: &mongodb::error::Error) -> Option<i32> {
    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => Some(command_error.code),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        _ => None,
    }
}

pub fn is_namespace_exists(error: &mongodb::error::Error) -> bool {
    server_error_code(error) == Some(NAMESPACE_EXISTS)
}

pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    server_error_code(error) == Some(DUPLICATE_KEY)
}

pub fn is_validation_failure(error: &mongodb::error::Error) -> bool {
    server_error_code(error) == Some(DOCUMENT_VALIDATION_FAILURE)
}
