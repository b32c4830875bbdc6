use thiserror::Error;

use crate::types::OperationFamily;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Nothing to serialize: {record} exposes no annotated features")]
    NoFeatures { record: &'static str },

    #[error("Nested field {field} of {record} holds a record with no annotated features")]
    EmptyNested { record: &'static str, field: String },

    #[error(
        "Only a single dense vector is supported per namespace: {record} maps {features} features to namespace {namespace:?} (group {group:?})"
    )]
    DenseConflict {
        record: &'static str,
        namespace: Option<String>,
        group: Option<char>,
        features: usize,
    },

    #[error("No applicable {family} operation for value type {value_type}")]
    NoApplicableOperation {
        family: OperationFamily,
        value_type: String,
    },

    #[error("Ambiguous {family} operation for value type {value_type}: {} candidates match equally well", candidates.len())]
    AmbiguousOperation {
        family: OperationFamily,
        value_type: String,
        candidates: Vec<String>,
    },

    #[error("Typed {family} operation registered for {value_type} does not accept that type")]
    HandlerMismatch {
        family: OperationFamily,
        value_type: String,
    },
}
