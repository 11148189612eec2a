/*!
Error type for the connector model
*/

use thiserror::Error;

#[derive(Error, Debug)]
/// Connector model error
pub enum Error {
    /// Record type not registered
    #[error("Record type {0} is not registered.")]
    UnknownType(String),
    /// Record type registered twice
    #[error("Record type {0} is already registered.")]
    DuplicateType(String),
    /// Two fields of one record type share a wire name
    #[error("Field {1} is declared more than once in record type {0}.")]
    DuplicateField(String, String),
    /// Field not declared by the record type
    #[error("Field {1} is not declared by record type {0}.")]
    UnknownField(String, String),
    /// Value shape doesn't match the field type
    #[error("Field {0} expects {1}, got {2}.")]
    TypeMismatch(String, String, String),
    /// Wire value can't be coerced to the field type
    #[error("Value {1} of field {0} can't be read as {2}.")]
    MalformedValue(String, String, String),
    /// Required field missing from the wire object
    #[error("Required field {1} of record type {0} is missing.")]
    MissingRequired(String, String),
    /// Serde json
    #[error(transparent)]
    JSONSerde(#[from] serde_json::Error),
    /// derive builder
    #[error(transparent)]
    DeriveBuilder(#[from] derive_builder::UninitializedFieldError),
}
