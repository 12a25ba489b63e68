use thiserror::Error;

/// Failures while loading or validating reference data.
///
/// Calculations themselves never fail; only the table loading path does.
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to parse reference data: {0}")]
    ParseError(String),

    #[error("Reference data contains no rule versions")]
    NoVersions,

    #[error("Rule versions must have strictly increasing effective dates: {0}")]
    VersionOrder(String),

    #[error("Rule version {version} is missing table '{table}'")]
    MissingTable {
        version: String,
        table: &'static str,
    },

    #[error("Invalid table in rule version {version}: {message}")]
    InvalidTable { version: String, message: String },
}
