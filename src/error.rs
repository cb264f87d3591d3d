use thiserror::Error;

/// Failure taxonomy for an import run.
///
/// `Config` and `UnsupportedFormat` are always fatal. `Remote` is fatal when
/// raised by the field metadata fetch and row-local when raised by entity
/// search or update.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Missing token, empty file, or an unresolvable search field.
    #[error("{0}")]
    Config(String),

    /// File extension is neither .csv nor .xlsx.
    #[error("unsupported file type '{0}': use .csv or .xlsx")]
    UnsupportedFormat(String),

    /// Non-success HTTP status from the webhook API.
    #[error("{operation} failed with status {status}: {body}")]
    Remote {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}
