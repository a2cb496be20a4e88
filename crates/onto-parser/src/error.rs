use std::path::PathBuf;

/// Errors raised while loading an ontology document.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("ontology file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("invalid ontology document {origin}: {message}")]
    InvalidFormat { origin: String, message: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub(crate) fn invalid(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidFormat {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}
