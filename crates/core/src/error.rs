use classmap_api::BoxError;
use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Almost everything the scanner meets — missing entries, unreadable archives,
/// malformed manifest tokens — is skipped, not raised; a stale class path is
/// normal operating condition. The hierarchy variant is the exception: a scope
/// that cannot enumerate its own entries means the host runtime is broken.
#[derive(Error, Debug)]
pub enum ClassMapError {
    #[error("failed to enumerate class-path entries of scope `{scope}`: {source}")]
    Hierarchy {
        scope: String,
        #[source]
        source: BoxError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("resource `{0}` has no readable origin")]
    MissingResource(String),
}

pub type Result<T> = std::result::Result<T, ClassMapError>;
