use carelytics_api::ApiError;

/// Form input that cannot be turned into a request.
///
/// The display strings are what the user sees in the alert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid or missing field: {0}")]
    MissingField(&'static str),
    #[error("Patient ID required for update")]
    MissingIdentifier,
    #[error("Nothing to update")]
    NothingToUpdate,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Add failed")]
    AddFailed(#[source] ApiError),
    #[error("Update failed")]
    UpdateFailed(#[source] ApiError),
    #[error("failed to load patients: {0}")]
    LoadFailed(#[source] ApiError),
    #[error("failed to delete patient: {0}")]
    DeleteFailed(#[source] ApiError),
    #[error("no such row: {0}")]
    UnknownRow(String),
}

pub type ControllerResult<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("failed to read preferences {path}: {source}", path = path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write preferences {path}: {source}", path = path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preferences {path}: {source}", path = path.display())]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences: {0}")]
    Serialization(serde_json::Error),
}

pub type PreferenceResult<T> = std::result::Result<T, PreferenceError>;
