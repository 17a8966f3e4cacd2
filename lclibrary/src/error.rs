//! Erreurs de la bibliothèque et leur traduction en réponses HTTP

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lcarchive::ArchiveError;
use lcserver::{ErrorResponse, RangeError, StreamError};
use thiserror::Error;

/// Échecs de résolution d'un chemin client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid path")]
    InvalidPath,

    #[error("Unknown root: {0}")]
    UnknownRoot(String),

    #[error("Invalid path: path traversal detected")]
    PathTraversal,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Not a video or audio file: {0}")]
    NotMedia(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RangeError> for LibraryError {
    fn from(err: RangeError) -> Self {
        Self::Stream(StreamError::Range(err))
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

impl LibraryError {
    /// Code HTTP et code d'erreur exposé au client
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            LibraryError::Path(PathError::InvalidPath) => (StatusCode::BAD_REQUEST, "INVALID_PATH"),
            LibraryError::Path(PathError::PathTraversal) => {
                (StatusCode::FORBIDDEN, "PATH_TRAVERSAL")
            }
            LibraryError::Path(PathError::UnknownRoot(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_ROOT")
            }
            LibraryError::Archive(ArchiveError::EntryNotFound(_)) => {
                (StatusCode::NOT_FOUND, "ENTRY_NOT_FOUND")
            }
            LibraryError::Archive(ArchiveError::UnsupportedFormat(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UNSUPPORTED_FORMAT")
            }
            LibraryError::Archive(ArchiveError::OpenFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ARCHIVE_OPEN_FAILED")
            }
            LibraryError::Archive(ArchiveError::ReadFailed { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ARCHIVE_READ_FAILED")
            }
            LibraryError::Stream(StreamError::Range(RangeError::Malformed(_))) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANGE")
            }
            LibraryError::Stream(StreamError::Range(RangeError::Unsatisfiable { .. })) => {
                (StatusCode::RANGE_NOT_SATISFIABLE, "RANGE_NOT_SATISFIABLE")
            }
            LibraryError::Stream(StreamError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR")
            }
            LibraryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            LibraryError::NotADirectory(_) => (StatusCode::BAD_REQUEST, "NOT_A_DIRECTORY"),
            LibraryError::NotAFile(_) => (StatusCode::BAD_REQUEST, "NOT_A_FILE"),
            LibraryError::NotMedia(_) => (StatusCode::BAD_REQUEST, "NOT_MEDIA"),
            LibraryError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            LibraryError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            LibraryError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        // Les erreurs de plage portent leurs propres en-têtes
        if let LibraryError::Stream(e) = self {
            return e.into_response();
        }

        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        ErrorResponse::new(code, self.to_string()).with_status(status)
    }
}
