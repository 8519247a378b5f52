//! Extraction errors and their fallback classification

use crate::archive::ArchiveError;
use crate::formation::FormationError;
use crate::procfile::ProcfileError;
use crate::runtime::RuntimeError;
use thiserror::Error;

/// How the extractor chain should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The strategy could not find a Procfile its way; try the next one.
    NotFound,
    /// Something is broken; stop the whole chain.
    Fatal,
}

/// Why a Procfile could not be found
#[derive(Debug, Error)]
pub enum NotFoundCause {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("unknown Procfile format")]
    UnknownFormat,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Procfile not found: {0}")]
    ProcfileNotFound(#[source] NotFoundCause),

    #[error("Procfile not found: no suitable Procfile extractor found")]
    NoSuitableExtractor,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Procfile(ProcfileError),

    #[error(transparent)]
    Formation(#[from] FormationError),
}

impl ExtractError {
    pub fn not_found(cause: impl Into<NotFoundCause>) -> Self {
        ExtractError::ProcfileNotFound(cause.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::ProcfileNotFound(_) | ExtractError::NoSuitableExtractor => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Fatal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<ProcfileError> for ExtractError {
    /// An unrecognised Procfile shape counts as no Procfile at all.
    fn from(err: ProcfileError) -> Self {
        match err {
            ProcfileError::UnknownFormat => ExtractError::not_found(NotFoundCause::UnknownFormat),
            other => ExtractError::Procfile(other),
        }
    }
}
