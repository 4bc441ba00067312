/*!
    Error types shared by the container and codec collaborators.
*/

use thiserror::Error;

/**
    Error reported by a container or codec implementation.

    End of input is part of this type ([`Error::Eof`]) because it is how a
    container reader signals that no more packets exist.
*/
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Codec or demuxer error reported by the underlying library
    #[error("codec error: {message}")]
    Codec { message: String },
    /// Invalid data (malformed input)
    #[error("invalid data: {message}")]
    InvalidData { message: String },
    /// End of input, not really an error but part of control flow
    #[error("end of stream")]
    Eof,
}

impl Error {
    /**
        Create a codec error with the given message.
    */
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /**
        Create an invalid data error with the given message.
    */
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /**
        Returns true if this is an EOF error.
    */
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/**
    Result type alias for collaborator operations.
*/
pub type Result<T> = std::result::Result<T, Error>;
