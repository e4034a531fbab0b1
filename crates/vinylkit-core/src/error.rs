//! Error handling for Vinylkit
//!
//! Provides error types for all layers of the pipeline:
//! - Extraction errors (vector source parsing)
//! - Session errors (device session state machine)
//! - Link errors (serial transport)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Extraction error type
///
/// Represents failures while turning vector source text into path segments.
/// A `MalformedSource` failure does not discard partial progress; the
/// extractor returns recovered segments alongside the error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The format hint did not name a supported vector format
    #[error("unsupported file format: {hint}")]
    UnsupportedFormat {
        /// The format hint that was not recognized.
        hint: String,
    },

    /// Structural parsing could not proceed
    #[error("malformed source: {reason}")]
    MalformedSource {
        /// What stopped the parser.
        reason: String,
    },
}

/// Device session error type
///
/// Represents operations refused by the session because they are
/// inconsistent with its current state, plus mid-stream aborts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No device is connected
    #[error("device not connected")]
    NotConnected,

    /// A device is already connected and must be torn down first
    #[error("device already connected")]
    AlreadyConnected,

    /// The caller supplied no command text
    #[error("no command text supplied")]
    InvalidCommand,

    /// A streaming job was aborted before completion
    #[error("stream aborted after {completed} of {total} instructions: {reason}")]
    StreamAborted {
        /// Instructions delivered before the abort.
        completed: usize,
        /// Total instructions in the program.
        total: usize,
        /// The underlying failure.
        reason: String,
    },
}

/// Transport link error type
///
/// Represents serial-level failures. Opening and losing a link fault the
/// session; a per-instruction write failure does not.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Failed to open the port
    #[error("failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// The link dropped underneath an active session
    #[error("link lost: {reason}")]
    Lost {
        /// The reason the link was lost.
        reason: String,
    },

    /// A write to the link failed
    #[error("write failed: {reason}")]
    Write {
        /// The reason the write failed.
        reason: String,
    },

    /// Port enumeration failed
    #[error("failed to enumerate ports: {reason}")]
    Enumerate {
        /// The reason enumeration failed.
        reason: String,
    },
}

/// Main error type for Vinylkit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Extraction error
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Session error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Link error
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an extraction error
    pub fn is_extract_error(&self) -> bool {
        matches!(self, Error::Extract(_))
    }

    /// Check if this is a session error
    pub fn is_session_error(&self) -> bool {
        matches!(self, Error::Session(_))
    }

    /// Check if this is a link error
    pub fn is_link_error(&self) -> bool {
        matches!(self, Error::Link(_))
    }

    /// Check if this error means the session refused the operation because
    /// no device is connected
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Error::Session(SessionError::NotConnected))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
