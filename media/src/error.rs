//! Error types for media operations.
//!
//! Three families matter to the round trip:
//!
//! * fatal configuration errors ([`MediaError::Config`]), raised while
//!   sessions are being opened;
//! * fatal protocol violations ([`MediaError::Protocol`], and
//!   [`MediaError::Codec`] once a session is running), after which the
//!   owning controller is unusable;
//! * transient readiness signals ([`MediaError::NotReady`],
//!   [`MediaError::EndOfStream`]) that poll loops absorb.

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, MediaError>;

/// Error type for media operations
#[derive(Debug)]
pub enum MediaError {
    /// Invalid or unsupported session configuration
    Config(String),
    /// A collaborator broke the submit/poll contract
    Protocol(String),
    /// Failure reported by the codec backend
    Codec(String),
    /// Frame or image whose geometry does not match what was configured
    InvalidFrame(String),
    /// Nothing to hand out yet; poll again after the next submission
    NotReady,
    /// The collaborator has been drained and will produce nothing more
    EndOfStream,
    /// The controller hit a fatal error earlier and refuses further work
    Defunct,
    /// I/O error
    Io(io::Error),
}

impl MediaError {
    /// True for the readiness signals that poll loops stop on.
    pub fn is_transient(&self) -> bool {
        matches!(self, MediaError::NotReady | MediaError::EndOfStream)
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::Config(msg) => write!(f, "Config error: {}", msg),
            MediaError::Protocol(msg) => write!(f, "Protocol violation: {}", msg),
            MediaError::Codec(msg) => write!(f, "Codec error: {}", msg),
            MediaError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            MediaError::NotReady => write!(f, "Not ready"),
            MediaError::EndOfStream => write!(f, "End of stream"),
            MediaError::Defunct => {
                write!(f, "Round trip is defunct after an earlier fatal error")
            }
            MediaError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for MediaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MediaError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MediaError {
    fn from(err: io::Error) -> Self {
        MediaError::Io(err)
    }
}
