//! Unified error types for the host runtime.

use std::fmt;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors decoding a transport-safe payload.
#[derive(Debug)]
pub enum DecodeError {
    /// The payload is not valid Base64.
    InvalidBase64(base64::DecodeError),
    /// The decoded bytes cannot form 2-byte character units.
    OddByteCount(usize),
    /// The decoded byte stream is not valid UTF-16.
    InvalidUtf16,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBase64(e) => write!(f, "invalid base64 payload: {e}"),
            Self::OddByteCount(len) => {
                write!(f, "payload decodes to {len} bytes, expected an even count")
            }
            Self::InvalidUtf16 => write!(f, "payload is not valid UTF-16"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        Self::InvalidBase64(e)
    }
}

// ---------------------------------------------------------------------------
// LocateError
// ---------------------------------------------------------------------------

/// Errors resolving the interpreter executable.
#[derive(Debug)]
pub enum LocateError {
    /// No PATH entry or well-known directory contains the interpreter.
    InterpreterNotFound { filename: String },
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterpreterNotFound { filename } => write!(
                f,
                "interpreter `{filename}` not found on any PATH scope or well-known directory"
            ),
        }
    }
}

impl std::error::Error for LocateError {}

// ---------------------------------------------------------------------------
// RelayError
// ---------------------------------------------------------------------------

/// Errors from the resource relay task.
#[derive(Debug)]
pub enum RelayError {
    /// The local channel could not be created (collision, permissions).
    Bind(std::io::Error),
    /// Waiting for the peer connection failed.
    Accept(std::io::Error),
    /// Transport-level read/write failure inside a session.
    Io(std::io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(e) => write!(f, "failed to create relay channel: {e}"),
            Self::Accept(e) => write!(f, "failed to accept relay connection: {e}"),
            Self::Io(e) => write!(f, "relay transport error: {e}"),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// LaunchError
// ---------------------------------------------------------------------------

/// Errors spawning or waiting on the interpreter subprocess.
#[derive(Debug)]
pub enum LaunchError {
    /// The child process failed to start.
    Spawn(std::io::Error),
    /// Waiting on the child failed.
    Wait(std::io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to start interpreter: {e}"),
            Self::Wait(e) => write!(f, "failed waiting for interpreter: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {}

// ---------------------------------------------------------------------------
// HostError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for a host invocation.
#[derive(Debug)]
pub enum HostError {
    Decode(DecodeError),
    Locate(LocateError),
    Launch(LaunchError),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Locate(e) => write!(f, "locate: {e}"),
            Self::Launch(e) => write!(f, "launch: {e}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<DecodeError> for HostError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<LocateError> for HostError {
    fn from(e: LocateError) -> Self {
        Self::Locate(e)
    }
}

impl From<LaunchError> for HostError {
    fn from(e: LaunchError) -> Self {
        Self::Launch(e)
    }
}
