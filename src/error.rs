//! Outcome classification and the per-file error-combination algebra.

use thiserror::Error;

/// Final outcome for one attribute probe, one file, or the whole run.
///
/// Doubles as the process exit code. The ordering is the severity
/// ordering used by [`ErrorCode::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorCode {
    /// At least one attribute was read successfully.
    Ok = 0,
    /// The attribute does not exist (benign for a single probe).
    AttrAbsent = 1,
    /// The file itself is missing or inaccessible.
    FileAbsent = 2,
    /// Malformed data, a store failure, or a size mismatch.
    Other = 3,
    /// Command-line misuse (produced only by `main`).
    CmdLine = 4,
    /// Allocation failure. Rust aborts on OOM, so this code is part of
    /// the documented exit surface but never returned by library code.
    OutOfMemory = 5,
}

impl ErrorCode {
    /// Fold two per-attribute outcomes into one per-file outcome.
    ///
    /// The higher-severity code wins, with one exception: `AttrAbsent`
    /// never outranks `Ok`. A file with one present attribute and one
    /// absent attribute reads as success, but a hard error on any
    /// attribute propagates regardless of other successes.
    #[must_use]
    pub fn combine(self, other: ErrorCode) -> ErrorCode {
        if other > self && other > ErrorCode::AttrAbsent {
            other
        } else if self > ErrorCode::AttrAbsent {
            self
        } else if other == ErrorCode::Ok {
            ErrorCode::Ok
        } else {
            self
        }
    }

    /// The process exit code for this outcome.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

/// Failure reading one named attribute.
///
/// The payload is the human-readable description of the underlying
/// failure; callers must branch on the variant before interpreting it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    /// The attribute does not exist, or the filesystem does not
    /// support extended attributes.
    #[error("{0}")]
    Absent(String),

    /// The path itself is missing, not a directory, too long,
    /// inaccessible, or a symlink loop.
    #[error("{0}")]
    FileAbsent(String),

    /// Any other failure, including a size mismatch between the
    /// size-probe and fetch calls.
    #[error("{0}")]
    Other(String),
}

impl ReadError {
    /// The outcome class this failure maps to.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            ReadError::Absent(_) => ErrorCode::AttrAbsent,
            ReadError::FileAbsent(_) => ErrorCode::FileAbsent,
            ReadError::Other(_) => ErrorCode::Other,
        }
    }

    /// The human-readable description, regardless of variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ReadError::Absent(m) | ReadError::FileAbsent(m) | ReadError::Other(m) => m,
        }
    }
}
