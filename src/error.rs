/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error types shared by the reader and the writer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the OVF reader and writer.
///
/// Errors are fatal to the operation that raised them and are never
/// silently absorbed; the writer in particular performs no rollback, so a
/// failed write leaves a partial file on disk that the caller should
/// discard.
#[derive(Error, Debug)]
pub enum Error {
    /// An operating-system level failure while opening, mapping, or writing
    /// a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the OVF magic bytes.
    #[error("{}: not an OVF file (magic bytes mismatch)", .path.display())]
    NotOvf {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The file is recognizably OVF but its structure is damaged: a zero or
    /// negative LUT offset, an offset pointing outside its enclosing range,
    /// or a message body that fails to parse.
    #[error("corrupt OVF file: {reason}")]
    Corrupt {
        /// Human-readable description of the damage.
        reason: String,
    },

    /// A work-plane or vector-block index outside the valid range.
    #[error("index {index} out of range ({len} entries)")]
    InvalidIndex {
        /// The requested index.
        index: usize,
        /// The number of entries actually present.
        len: usize,
    },

    /// A reader query was issued with no file open.
    #[error("no file is open")]
    NotOpen,

    /// A writer method was invoked in a state that does not allow it.
    #[error("{reason}")]
    InvalidState {
        /// What the writer was asked to do and why it cannot.
        reason: &'static str,
    },

    /// A vector block was appended before the first work plane.
    #[error("cannot append a vector block before the first work plane")]
    NoCurrentWorkPlane,
}

impl Error {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Error::Corrupt {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_state(reason: &'static str) -> Self {
        Error::InvalidState { reason }
    }
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Error::Corrupt {
            reason: e.to_string(),
        }
    }
}

impl From<mmap_rs::Error> for Error {
    fn from(e: mmap_rs::Error) -> Self {
        Error::Io(std::io::Error::other(e))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
