#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the analyzer crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Only fatal failures are represented here. Failures of individual endpoint
//! fetchers never reach this type: they are folded into the report as
//! [`ErrorRecord`](crate::ErrorRecord) values.

use std::path::{Path, PathBuf};

/// Unified error type returned by the classifier, the execution host and the
/// CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The input string is neither a GitHub profile nor a repository URL.
    #[error("invalid GitHub reference '{input}': expected https://github.com/<owner> or https://github.com/<owner>/<repository>")]
    InvalidReference {
        /// Raw input that failed classification.
        input: String
    },
    /// The invocation was cancelled before a report was assembled.
    #[error("analysis cancelled")]
    Cancelled,
    /// The background worker terminated without delivering an outcome.
    #[error("analysis worker terminated unexpectedly: {message}")]
    Worker {
        /// Description of the worker failure.
        message: String
    },
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when configuration or user input violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing reports.
    #[error("failed to serialize report: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while saving an exported report.
    #[error("failed to write report to {path:?}: {source}")]
    ExportIo {
        /// Destination of the export.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while writing a report to a stream such
    /// as stdout.
    #[error("failed to write report output: {source}")]
    Output {
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Service errors when building the GitHub client.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs an invalid reference error for the rejected input.
    pub fn invalid_reference<M>(input: M) -> Self
    where
        M: Into<String>
    {
        Self::InvalidReference {
            input: input.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs a worker error from the provided displayable value.
    pub fn worker<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Worker {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Failure of a single upstream read.
///
/// Fetchers never propagate this type past their own boundary: it is turned
/// into an [`ErrorRecord`](crate::ErrorRecord) carrying its display text.
#[derive(Debug, Clone, PartialEq, Eq, masterror::Error)]
pub enum FetchError {
    /// The request could not be performed or its body could not be read.
    #[error("GET {route} failed: {message}")]
    Transport {
        /// API route that was requested.
        route:   String,
        /// Description of the transport failure.
        message: String
    },
    /// The response carried a non-success status where one was required.
    #[error("GET {route} returned HTTP {status}")]
    Status {
        /// API route that was requested.
        route:  String,
        /// HTTP status code.
        status: u16
    },
    /// A success response carried a body that is not JSON.
    #[error("failed to decode body of {route}: {message}")]
    Decode {
        /// API route that was requested.
        route:   String,
        /// Decoder message.
        message: String
    }
}

impl FetchError {
    /// Constructs a transport failure for `route`.
    pub fn transport<M>(route: &str, message: M) -> Self
    where
        M: std::fmt::Display
    {
        Self::Transport {
            route:   route.to_owned(),
            message: message.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ExportIo`] variant capturing the failing path and
/// source.
pub fn export_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ExportIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Output`] variant for a failed stream write.
pub fn output_error(source: std::io::Error) -> Error {
    Error::Output {
        source
    }
}
