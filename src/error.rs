use std::path::PathBuf;

use strum::IntoStaticStr;
use thiserror::Error;

use crate::month::MonthPartition;

#[derive(Debug, Error)]
pub enum PagecountError {
    #[error("invalid time window: {0}")]
    Validation(String),

    #[error("month {month} could not be processed: {reason}")]
    MonthUnavailable {
        month: MonthPartition,
        reason: String,
    },

    #[error("malformed {resource}: {reason}")]
    Malformed { resource: &'static str, reason: String },

    #[error("checksum mismatch on {file}: expected {expected}, got {actual}")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("no checksum published for {0}")]
    MissingChecksum(String),

    #[error("network error retrieving {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("file name {name} does not match template {template}")]
    Naming { name: String, template: String },

    #[error("i/o error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification used when summarizing failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum FailureKind {
    #[strum(serialize = "validation")]
    Validation,
    #[strum(serialize = "month-unavailable")]
    MonthUnavailable,
    #[strum(serialize = "malformed")]
    Malformed,
    #[strum(serialize = "integrity")]
    Integrity,
    #[strum(serialize = "network")]
    Network,
    #[strum(serialize = "naming")]
    Naming,
    #[strum(serialize = "io")]
    Io,
    #[strum(serialize = "config")]
    Config,
}

impl PagecountError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PagecountError::Validation(_) => FailureKind::Validation,
            PagecountError::MonthUnavailable { .. } => FailureKind::MonthUnavailable,
            PagecountError::Malformed { .. } => FailureKind::Malformed,
            PagecountError::Integrity { .. } | PagecountError::MissingChecksum(_) => {
                FailureKind::Integrity
            }
            PagecountError::Network { .. } => FailureKind::Network,
            PagecountError::Naming { .. } => FailureKind::Naming,
            PagecountError::Io { .. } => FailureKind::Io,
            PagecountError::Config(_) => FailureKind::Config,
        }
    }

    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        PagecountError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn network<U: Into<String>, R: ToString>(url: U, reason: R) -> Self {
        PagecountError::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
