//! Stable process exit codes.

use serde::{Deserialize, Serialize};

use crate::catalog::WorkflowError;
use crate::config::ConfigError;
use crate::granule::AggregateError;
use crate::report::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// Bad configuration, missing or unusable input directories
    Config = 1,
    /// Wrong arguments (reported by clap)
    Usage = 2,
    /// An image's XML sidecar could not be found
    MissingSidecar = 3,
    /// Listing, logging or report output failed
    Io = 4,
}

impl ExitCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(_: &ConfigError) -> Self {
        ExitCode::Config
    }
}

impl From<&AggregateError> for ExitCode {
    fn from(_: &AggregateError) -> Self {
        ExitCode::Config
    }
}

impl From<&ReportError> for ExitCode {
    fn from(_: &ReportError) -> Self {
        ExitCode::Io
    }
}

impl From<&WorkflowError> for ExitCode {
    fn from(err: &WorkflowError) -> Self {
        match err {
            WorkflowError::SidecarDir(_) | WorkflowError::Glob(_) => ExitCode::Config,
            WorkflowError::MissingSidecar { .. } => ExitCode::MissingSidecar,
            WorkflowError::List(_) | WorkflowError::MissingLog { .. } => ExitCode::Io,
        }
    }
}
