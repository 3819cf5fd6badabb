//! Error types for device group and bootstrap operations

use crate::model::ReconcileOutcome;
use panorama_shared::ApiError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the device manager
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("failed to query device groups: {0}")]
    RemoteQuery(#[source] ApiError),

    #[error("failed to {action} device group {name}: {source}")]
    ConfigRequest {
        action: &'static str,
        name: String,
        #[source]
        source: ApiError,
    },

    #[error("{message}: {source}")]
    Commit {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to add the device group after multiple tries: {name} ({attempts} attempts over {waited:?})")]
    CreateTimeout {
        name: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("failed to obtain device registration token: {0}")]
    SessionInit(#[source] ApiError),

    #[error("{0} is not supported by the Panorama device manager")]
    Unsupported(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to assemble bootstrap package for {device}: {}", .failures.join("; "))]
    Bootstrap {
        device: String,
        failures: Vec<String>,
    },
}

impl DeviceError {
    /// The reconcile outcome this error stands for, if it ends a reconcile
    pub fn outcome(&self) -> Option<ReconcileOutcome> {
        match self {
            Self::CreateTimeout { .. } => Some(ReconcileOutcome::CreateFailed),
            _ => None,
        }
    }
}
