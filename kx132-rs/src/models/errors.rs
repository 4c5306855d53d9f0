//! Module errors

use std::time::Duration;
use thiserror::Error;

use common::errors::{ConfigError, DeviceError, RemoteConfigError};

/// Represents the different types of errors that can end or prevent an acquisition run.
///
/// Out-of-range thresholds are not errors: they are clamped and reported as
/// [`ThresholdWarning`](crate::validator::ThresholdWarning)s. Reads discarded during
/// shutdown are counted in the [`RunSummary`](crate::models::capture::RunSummary).
#[derive(Error, Debug)]
pub enum Kx132Error {
    /// A configuration option is not part of its option table.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The remote configurator could not start the firmware. The run never starts.
    #[error("remote configuration failed: {0}")]
    RemoteConfig(#[from] RemoteConfigError),

    /// A device interface call failed or timed out. The run is stopped.
    #[error("device i/o failure: {0}")]
    DeviceIo(#[from] DeviceError),

    /// The capture record could not be written. The run is stopped.
    #[error("capture sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// A run is already active on this session.
    #[error("acquisition already running")]
    AlreadyRunning,

    /// The operation needs an active run.
    #[error("no acquisition running")]
    NotRunning,

    /// The worker did not stop within the given bound and was aborted.
    #[error("acquisition worker did not stop within {0:?}")]
    JoinTimeout(Duration),

    /// The run was cancelled before it started or while it waited on the device.
    #[error("acquisition cancelled")]
    Cancelled,

    /// The worker task panicked or was cancelled.
    #[error("acquisition worker failed: {0}")]
    Join(String),

    /// The run file could not be read or parsed.
    #[error("run file error: {0}")]
    ConfigFile(String),
}
