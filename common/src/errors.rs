//! Module errors

use thiserror::Error;

/// Errors raised while turning user choices into a typed configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A label does not match any entry of the option table.
    #[error("unknown {field} option '{value}'")]
    UnknownOption { field: &'static str, value: String },

    /// At least one axis must take part in trigger evaluation.
    #[error("axis mask must select at least one axis")]
    EmptyAxisMask,
}

/// Errors raised by a device interface implementation.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// A read or send was attempted before `init`.
    #[error("device interface not initialized")]
    NotInitialized,

    /// The channel to the device could not be opened.
    #[error("could not connect to device at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure during a read or a send.
    #[error("device i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A read did not complete within the configured bound.
    #[error("device read timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The command does not fit in a single device frame.
    #[error("command is {len} bytes long, limit is {max}")]
    CommandTooLong { len: usize, max: usize },

    /// The device has no more data to deliver.
    #[error("device channel closed")]
    Closed,
}

/// Errors raised while pushing a command through the remote configurator.
#[derive(Error, Debug)]
pub enum RemoteConfigError {
    /// The remote shell could not be started.
    #[error("could not start remote shell: {0}")]
    Spawn(#[source] std::io::Error),

    /// The remote command ended with a failure status.
    #[error("remote command exited with status {status:?}: {stderr}")]
    Exited { status: Option<i32>, stderr: String },

    /// The remote host refused the command.
    #[error("remote configuration rejected: {0}")]
    Rejected(String),
}
