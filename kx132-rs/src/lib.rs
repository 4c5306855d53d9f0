//! # Crate kx132-rs
//!
//! ## kx132-rs
//!
//! The `kx132-rs` crate configures and reads a KX132 3-axis accelerometer attached to a
//! remote host. The firmware is launched over ssh with a flag-based command, and the
//! samples it serves over TCP are written to a plain text capture record.
//!
//! Features include:
//! - Stream acquisition, writing every sample as an indexed row.
//! - Triggered acquisition, writing one block per trigger with the run configuration,
//!   the reference reading, the thresholds and the samples around the trigger point.
//! - Validation of trigger thresholds against the bound of the trigger mode.
//! - Registration of listeners to follow a run (state, trigger bracket, completed blocks).
//! - Resending the trigger configuration to a running device.
//! - A simulated device to exercise the whole pipeline without hardware.
//!
//! **NOTE** Only one sensor is read at a time. The device handle belongs to the worker of
//! the active run.

pub mod adapters;
pub mod config;
pub(crate) mod constants;
pub mod encoder;
pub(crate) mod engine;
pub(crate) mod models;
pub mod recorder;
pub mod services;
pub mod session;
pub mod validator;

pub use models::capture::{CaptureBlock, RunSummary, SealedBlock};
pub use models::errors::{self, Kx132Error};
pub use models::events::{AcquisitionEvent, EngineState, EventKind};
pub use session::{AcquisitionSession, RunRequest};
