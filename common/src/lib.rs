//! Shared types and traits for the `kx132-rs` workspace

pub mod constants;
pub mod errors;

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

// Re-export traits
#[doc(inline)]
pub use traits::{DevicePort, Notifiable, RemoteConfigurator};

// Re-export types
#[doc(inline)]
pub use errors::{ConfigError, DeviceError, RemoteConfigError};
#[doc(inline)]
pub use types::{
    AcquisitionMode, Axis, AxisMask, Callback, Clock, CommandString, EdgeDetection, FixedClock,
    GRange, InitConfig, OutputDataRate, ReadMode, Resolution, Sample, StopSignal, SystemClock,
    Thresholds, TriggerConfig, TriggerLogic, TriggerMode,
};
