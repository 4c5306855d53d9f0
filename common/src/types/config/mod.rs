//! Typed acquisition and trigger configuration.
//!
//! Every option is a closed enumeration. Each variant carries the label offered to the
//! user (`"25600 Hz"`) and the value the device firmware expects (`"15"`). Parsing a
//! label that is not in the table is a configuration error.

#[macro_use]
mod macros;
pub mod init_config;
pub mod trigger_config;

pub use init_config::{AcquisitionMode, GRange, InitConfig, OutputDataRate, ReadMode, Resolution};
pub use trigger_config::{
    AxisMask, EdgeDetection, Thresholds, TriggerConfig, TriggerLogic, TriggerMode,
};
