pub mod callback;
pub mod clock;
pub mod command;
pub mod config;
pub mod sample;
pub mod stop;

pub use callback::Callback;
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::CommandString;
pub use config::{
    AcquisitionMode, AxisMask, EdgeDetection, GRange, InitConfig, OutputDataRate, ReadMode,
    Resolution, Thresholds, TriggerConfig, TriggerLogic, TriggerMode,
};
pub use sample::{Axis, Sample};
pub use stop::StopSignal;
