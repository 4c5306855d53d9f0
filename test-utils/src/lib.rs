//! Test doubles shared by the workspace tests.

pub mod collector;
pub mod configurator_mock;
pub mod device_mock;
pub mod sink_mock;

pub use collector::Collector;
pub use configurator_mock::RecordingConfigurator;
pub use device_mock::{DeviceProbe, DeviceStep, ScriptedDevice};
pub use sink_mock::SharedSink;
