use async_trait::async_trait;

use crate::errors::DeviceError;
use crate::types::Sample;

/// Binary channel to the accelerometer.
///
/// The channel is single-consumer and ordered: every call suspends the caller until one
/// unit of data is available, and calls must never overlap. Each primitive reports its
/// failure through `DeviceError` so the caller can end the run in an orderly way.
#[async_trait]
pub trait DevicePort: Send {
    /// Prepares the channel. Must be called once before any read.
    async fn init(&mut self) -> Result<(), DeviceError>;

    /// Releases the channel.
    async fn close(&mut self) -> Result<(), DeviceError>;

    /// Pushes a short command (at most `MAX_COMMAND_LEN` bytes) to the device.
    async fn send(&mut self, command: &[u8]) -> Result<(), DeviceError>;

    /// Reads one 3-axis sample.
    async fn read_sample(&mut self) -> Result<Sample, DeviceError>;

    /// Reads one 32-bit scalar.
    async fn read_u32(&mut self) -> Result<u32, DeviceError>;

    /// Reads the sample that announces a trigger.
    ///
    /// In triggered mode the device stays silent until a trigger fires. An implementation
    /// may give up after a bound and return `DeviceError::Timeout`, which means no trigger
    /// fired yet. It must not consume any part of a sample in that case.
    async fn await_trigger(&mut self) -> Result<Sample, DeviceError> {
        self.read_sample().await
    }
}
