//! Device interface over TCP.
//!
//! The firmware streams raw little-endian values: a sample is three `i16`, a scalar is
//! one `u32`. Commands travel the other way as a zero-padded frame of
//! `MAX_COMMAND_LEN` bytes.

use async_trait::async_trait;
use log::{info, warn};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use common::constants::MAX_COMMAND_LEN;
use common::{DeviceError, DevicePort, Sample};

use crate::constants::{DEFAULT_CONNECT_ATTEMPTS, DEFAULT_CONNECT_RETRY_MILLIS};

pub struct TcpDevice {
    address: String,
    stream: Option<TcpStream>,
    connect_attempts: u32,
    retry_delay: Duration,
    read_timeout: Option<Duration>,
    trigger_timeout: Option<Duration>,
}

impl TcpDevice {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            stream: None,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_CONNECT_RETRY_MILLIS),
            read_timeout: None,
            trigger_timeout: None,
        }
    }

    /// The firmware needs a moment to open its socket after being launched, so
    /// connecting is retried.
    pub fn with_connect_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.connect_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    /// Bound on every read. `None` waits forever.
    pub fn with_read_timeout(mut self, bound: Option<Duration>) -> Self {
        self.read_timeout = bound;
        self
    }

    /// Bound on the wait for a trigger. When it runs out before the first byte of the
    /// trigger sample, `await_trigger` returns `DeviceError::Timeout` and nothing is
    /// consumed. `None` waits forever.
    pub fn with_trigger_timeout(mut self, bound: Option<Duration>) -> Self {
        self.trigger_timeout = bound;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn read_exact<const N: usize>(
        &mut self,
        bound: Option<Duration>,
    ) -> Result<[u8; N], DeviceError> {
        let stream = self.stream.as_mut().ok_or(DeviceError::NotInitialized)?;
        let mut buf = [0u8; N];

        let read = stream.read_exact(&mut buf);
        let result = match bound {
            Some(bound) => timeout(bound, read)
                .await
                .map_err(|_| DeviceError::Timeout(bound))?,
            None => read.await,
        };
        match result {
            Ok(_) => Ok(buf),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(DeviceError::Closed),
            Err(e) => Err(DeviceError::Io(e)),
        }
    }

    async fn read_sample_within(&mut self, bound: Option<Duration>) -> Result<Sample, DeviceError> {
        let buf = self.read_exact::<6>(bound).await?;
        Ok(Sample::new(
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ))
    }
}

/// Pads `command` to a full device frame.
pub(crate) fn command_frame(command: &[u8]) -> Result<[u8; MAX_COMMAND_LEN], DeviceError> {
    if command.len() > MAX_COMMAND_LEN {
        return Err(DeviceError::CommandTooLong {
            len: command.len(),
            max: MAX_COMMAND_LEN,
        });
    }
    let mut frame = [0u8; MAX_COMMAND_LEN];
    frame[..command.len()].copy_from_slice(command);
    Ok(frame)
}

#[async_trait]
impl DevicePort for TcpDevice {
    async fn init(&mut self) -> Result<(), DeviceError> {
        let mut last_error = None;
        for attempt in 1..=self.connect_attempts {
            match TcpStream::connect(&self.address).await {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    info!("Connected to device at {}", self.address);
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Connection attempt {}/{} to {} failed: {}",
                        attempt, self.connect_attempts, self.address, e
                    );
                    last_error = Some(e);
                    if attempt < self.connect_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(DeviceError::Connect {
            address: self.address.clone(),
            source: last_error.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "no connection attempt made")
            }),
        })
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            info!("Disconnected from device at {}", self.address);
        }
        Ok(())
    }

    async fn send(&mut self, command: &[u8]) -> Result<(), DeviceError> {
        let frame = command_frame(command)?;
        let stream = self.stream.as_mut().ok_or(DeviceError::NotInitialized)?;
        stream.write_all(&frame).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_sample(&mut self) -> Result<Sample, DeviceError> {
        self.read_sample_within(self.read_timeout).await
    }

    async fn read_u32(&mut self) -> Result<u32, DeviceError> {
        let buf = self.read_exact::<4>(self.read_timeout).await?;
        Ok(u32::from_le_bytes(buf))
    }

    async fn await_trigger(&mut self) -> Result<Sample, DeviceError> {
        if let Some(bound) = self.trigger_timeout {
            let stream = self.stream.as_ref().ok_or(DeviceError::NotInitialized)?;
            let mut first_byte = [0u8; 1];
            match timeout(bound, stream.peek(&mut first_byte)).await {
                Err(_) => return Err(DeviceError::Timeout(bound)),
                Ok(Ok(0)) => return Err(DeviceError::Closed),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => return Err(DeviceError::Io(e)),
            }
        }
        self.read_sample_within(self.read_timeout).await
    }
}
