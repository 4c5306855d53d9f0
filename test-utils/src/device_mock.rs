use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{DeviceError, DevicePort, Sample, StopSignal};

/// One answer of a [`ScriptedDevice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceStep {
    Sample(Sample),
    Scalar(u32),
    /// The read fails with an i/o error.
    Fail,
    /// The read never completes.
    Hang,
    /// Delays the read by the given time, then answers with the next step.
    Pause(Duration),
    /// The read times out after the given time.
    Quiet(Duration),
}

impl From<(i16, i16, i16)> for DeviceStep {
    fn from(value: (i16, i16, i16)) -> Self {
        DeviceStep::Sample(value.into())
    }
}

/// What a [`ScriptedDevice`] was asked to do. Shared with the test after the device
/// has been moved into a session.
#[derive(Clone, Debug, Default)]
pub struct DeviceProbe {
    inner: Arc<Mutex<ProbeLog>>,
}

#[derive(Debug, Default)]
struct ProbeLog {
    init_calls: usize,
    close_calls: usize,
    reads: usize,
    sent: Vec<Vec<u8>>,
}

impl DeviceProbe {
    pub fn init_calls(&self) -> usize {
        self.inner.lock().unwrap().init_calls
    }

    pub fn close_calls(&self) -> usize {
        self.inner.lock().unwrap().close_calls
    }

    /// Reads answered so far, failed ones included.
    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    pub fn sent(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|command| String::from_utf8_lossy(command).into_owned())
            .collect()
    }
}

/// Device answering reads from a fixed script. Running out of script reads as a closed
/// channel.
#[derive(Debug, Default)]
pub struct ScriptedDevice {
    script: VecDeque<DeviceStep>,
    probe: DeviceProbe,
    stop_after: Option<(usize, StopSignal)>,
    fail_init: bool,
}

impl ScriptedDevice {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = DeviceStep>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Stream of samples.
    pub fn samples(samples: &[(i16, i16, i16)]) -> Self {
        Self::new(samples.iter().map(|s| DeviceStep::from(*s)))
    }

    /// Script of one trigger block as the firmware delivers it.
    pub fn block(
        first: (i16, i16, i16),
        trigger_index: u32,
        samples: &[(i16, i16, i16)],
    ) -> Vec<DeviceStep> {
        let mut steps = vec![
            DeviceStep::from(first),
            DeviceStep::Scalar(samples.len() as u32),
            DeviceStep::Scalar(trigger_index),
        ];
        steps.extend(samples.iter().map(|s| DeviceStep::from(*s)));
        steps
    }

    /// Sets `stop` right after the `reads`-th successful read. Zero sets it during `init`.
    pub fn stop_after(mut self, reads: usize, stop: StopSignal) -> Self {
        self.stop_after = Some((reads, stop));
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn probe(&self) -> DeviceProbe {
        self.probe.clone()
    }

    async fn next(&mut self) -> Result<DeviceStep, DeviceError> {
        let reads = {
            let mut log = self.probe.inner.lock().unwrap();
            log.reads += 1;
            log.reads
        };
        let mut step = self.script.pop_front().ok_or(DeviceError::Closed)?;
        while let DeviceStep::Pause(delay) = step {
            tokio::time::sleep(delay).await;
            step = self.script.pop_front().ok_or(DeviceError::Closed)?;
        }
        match step {
            DeviceStep::Fail => Err(DeviceError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted failure",
            ))),
            DeviceStep::Hang => std::future::pending().await,
            DeviceStep::Quiet(bound) => {
                tokio::time::sleep(bound).await;
                Err(DeviceError::Timeout(bound))
            }
            step => {
                if let Some((after, stop)) = &self.stop_after {
                    if reads == *after {
                        stop.set();
                    }
                }
                Ok(step)
            }
        }
    }
}

fn unexpected(step: DeviceStep) -> DeviceError {
    DeviceError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("unexpected scripted step {:?}", step),
    ))
}

#[async_trait]
impl DevicePort for ScriptedDevice {
    async fn init(&mut self) -> Result<(), DeviceError> {
        self.probe.inner.lock().unwrap().init_calls += 1;
        if let Some((0, stop)) = &self.stop_after {
            stop.set();
        }
        if self.fail_init {
            return Err(DeviceError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted init failure",
            )));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        self.probe.inner.lock().unwrap().close_calls += 1;
        Ok(())
    }

    async fn send(&mut self, command: &[u8]) -> Result<(), DeviceError> {
        self.probe.inner.lock().unwrap().sent.push(command.to_vec());
        Ok(())
    }

    async fn read_sample(&mut self) -> Result<Sample, DeviceError> {
        match self.next().await? {
            DeviceStep::Sample(sample) => Ok(sample),
            step => Err(unexpected(step)),
        }
    }

    async fn read_u32(&mut self) -> Result<u32, DeviceError> {
        match self.next().await? {
            DeviceStep::Scalar(value) => Ok(value),
            step => Err(unexpected(step)),
        }
    }
}
