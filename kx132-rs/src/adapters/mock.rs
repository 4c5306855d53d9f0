//! Stand-ins for the device firmware and the remote host, used by `kx132 run --mock`.

mod gaussian;

use async_trait::async_trait;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::time::Duration;

use common::{
    AcquisitionMode, CommandString, DeviceError, DevicePort, RemoteConfigError,
    RemoteConfigurator, Sample,
};

use crate::constants::EXIT_CMD;
use gaussian::GaussianNoise;

/// Shape of the data a [`SimulatedDevice`] produces.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationProfile {
    pub mode: AcquisitionMode,
    /// Resting reading every sample is drawn around.
    pub baseline: Sample,
    pub noise_stdev: f64,
    /// Delay of every sample read.
    pub sample_period: Duration,
    /// Delay of the read that waits for a trigger.
    pub trigger_interval: Duration,
    pub block_samples: u32,
    pub trigger_index: u32,
    pub seed: Option<u64>,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            mode: AcquisitionMode::Triggered,
            baseline: Sample::new(0, 0, 4096),
            noise_stdev: 50.0,
            sample_period: Duration::from_micros(500),
            trigger_interval: Duration::from_millis(250),
            block_samples: 256,
            trigger_index: 26,
            seed: None,
        }
    }
}

/// Emulates the device firmware: noisy samples around a baseline, and in triggered
/// mode a periodic trigger followed by the block description and its samples.
pub struct SimulatedDevice {
    profile: SimulationProfile,
    noise: Option<GaussianNoise>,
    rng: StdRng,
    initialized: bool,
    terminated: bool,
    pending_scalars: VecDeque<u32>,
    pending_samples: u32,
}

impl SimulatedDevice {
    pub fn new(profile: SimulationProfile) -> Self {
        let noise = match GaussianNoise::new(0.0, profile.noise_stdev) {
            Ok(noise) => Some(noise),
            Err(e) => {
                warn!("Simulated device runs without noise: {}", e);
                None
            }
        };
        let rng = match profile.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            profile,
            noise,
            rng,
            initialized: false,
            terminated: false,
            pending_scalars: VecDeque::new(),
            pending_samples: 0,
        }
    }

    fn check_open(&self) -> Result<(), DeviceError> {
        if !self.initialized {
            return Err(DeviceError::NotInitialized);
        }
        if self.terminated {
            return Err(DeviceError::Closed);
        }
        Ok(())
    }

    fn draw(&mut self) -> Sample {
        let baseline = self.profile.baseline;
        match &self.noise {
            Some(noise) => Sample::new(
                noise.add_noise(&mut self.rng, baseline.x()),
                noise.add_noise(&mut self.rng, baseline.y()),
                noise.add_noise(&mut self.rng, baseline.z()),
            ),
            None => baseline,
        }
    }
}

#[async_trait]
impl DevicePort for SimulatedDevice {
    async fn init(&mut self) -> Result<(), DeviceError> {
        self.initialized = true;
        self.terminated = false;
        info!("Simulated device ready in {} mode", self.profile.mode);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        self.initialized = false;
        Ok(())
    }

    async fn send(&mut self, command: &[u8]) -> Result<(), DeviceError> {
        self.check_open()?;
        if command == EXIT_CMD.as_bytes() {
            self.terminated = true;
        } else {
            info!(
                "Simulated device received '{}'",
                String::from_utf8_lossy(command)
            );
        }
        Ok(())
    }

    async fn read_sample(&mut self) -> Result<Sample, DeviceError> {
        self.check_open()?;
        let triggered = self.profile.mode == AcquisitionMode::Triggered;

        if triggered && self.pending_samples == 0 {
            // Next read is a trigger
            tokio::time::sleep(self.profile.trigger_interval).await;
            self.pending_scalars
                .extend([self.profile.block_samples, self.profile.trigger_index]);
            self.pending_samples = self.profile.block_samples;
        } else {
            tokio::time::sleep(self.profile.sample_period).await;
            self.pending_samples = self.pending_samples.saturating_sub(1);
        }
        Ok(self.draw())
    }

    async fn read_u32(&mut self) -> Result<u32, DeviceError> {
        self.check_open()?;
        self.pending_scalars.pop_front().ok_or_else(|| {
            DeviceError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "no block description pending",
            ))
        })
    }
}

/// Configurator for runs without a remote host. Only logs the command.
#[derive(Clone, Debug, Default)]
pub struct LocalConfigurator;

#[async_trait]
impl RemoteConfigurator for LocalConfigurator {
    async fn push(&self, command: &CommandString) -> Result<(), RemoteConfigError> {
        info!("No remote host configured. Device command: {}", command);
        Ok(())
    }
}
