//! Run file.
//!
//! A run file is TOML. Every section and field is optional and falls back to the
//! defaults of the bench setup:
//!
//! ```toml
//! [device]
//! host = "100.200.150.42"
//! port = 60000
//! read_timeout_ms = 5000
//!
//! [remote]
//! user = "pi"
//!
//! [output]
//! directory = "./output"
//! name = "kx132_output"
//!
//! [init]
//! mode = "Triggered"
//! odr = "25600 Hz"
//! resolution = "16-Bit"
//! read_mode = "Synchronous Read"
//! g_range = "8 g"
//!
//! [trigger]
//! trigger_mode = "offset"
//! edge = "both"
//! logic = "AND"
//! axes = "X"
//! time_before_ms = 1
//! time_after_ms = 10
//! thresholds = { x = 8000, y = 8000, z = 8000 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use common::{InitConfig, Sample, TriggerConfig};

use crate::adapters::mock::SimulationProfile;
use crate::adapters::ssh::SshTarget;
use crate::adapters::tcp::TcpDevice;
use crate::constants::*;
use crate::models::errors::Kx132Error;
use crate::session::RunRequest;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    pub host: String,
    pub port: u16,
    pub connect_attempts: u32,
    pub connect_retry_ms: u64,
    /// Bound on every sample read. Absent waits forever.
    pub read_timeout_ms: Option<u64>,
    /// How long a trigger wait lasts before the stop signal is checked again. Absent
    /// waits until the next trigger.
    pub trigger_timeout_ms: Option<u64>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEVICE_HOST.to_string(),
            port: DEFAULT_DEVICE_PORT,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_retry_ms: DEFAULT_CONNECT_RETRY_MILLIS,
            read_timeout_ms: Some(DEFAULT_READ_TIMEOUT_MILLIS),
            trigger_timeout_ms: Some(DEFAULT_TRIGGER_POLL_MILLIS),
        }
    }
}

impl DeviceSettings {
    pub fn tcp_device(&self) -> TcpDevice {
        TcpDevice::new(&self.host, self.port)
            .with_connect_retries(
                self.connect_attempts,
                Duration::from_millis(self.connect_retry_ms),
            )
            .with_read_timeout(self.read_timeout_ms.map(Duration::from_millis))
            .with_trigger_timeout(self.trigger_timeout_ms.map(Duration::from_millis))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Without a remote host the device command is only logged.
    pub enabled: bool,
    pub ssh_binary: String,
    /// Defaults to the device host.
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub program: String,
    pub settle_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ssh_binary: DEFAULT_SSH_BINARY.to_string(),
            host: None,
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            program: DEFAULT_REMOTE_PROGRAM.to_string(),
            settle_ms: DEFAULT_REMOTE_SETTLE_MILLIS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Stops the run after this long. Absent runs until Ctrl+C.
    pub duration_ms: Option<u64>,
    /// How long a stopped worker may take to finish before it is aborted.
    pub join_timeout_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_ms: None,
            join_timeout_ms: DEFAULT_JOIN_TIMEOUT_MILLIS,
        }
    }
}

/// Simulated device used with `--mock`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    pub baseline: [i16; 3],
    pub noise_stdev: f64,
    pub sample_period_us: u64,
    pub trigger_interval_ms: u64,
    pub block_samples: u32,
    pub trigger_index: u32,
    pub seed: Option<u64>,
}

impl Default for MockSettings {
    fn default() -> Self {
        let profile = SimulationProfile::default();
        Self {
            baseline: profile.baseline.inner(),
            noise_stdev: profile.noise_stdev,
            sample_period_us: profile.sample_period.as_micros() as u64,
            trigger_interval_ms: profile.trigger_interval.as_millis() as u64,
            block_samples: profile.block_samples,
            trigger_index: profile.trigger_index,
            seed: profile.seed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub device: DeviceSettings,
    pub remote: RemoteSettings,
    pub output: OutputSettings,
    pub session: SessionSettings,
    pub mock: MockSettings,
    pub init: InitConfig,
    pub trigger: TriggerConfig,
}

impl Settings {
    /// Parses a run file.
    /// Returns ConfigFile error if it cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, Kx132Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Kx132Error::ConfigFile(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Kx132Error> {
        toml::from_str(text).map_err(|e| Kx132Error::ConfigFile(e.to_string()))
    }

    pub fn run_request(&self) -> RunRequest {
        RunRequest::new(self.init, self.trigger)
    }

    pub fn ssh_target(&self) -> SshTarget {
        SshTarget {
            binary: self.remote.ssh_binary.clone(),
            host: self
                .remote
                .host
                .clone()
                .unwrap_or_else(|| self.device.host.clone()),
            port: self.remote.port,
            user: self.remote.user.clone(),
            program: self.remote.program.clone(),
            settle: Duration::from_millis(self.remote.settle_ms),
        }
    }

    pub fn simulation_profile(&self) -> SimulationProfile {
        SimulationProfile {
            mode: self.init.mode,
            baseline: Sample::from(self.mock.baseline),
            noise_stdev: self.mock.noise_stdev,
            sample_period: Duration::from_micros(self.mock.sample_period_us),
            trigger_interval: Duration::from_millis(self.mock.trigger_interval_ms),
            block_samples: self.mock.block_samples,
            trigger_index: self.mock.trigger_index,
            seed: self.mock.seed,
        }
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.session.join_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AcquisitionMode, AxisMask, GRange, OutputDataRate, Thresholds, TriggerMode};

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.device.port, 60000);
        assert_eq!(settings.init, InitConfig::default());
        assert_eq!(settings.output.name, "kx132_output");
        assert_eq!(settings.ssh_target().host, "100.200.150.42");
        assert_eq!(settings.device.trigger_timeout_ms, Some(250));
    }

    #[test]
    fn test_parse_labels() {
        let settings = Settings::from_toml_str(
            r#"
            [init]
            mode = "stream"
            odr = "12800 Hz"
            g_range = "16 g"

            [trigger]
            trigger_mode = "Fixed"
            axes = "xyz"
            thresholds = { x = -100, y = 0, z = 70000 }
            "#,
        )
        .unwrap();

        assert_eq!(settings.init.mode, AcquisitionMode::Stream);
        assert_eq!(settings.init.odr, OutputDataRate::Hz12800);
        assert_eq!(settings.init.g_range, GRange::G16);
        assert_eq!(settings.trigger.trigger_mode, TriggerMode::Fixed);
        assert_eq!(settings.trigger.axes, AxisMask::XYZ);
        // Raw values are kept until the session validates them
        assert_eq!(settings.trigger.thresholds, Thresholds::new(-100, 0, 70000));
        assert_eq!(settings.trigger.time_after_ms, 10);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let result = Settings::from_toml_str("[init]\nodr = \"30000 Hz\"\n");
        match result {
            Err(Kx132Error::ConfigFile(message)) => assert!(message.contains("30000 Hz")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_remote_host_override() {
        let settings = Settings::from_toml_str(
            "[device]\nhost = \"10.0.0.2\"\n[remote]\nhost = \"gateway\"\nport = 2222\n",
        )
        .unwrap();
        let target = settings.ssh_target();

        assert_eq!(target.host, "gateway");
        assert_eq!(target.port, 2222);
        assert_eq!(settings.device.host, "10.0.0.2");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[session]\nduration_ms = 250\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.session.duration_ms, Some(250));
        assert!(Settings::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
