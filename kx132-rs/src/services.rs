//! Ready-made runs wired from a [`Settings`] file.

use log::{error, info};
use std::sync::Arc;
use tokio::task::JoinHandle;

use common::{CommandString, DevicePort, RemoteConfigurator};

use crate::adapters::mock::{LocalConfigurator, SimulatedDevice};
use crate::adapters::ssh::SshConfigurator;
use crate::adapters::tcp::TcpDevice;
use crate::config::Settings;
use crate::encoder;
use crate::models::capture::RunSummary;
use crate::models::errors::Kx132Error;
use crate::models::shutdown;
use crate::session::AcquisitionSession;
use crate::validator;

pub type RunHandle = JoinHandle<Result<RunSummary, Kx132Error>>;

async fn start<C, D>(
    settings: &Settings,
    configurator: C,
    device: D,
) -> Result<(RunHandle, Arc<AcquisitionSession<C>>), Kx132Error>
where
    C: RemoteConfigurator + 'static,
    D: DevicePort + 'static,
{
    let session = Arc::new(AcquisitionSession::new(configurator));
    let path = session
        .start(
            device,
            settings.run_request(),
            &settings.output.directory,
            &settings.output.name,
        )
        .await?;
    info!("Run started. Writing to {}", path.display());

    let run_for_millis = settings.session.duration_ms;
    let join_timeout = settings.join_timeout();
    let handle = tokio::spawn({
        let session = session.clone();
        async move {
            let mut shutdown = shutdown::listen_for_shutdown(session.stop_signal(), run_for_millis);
            tokio::select! {
                _ = session.finished() => {}
                _ = &mut shutdown => {}
            }
            shutdown.abort();

            let result = session.shutdown(join_timeout).await;
            if let Err(e) = &result {
                error!("Error in acquisition run: {}", e);
            }
            result
        }
    });
    Ok((handle, session))
}

/// Starts a run against the real device: the firmware is launched over ssh (or only
/// logged when the remote is disabled) and samples are read over TCP.
///
/// The run stops on Ctrl+C or after `session.duration_ms`.
///
/// # Returns
///
/// Returns a tuple containing:
/// * A `JoinHandle` resolving to the summary of the run.
/// * The `AcquisitionSession`, for subscribing to events or resending the trigger.
pub async fn run_service(
    settings: &Settings,
) -> Result<(RunHandle, Arc<AcquisitionSession<Box<dyn RemoteConfigurator>>>), Kx132Error> {
    let configurator: Box<dyn RemoteConfigurator> = if settings.remote.enabled {
        Box::new(SshConfigurator::new(settings.ssh_target()))
    } else {
        Box::new(LocalConfigurator)
    };
    start(settings, configurator, settings.device.tcp_device()).await
}

/// Starts a run against a simulated device. Nothing leaves the host.
pub async fn run_mock_service(
    settings: &Settings,
) -> Result<(RunHandle, Arc<AcquisitionSession<LocalConfigurator>>), Kx132Error> {
    let device = SimulatedDevice::new(settings.simulation_profile());
    start(settings, LocalConfigurator, device).await
}

/// Full device command of `settings`, thresholds validated.
pub fn encode(settings: &Settings) -> CommandString {
    let validated = validator::validate(&settings.trigger);
    encoder::encode_command(&settings.init, &validated.config)
}

/// Sends the trigger part of `settings` straight to a device that is already
/// acquiring, outside of any session.
pub async fn resend_trigger(settings: &Settings) -> Result<CommandString, Kx132Error> {
    let validated = validator::validate(&settings.trigger);
    let command = encoder::encode_trigger(&validated.config);

    let mut device: TcpDevice = settings.device.tcp_device();
    device.init().await?;
    let sent = device.send(command.as_bytes()).await;
    let closed = device.close().await;
    sent?;
    closed?;

    info!("Trigger configuration sent: {}", command);
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::EngineState;
    use common::AcquisitionMode;

    fn mock_settings(mode: AcquisitionMode, directory: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.init.mode = mode;
        settings.output.directory = directory.to_path_buf();
        settings.session.duration_ms = Some(200);
        settings.mock.sample_period_us = 100;
        settings.mock.trigger_interval_ms = 20;
        settings.mock.block_samples = 8;
        settings.mock.seed = Some(42);
        settings
    }

    #[tokio::test]
    async fn test_run_mock_service_stream() {
        let dir = tempfile::tempdir().unwrap();
        let settings = mock_settings(AcquisitionMode::Stream, dir.path());

        let (handle, session) = run_mock_service(&settings).await.unwrap();
        let summary = handle.await.unwrap().unwrap();

        assert_eq!(session.state(), EngineState::Stopped);
        assert!(summary.rows_written > 0);
        let text = std::fs::read_to_string(summary.output.unwrap()).unwrap();
        assert!(text.contains("Modus:             Stream"));
    }

    #[tokio::test]
    async fn test_run_mock_service_triggered() {
        let dir = tempfile::tempdir().unwrap();
        let settings = mock_settings(AcquisitionMode::Triggered, dir.path());

        let (handle, session) = run_mock_service(&settings).await.unwrap();
        let summary = handle.await.unwrap().unwrap();

        assert!(summary.blocks_written > 0);
        assert_eq!(session.block_count(), summary.blocks_written);
        let text = std::fs::read_to_string(summary.output.unwrap()).unwrap();
        assert!(text.starts_with("START_OF_BLOCK_1\n"));
    }

    #[test]
    fn test_encode_validates_thresholds() {
        let mut settings = Settings::default();
        settings.trigger.thresholds.y = 70000;

        assert_eq!(
            encode(&settings).as_str(),
            "-mode trig -odr 15 -res 16 -read sync0 -g 8 \
             -trig offset -edge both -logic 0 -axes x -t1 1 -t2 10 -xO 8000 -yO 32000 -zO 8000"
        );
    }
}
