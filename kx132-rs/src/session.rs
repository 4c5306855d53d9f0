//! Acquisition session: the object a controller talks to.
//!
//! A session pushes the configuration through the remote configurator, initializes the
//! device and hands both to a worker task running the [`AcquisitionEngine`]. While a
//! run is active the controller can stop it, queue commands for the device and observe
//! it through event listeners. Events are queued and dispatched by a separate task, so
//! slow listeners never hold up the read loop.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;
use uuid::Uuid;

use common::constants::MAX_COMMAND_LEN;
use common::{
    Clock, CommandString, DeviceError, DevicePort, InitConfig, Notifiable, RemoteConfigurator,
    StopSignal, SystemClock, TriggerConfig,
};
use publisher::{PublisherError, PublisherManager};

use crate::encoder;
use crate::engine::AcquisitionEngine;
use crate::models::capture::RunSummary;
use crate::models::errors::Kx132Error;
use crate::models::events::{AcquisitionEvent, EngineState, EventKind, EventSender, RunStatus};
use crate::recorder::{self, CaptureRecorder};
use crate::validator::{self, ThresholdWarning};

/// Fully specified start request of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub init: InitConfig,
    pub trigger: TriggerConfig,
}

impl RunRequest {
    pub fn new(init: InitConfig, trigger: TriggerConfig) -> Self {
        Self { init, trigger }
    }
}

struct ActiveRun {
    worker: JoinHandle<Result<RunSummary, Kx132Error>>,
    dispatcher: JoinHandle<()>,
    commands: mpsc::UnboundedSender<CommandString>,
    done: Arc<Notify>,
    cancel: Arc<Notify>,
    output: Option<PathBuf>,
}

pub struct AcquisitionSession<C>
where
    C: RemoteConfigurator,
{
    configurator: C,
    publishers: PublisherManager<AcquisitionEvent, EventKind>,
    stop: StopSignal,
    status: RunStatus,
    clock: Arc<dyn Clock>,
    run: Mutex<Option<ActiveRun>>,
}

impl<C> AcquisitionSession<C>
where
    C: RemoteConfigurator,
{
    pub fn new(configurator: C) -> Self {
        Self::with_clock(configurator, Arc::new(SystemClock))
    }

    /// Creates a session whose records and file names are stamped by `clock`.
    pub fn with_clock(configurator: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            configurator,
            publishers: PublisherManager::new(&EventKind::ALL),
            stop: StopSignal::new(),
            status: RunStatus::default(),
            clock,
            run: Mutex::new(None),
        }
    }

    /// Starts a run recording into a new file in `directory`.
    /// Returns the path of the output file.
    pub async fn start<D>(
        &self,
        device: D,
        request: RunRequest,
        directory: &Path,
        name: &str,
    ) -> Result<PathBuf, Kx132Error>
    where
        D: DevicePort + 'static,
    {
        let mut run = self.run.lock().await;
        self.ensure_idle(&mut run).await?;
        self.stop.reset();

        let (file, path) = recorder::create_output_file(directory, name, self.clock.as_ref())?;
        *run = Some(self.launch(device, request, file, Some(path.clone())).await?);
        Ok(path)
    }

    /// Starts a run recording into `sink`.
    pub async fn start_with_sink<D, W>(
        &self,
        device: D,
        request: RunRequest,
        sink: W,
    ) -> Result<(), Kx132Error>
    where
        D: DevicePort + 'static,
        W: Write + Send + 'static,
    {
        let mut run = self.run.lock().await;
        self.ensure_idle(&mut run).await?;
        self.stop.reset();

        *run = Some(self.launch(device, request, sink, None).await?);
        Ok(())
    }

    /// Fails while a run is active. A run that ended without being waited on is reaped:
    /// its outcome is logged and its resources are released.
    async fn ensure_idle(&self, run: &mut Option<ActiveRun>) -> Result<(), Kx132Error> {
        match run.take() {
            Some(active)
                if !active.worker.is_finished() && self.status.state() == EngineState::Running =>
            {
                *run = Some(active);
                Err(Kx132Error::AlreadyRunning)
            }
            Some(active) => {
                match active.worker.await {
                    Ok(Ok(summary)) => info!(
                        "Previous run was never waited on. It wrote {} rows and {} blocks.",
                        summary.rows_written, summary.blocks_written
                    ),
                    Ok(Err(e)) => warn!("Previous run was never waited on. It failed: {}", e),
                    Err(e) => error!("Previous run was never waited on. Its worker failed: {}", e),
                }
                self.release(active.dispatcher).await;
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn launch<D, W>(
        &self,
        mut device: D,
        request: RunRequest,
        sink: W,
        output: Option<PathBuf>,
    ) -> Result<ActiveRun, Kx132Error>
    where
        D: DevicePort + 'static,
        W: Write + Send + 'static,
    {
        let validated = validator::validate(&request.trigger);
        let command = encoder::encode_command(&request.init, &validated.config);

        info!("Pushing device configuration: {}", command);
        self.configurator.push(&command).await?;
        if let Err(e) = device.init().await {
            error!("Device interface could not be initialized: {}", e);
            self.configurator.release().await;
            return Err(e.into());
        }
        info!("Device interface initialized");

        if self.stop.is_set() {
            info!("Stop requested while the run was starting");
            if let Err(e) = device.close().await {
                warn!("Could not close device interface: {}", e);
            }
            self.configurator.release().await;
            return Err(Kx132Error::Cancelled);
        }

        let (events, receiver) = EventSender::channel();
        let dispatcher = self.spawn_dispatcher(receiver);
        let (commands, command_queue) = mpsc::unbounded_channel();
        let done = Arc::new(Notify::new());
        let cancel = Arc::new(Notify::new());

        self.status.set_block_count(0);
        self.status.set_state(EngineState::Running);
        events.emit(AcquisitionEvent::StateChanged(EngineState::Running));

        let engine = AcquisitionEngine::new(
            device,
            CaptureRecorder::new(sink, request.init, self.clock.clone()),
            request.init,
            validated.config,
            self.stop.clone(),
            events,
            self.status.clone(),
            command_queue,
            done.clone(),
            cancel.clone(),
        );
        let worker = tokio::spawn(engine.run());

        Ok(ActiveRun {
            worker,
            dispatcher,
            commands,
            done,
            cancel,
            output,
        })
    }

    fn spawn_dispatcher(
        &self,
        mut receiver: mpsc::UnboundedReceiver<AcquisitionEvent>,
    ) -> JoinHandle<()> {
        let publishers = self.publishers.clone();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                publishers.notify_listeners(event.kind(), Arc::new(event));
            }
        })
    }

    /// Requests the active run to stop. Idempotent.
    pub fn stop(&self) {
        self.stop.set();
    }

    /// Resolves once the active run has stopped, or immediately without one.
    pub async fn finished(&self) {
        let done = self.run.lock().await.as_ref().map(|run| run.done.clone());
        if let Some(done) = done {
            if self.status.state() == EngineState::Running {
                done.notified().await;
            }
        }
    }

    /// Waits for the active run to end on its own and returns its summary.
    pub async fn wait(&self) -> Result<RunSummary, Kx132Error> {
        let run = self.run.lock().await.take().ok_or(Kx132Error::NotRunning)?;
        let output = run.output.clone();
        let result = run.worker.await;
        self.release(run.dispatcher).await;

        let mut summary = result.map_err(|e| Kx132Error::Join(e.to_string()))??;
        summary.output = output;
        Ok(summary)
    }

    /// Stops the active run and waits at most `timeout` for the worker.
    ///
    /// A worker that does not stop in time is cancelled: its device call in flight is
    /// dropped, then the device and the sink are closed. A worker that does not finish
    /// that within another `timeout` is aborted.
    pub async fn shutdown(&self, timeout: Duration) -> Result<RunSummary, Kx132Error> {
        self.stop();
        let mut run = self.run.lock().await.take().ok_or(Kx132Error::NotRunning)?;
        let output = run.output.clone();

        let result = match tokio::time::timeout(timeout, &mut run.worker).await {
            Ok(result) => result,
            Err(_) => {
                error!("Acquisition worker did not stop within {:?}. Cancelling it.", timeout);
                self.force_release(run, timeout).await;
                return Err(Kx132Error::JoinTimeout(timeout));
            }
        };
        self.release(run.dispatcher).await;

        let mut summary = result.map_err(|e| Kx132Error::Join(e.to_string()))??;
        summary.output = output;
        Ok(summary)
    }

    async fn force_release(&self, mut run: ActiveRun, timeout: Duration) {
        run.cancel.notify_one();
        if tokio::time::timeout(timeout, &mut run.worker).await.is_ok() {
            self.release(run.dispatcher).await;
            return;
        }

        error!("Acquisition worker ignored the cancellation. Aborting it.");
        run.worker.abort();
        self.release(run.dispatcher).await;
        self.status.set_state(EngineState::Stopped);
        self.publishers.notify_listeners(
            EventKind::StateChanged,
            Arc::new(AcquisitionEvent::StateChanged(EngineState::Stopped)),
        );
        run.done.notify_one();
    }

    async fn release(&self, dispatcher: JoinHandle<()>) {
        // Ends once the engine drops its event sender
        if let Err(e) = dispatcher.await {
            error!("Event dispatcher failed: {}", e);
        }
        self.configurator.release().await;
    }

    /// Queues a raw command for the device. It is sent between two reads.
    pub async fn send_command(&self, command: CommandString) -> Result<(), Kx132Error> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(DeviceError::CommandTooLong {
                len: command.len(),
                max: MAX_COMMAND_LEN,
            }
            .into());
        }
        let run = self.run.lock().await;
        match run.as_ref() {
            Some(active) if self.status.state() == EngineState::Running => active
                .commands
                .send(command)
                .map_err(|_| Kx132Error::NotRunning),
            _ => Err(Kx132Error::NotRunning),
        }
    }

    /// Re-encodes `trigger` and queues it for the device of the active run.
    /// Returns the queued command and the warnings raised while validating it.
    pub async fn resend_trigger(
        &self,
        trigger: &TriggerConfig,
    ) -> Result<(CommandString, Vec<ThresholdWarning>), Kx132Error> {
        let validated = validator::validate(trigger);
        let command = encoder::encode_trigger(&validated.config);
        self.send_command(command.clone()).await?;
        Ok((command, validated.warnings))
    }

    /// Registers `listener` for events of `kind`.
    pub fn subscribe(
        &self,
        kind: EventKind,
        listener: &mut dyn Notifiable<AcquisitionEvent>,
    ) -> Result<Uuid, PublisherError> {
        self.publishers.add_listener(listener, &kind)
    }

    /// Registers `listener` for every event kind.
    pub fn subscribe_all(
        &self,
        listener: &mut dyn Notifiable<AcquisitionEvent>,
    ) -> Result<Vec<Uuid>, PublisherError> {
        EventKind::ALL
            .iter()
            .map(|kind| self.publishers.add_listener(listener, kind))
            .collect()
    }

    pub fn unsubscribe(&self, id: Uuid) -> Result<(), PublisherError> {
        self.publishers.remove_listener(id)
    }

    pub fn state(&self) -> EngineState {
        self.status.state()
    }

    /// Blocks completely written in the current or last run.
    pub fn block_count(&self) -> u32 {
        self.status.block_count()
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }
}
