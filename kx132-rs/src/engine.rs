//! The acquisition read loop.
//!
//! One engine drives one run: it owns the device handle, the recorder and the in-flight
//! block, and reports progress through the event queue only. The stop signal is looked
//! at between device reads, never during one.

use std::io::Write;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, Notify};

use common::{
    AcquisitionMode, CommandString, DeviceError, DevicePort, InitConfig, Sample, StopSignal,
    TriggerConfig,
};

use crate::constants::EXIT_CMD;
use crate::models::capture::{CaptureBlock, RunSummary};
use crate::models::errors::Kx132Error;
use crate::models::events::{AcquisitionEvent, EngineState, EventSender, RunStatus};
use crate::recorder::CaptureRecorder;

/// Result of reading the device-side description of a triggered block.
enum Trigger {
    Captured,
    Discarded,
}

pub(crate) struct AcquisitionEngine<D, W>
where
    D: DevicePort,
    W: Write,
{
    device: D,
    recorder: CaptureRecorder<W>,
    init: InitConfig,
    trigger: TriggerConfig,
    stop: StopSignal,
    events: EventSender,
    status: RunStatus,
    commands: mpsc::UnboundedReceiver<CommandString>,
    done: Arc<Notify>,
    cancel: Arc<Notify>,
}

impl<D, W> AcquisitionEngine<D, W>
where
    D: DevicePort,
    W: Write,
{
    /// `device` must already be initialized. `trigger` must hold validated thresholds.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        device: D,
        recorder: CaptureRecorder<W>,
        init: InitConfig,
        trigger: TriggerConfig,
        stop: StopSignal,
        events: EventSender,
        status: RunStatus,
        commands: mpsc::UnboundedReceiver<CommandString>,
        done: Arc<Notify>,
        cancel: Arc<Notify>,
    ) -> Self {
        Self {
            device,
            recorder,
            init,
            trigger,
            stop,
            events,
            status,
            commands,
            done,
            cancel,
        }
    }

    /// Runs until the stop signal is seen, a fatal error occurs or the run is cancelled,
    /// then releases the device and the sink.
    ///
    /// Cancelling drops the device call in flight, so it also ends a run stuck in a read.
    pub(crate) async fn run(mut self) -> Result<RunSummary, Kx132Error> {
        let mut summary = RunSummary::new(self.init.mode);
        info!("Acquisition started in {} mode", self.init.mode);

        let cancel = self.cancel.clone();
        let result = tokio::select! {
            result = self.acquire(&mut summary) => result,
            _ = cancel.notified() => {
                warn!("Acquisition cancelled during a device call");
                Err(Kx132Error::Cancelled)
            }
        };
        self.finish(result).await.map(|_| summary)
    }

    async fn acquire(&mut self, summary: &mut RunSummary) -> Result<(), Kx132Error> {
        match self.init.mode {
            AcquisitionMode::Stream => self.run_stream(summary).await?,
            AcquisitionMode::Triggered => self.run_triggered(summary).await?,
        }
        self.send_exit().await;
        Ok(())
    }

    async fn run_stream(&mut self, summary: &mut RunSummary) -> Result<(), Kx132Error> {
        self.recorder.write_stream_header()?;

        let mut index: u64 = 0;
        while !self.stop.is_set() {
            self.flush_commands().await?;
            let sample = self.device.read_sample().await?;
            index += 1;
            self.recorder.write_row(index, sample)?;
            summary.rows_written = index;
        }
        Ok(())
    }

    async fn run_triggered(&mut self, summary: &mut RunSummary) -> Result<(), Kx132Error> {
        let mut block_id: u32 = 0;

        while !self.stop.is_set() {
            self.flush_commands().await?;
            let first = match self.device.await_trigger().await {
                Ok(sample) => sample,
                // No trigger yet
                Err(DeviceError::Timeout(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            if self.stop.is_set() {
                info!("Stop requested after a trigger read. Discarding it.");
                summary.discarded_reads += 1;
                break;
            }

            block_id += 1;
            self.events
                .emit(AcquisitionEvent::TriggerActivated { block_id });

            let normalized = if block_id == 1 {
                self.events
                    .emit(AcquisitionEvent::NormalizedReadingUpdated(first));
                first
            } else {
                Sample::default()
            };

            let outcome = self.capture_block(block_id, normalized).await;
            self.events
                .emit(AcquisitionEvent::TriggerDeactivated { block_id });

            match outcome? {
                Trigger::Captured => {
                    summary.blocks_written += 1;
                    self.status.set_block_count(summary.blocks_written);
                }
                Trigger::Discarded => {
                    info!("Stop requested before block {} was written. Discarding it.", block_id);
                    summary.discarded_reads += 1;
                    break;
                }
            }
        }
        Ok(())
    }

    async fn capture_block(
        &mut self,
        block_id: u32,
        normalized: Sample,
    ) -> Result<Trigger, Kx132Error> {
        let sample_count = self.device.read_u32().await?;
        let trigger_index = self.device.read_u32().await?;
        if self.stop.is_set() {
            return Ok(Trigger::Discarded);
        }

        let mut block =
            CaptureBlock::new(block_id, normalized, sample_count, trigger_index, self.trigger);
        self.recorder.write_block_header(&block)?;
        while !block.is_complete() {
            let sample = self.device.read_sample().await?;
            let index = block.push(sample);
            self.recorder.write_row(index as u64, sample)?;
        }

        let block = block.seal();
        self.recorder.write_block_trailer(block.id())?;
        debug!("Block {} written with {} samples", block.id(), block.sample_count());
        self.events.emit(AcquisitionEvent::BlockCompleted {
            block_id: block.id(),
            sample_count: block.sample_count(),
            trigger_index: block.trigger_index(),
        });
        Ok(Trigger::Captured)
    }

    /// Tells the firmware the run is over. Best effort.
    async fn send_exit(&mut self) {
        if let Err(e) = self.device.send(EXIT_CMD.as_bytes()).await {
            warn!("Could not send termination command: {}", e);
        }
    }

    /// Sends queued commands. Runs between reads so a send never overlaps a read.
    async fn flush_commands(&mut self) -> Result<(), Kx132Error> {
        while let Ok(command) = self.commands.try_recv() {
            info!("Sending command to device: {}", command);
            self.device.send(command.as_bytes()).await?;
        }
        Ok(())
    }

    async fn finish(self, result: Result<(), Kx132Error>) -> Result<(), Kx132Error> {
        let Self {
            mut device,
            recorder,
            events,
            status,
            done,
            ..
        } = self;

        if let Err(e) = device.close().await {
            warn!("Could not close device interface: {}", e);
        }
        let result = result.and(recorder.close());

        match &result {
            Ok(_) => info!("Acquisition stopped"),
            Err(e) => error!("Acquisition stopped with error: {}", e),
        }
        status.set_state(EngineState::Stopped);
        events.emit(AcquisitionEvent::StateChanged(EngineState::Stopped));
        done.notify_one();
        result
    }
}
