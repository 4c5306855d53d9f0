use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use common::Sample;

/// Lifecycle of an acquisition session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    Running,
    Stopped,
}

impl From<u8> for EngineState {
    fn from(value: u8) -> Self {
        match value {
            1 => EngineState::Running,
            2 => EngineState::Stopped,
            _ => EngineState::Idle,
        }
    }
}

impl From<EngineState> for u8 {
    fn from(value: EngineState) -> Self {
        match value {
            EngineState::Idle => 0,
            EngineState::Running => 1,
            EngineState::Stopped => 2,
        }
    }
}

/// Notification emitted by the acquisition engine. Listeners render it; the engine never
/// waits for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquisitionEvent {
    StateChanged(EngineState),
    /// A trigger fired and block `block_id` is being captured.
    TriggerActivated { block_id: u32 },
    /// Capture phase of block `block_id` is over, whether the block was written or not.
    TriggerDeactivated { block_id: u32 },
    /// Reference reading taken at the first trigger of the run.
    NormalizedReadingUpdated(Sample),
    /// Block `block_id` was written completely.
    BlockCompleted {
        block_id: u32,
        sample_count: u32,
        trigger_index: u32,
    },
}

impl AcquisitionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AcquisitionEvent::StateChanged(_) => EventKind::StateChanged,
            AcquisitionEvent::TriggerActivated { .. } => EventKind::TriggerActivated,
            AcquisitionEvent::TriggerDeactivated { .. } => EventKind::TriggerDeactivated,
            AcquisitionEvent::NormalizedReadingUpdated(_) => EventKind::NormalizedReadingUpdated,
            AcquisitionEvent::BlockCompleted { .. } => EventKind::BlockCompleted,
        }
    }
}

/// Topic a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChanged,
    TriggerActivated,
    TriggerDeactivated,
    NormalizedReadingUpdated,
    BlockCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::StateChanged,
        EventKind::TriggerActivated,
        EventKind::TriggerDeactivated,
        EventKind::NormalizedReadingUpdated,
        EventKind::BlockCompleted,
    ];
}

/// Fire-and-forget sending half of the event queue.
#[derive(Clone, Debug)]
pub(crate) struct EventSender {
    tx: mpsc::UnboundedSender<AcquisitionEvent>,
}

impl EventSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<AcquisitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn emit(&self, event: AcquisitionEvent) {
        // Nobody listening anymore is fine
        let _ = self.tx.send(event);
    }
}

/// Run status readable from outside the worker.
#[derive(Clone, Debug, Default)]
pub(crate) struct RunStatus {
    state: Arc<AtomicU8>,
    blocks: Arc<AtomicU32>,
}

impl RunStatus {
    pub(crate) fn state(&self) -> EngineState {
        EngineState::from(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: EngineState) {
        self.state.store(state.into(), Ordering::Release);
    }

    pub(crate) fn block_count(&self) -> u32 {
        self.blocks.load(Ordering::Relaxed)
    }

    pub(crate) fn set_block_count(&self, count: u32) {
        self.blocks.store(count, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_state_round_trip() {
        for state in [EngineState::Idle, EngineState::Running, EngineState::Stopped] {
            assert_eq!(EngineState::from(u8::from(state)), state);
        }
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(
            AcquisitionEvent::TriggerActivated { block_id: 1 }.kind(),
            EventKind::TriggerActivated
        );
        assert_eq!(
            AcquisitionEvent::NormalizedReadingUpdated(Sample::default()).kind(),
            EventKind::NormalizedReadingUpdated
        );
    }

    #[tokio::test]
    async fn test_event_sender_is_ordered() {
        let (events, mut rx) = EventSender::channel();
        events.emit(AcquisitionEvent::TriggerActivated { block_id: 1 });
        events.emit(AcquisitionEvent::TriggerDeactivated { block_id: 1 });
        drop(events);

        assert_eq!(
            rx.recv().await,
            Some(AcquisitionEvent::TriggerActivated { block_id: 1 })
        );
        assert_eq!(
            rx.recv().await,
            Some(AcquisitionEvent::TriggerDeactivated { block_id: 1 })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_run_status() {
        let status = RunStatus::default();
        assert_eq!(status.state(), EngineState::Idle);

        status.set_state(EngineState::Running);
        status.set_block_count(3);
        let shared = status.clone();

        assert_eq!(shared.state(), EngineState::Running);
        assert_eq!(shared.block_count(), 3);
    }
}
