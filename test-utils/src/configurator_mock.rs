use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use common::{CommandString, RemoteConfigError, RemoteConfigurator};

/// Remote configurator that records the commands pushed to it.
#[derive(Clone, Debug, Default)]
pub struct RecordingConfigurator {
    pushed: Arc<Mutex<Vec<String>>>,
    releases: Arc<AtomicUsize>,
    reject: bool,
}

impl RecordingConfigurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurator that rejects every push.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn pushed(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteConfigurator for RecordingConfigurator {
    async fn push(&self, command: &CommandString) -> Result<(), RemoteConfigError> {
        self.pushed.lock().unwrap().push(command.to_string());
        if self.reject {
            return Err(RemoteConfigError::Rejected("permission denied".to_string()));
        }
        Ok(())
    }

    async fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
