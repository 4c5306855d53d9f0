use log::{error, info};
use tokio::signal;

use common::StopSignal;

/// Sets `stop` on Ctrl+C, or after `run_for_millis` when given.
pub(crate) struct ShutdownListener {
    stop: StopSignal,
}

impl ShutdownListener {
    fn new(stop: StopSignal) -> Self {
        Self { stop }
    }

    async fn listen_for_shutdown(&self, run_for_millis: Option<u64>) {
        if let Some(time_to_live_millis) = run_for_millis {
            tokio::time::sleep(std::time::Duration::from_millis(time_to_live_millis)).await;
            info!("Run time of {} ms elapsed. Sending stop signal...", time_to_live_millis);
        } else {
            if let Err(e) = signal::ctrl_c().await {
                error!("Error while waiting for Ctrl+C: {}", e);
                return;
            }
            info!("Ctrl+C received. Sending stop signal...");
        }
        self.stop.set();
    }
}

pub(crate) fn listen_for_shutdown(
    stop: StopSignal,
    run_for_millis: Option<u64>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let listener = ShutdownListener::new(stop);
        listener.listen_for_shutdown(run_for_millis).await;
    })
}
