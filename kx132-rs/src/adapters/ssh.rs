//! Remote configurator launching the device firmware over `ssh`.
//!
//! The firmware keeps running for the whole acquisition, so a remote command that is
//! still alive once the settle window has passed counts as a successful push. It is
//! killed on release.

use async_trait::async_trait;
use log::{info, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use common::{CommandString, RemoteConfigError, RemoteConfigurator};

use crate::constants::{
    DEFAULT_REMOTE_PROGRAM, DEFAULT_REMOTE_SETTLE_MILLIS, DEFAULT_SSH_BINARY, DEFAULT_SSH_PORT,
    DEFAULT_SSH_USER,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SshTarget {
    pub binary: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub program: String,
    pub settle: Duration,
}

impl SshTarget {
    pub fn new(host: &str) -> Self {
        Self {
            binary: DEFAULT_SSH_BINARY.to_string(),
            host: host.to_string(),
            port: DEFAULT_SSH_PORT,
            user: DEFAULT_SSH_USER.to_string(),
            program: DEFAULT_REMOTE_PROGRAM.to_string(),
            settle: Duration::from_millis(DEFAULT_REMOTE_SETTLE_MILLIS),
        }
    }

    /// Shell command run on the remote host.
    pub fn remote_command(&self, command: &CommandString) -> String {
        format!("{} {}", self.program, command)
    }

    /// Arguments passed to the ssh binary.
    pub fn args(&self, command: &CommandString) -> Vec<String> {
        vec![
            "-p".to_string(),
            self.port.to_string(),
            format!("{}@{}", self.user, self.host),
            self.remote_command(command),
        ]
    }
}

pub struct SshConfigurator {
    target: SshTarget,
    child: Mutex<Option<Child>>,
}

impl SshConfigurator {
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            child: Mutex::new(None),
        }
    }

    pub fn target(&self) -> &SshTarget {
        &self.target
    }
}

async fn read_stderr(child: &mut Child) -> String {
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        if let Err(e) = pipe.read_to_string(&mut stderr).await {
            warn!("Could not read remote command output: {}", e);
        }
    }
    stderr.trim().to_string()
}

#[async_trait]
impl RemoteConfigurator for SshConfigurator {
    async fn push(&self, command: &CommandString) -> Result<(), RemoteConfigError> {
        // A firmware started by an earlier push must not keep the device busy
        self.release().await;

        info!(
            "Starting '{}' on {}@{}",
            self.target.remote_command(command),
            self.target.user,
            self.target.host
        );
        let mut child = Command::new(&self.target.binary)
            .args(self.target.args(command))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RemoteConfigError::Spawn)?;

        let waited = tokio::time::timeout(self.target.settle, child.wait()).await;
        match waited {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(RemoteConfigError::Exited {
                status: status.code(),
                stderr: read_stderr(&mut child).await,
            }),
            Ok(Err(e)) => Err(RemoteConfigError::Spawn(e)),
            Err(_) => {
                // Still running: the firmware is serving
                *self.child.lock().await = Some(child);
                Ok(())
            }
        }
    }

    async fn release(&self) {
        if let Some(mut child) = self.child.lock().await.take() {
            if let Err(e) = child.kill().await {
                warn!("Could not stop remote command: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(binary: &str) -> SshTarget {
        SshTarget {
            binary: binary.to_string(),
            settle: Duration::from_millis(500),
            ..SshTarget::new("100.200.150.42")
        }
    }

    #[test]
    fn test_args() {
        let mut command = CommandString::new();
        command.push_flag("mode", "trig").push_flag("odr", 15);

        assert_eq!(
            target("ssh").args(&command),
            vec![
                "-p",
                "22",
                "pi@100.200.150.42",
                "sudo /home/pi/Documents/kx132/build/kx132 -mode trig -odr 15"
            ]
        );
    }

    #[tokio::test]
    async fn test_push_succeeds_on_clean_exit() {
        let configurator = SshConfigurator::new(target("true"));
        assert!(configurator.push(&CommandString::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_push_fails_on_error_exit() {
        let configurator = SshConfigurator::new(target("false"));
        let result = configurator.push(&CommandString::new()).await;

        assert!(matches!(
            result,
            Err(RemoteConfigError::Exited {
                status: Some(1),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_push_fails_on_missing_binary() {
        let configurator = SshConfigurator::new(target("/nonexistent/kx132-ssh"));
        let result = configurator.push(&CommandString::new()).await;

        assert!(matches!(result, Err(RemoteConfigError::Spawn(_))));
    }
}
