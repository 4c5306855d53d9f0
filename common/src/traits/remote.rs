use async_trait::async_trait;

use crate::errors::RemoteConfigError;
use crate::types::CommandString;

/// Pushes a device command to the sensor host before acquisition starts.
#[async_trait]
pub trait RemoteConfigurator: Send + Sync {
    /// Starts the firmware with `command`. Returns once the firmware accepted it or failed.
    async fn push(&self, command: &CommandString) -> Result<(), RemoteConfigError>;

    /// Drops the remote session opened by `push`, if any.
    async fn release(&self) {}
}

#[async_trait]
impl<T> RemoteConfigurator for Box<T>
where
    T: RemoteConfigurator + ?Sized,
{
    async fn push(&self, command: &CommandString) -> Result<(), RemoteConfigError> {
        (**self).push(command).await
    }

    async fn release(&self) {
        (**self).release().await
    }
}
