pub mod device;
pub mod publisher;
pub mod remote;

pub use crate::traits::device::DevicePort;
pub use crate::traits::publisher::Notifiable;
pub use crate::traits::remote::RemoteConfigurator;
