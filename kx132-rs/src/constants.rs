/// TCP port the device firmware serves samples on.
pub const DEFAULT_DEVICE_PORT: u16 = 60000;
pub const DEFAULT_DEVICE_HOST: &str = "100.200.150.42";

/// Command that ends a stream on the device side.
pub const EXIT_CMD: &str = "exit";

pub const DEFAULT_SSH_BINARY: &str = "ssh";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_USER: &str = "pi";
/// Firmware launched by the remote configurator. The command flags are appended to it.
pub const DEFAULT_REMOTE_PROGRAM: &str = "sudo /home/pi/Documents/kx132/build/kx132";
/// How long a freshly started remote command may take to fail before it counts as running.
pub const DEFAULT_REMOTE_SETTLE_MILLIS: u64 = 1500;

pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_CONNECT_RETRY_MILLIS: u64 = 1000;
pub const DEFAULT_READ_TIMEOUT_MILLIS: u64 = 5000;
/// How long a trigger wait lasts before the stop signal is checked again.
pub const DEFAULT_TRIGGER_POLL_MILLIS: u64 = 250;
pub const DEFAULT_JOIN_TIMEOUT_MILLIS: u64 = 2000;

pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_OUTPUT_NAME: &str = "kx132_output";

/// Timestamp printed at the top of every stream header and block header.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
/// Timestamp suffix of output file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%d_%m_%Y__%H_%M_%S";
