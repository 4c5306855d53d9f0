/// Number of accelerometer axes
pub const N_AXES: usize = 3;

/// Maximum length in bytes of a command pushed to the device
pub const MAX_COMMAND_LEN: usize = 256;

/// Value an out-of-range threshold is replaced with
pub const THRESHOLD_SENTINEL: i64 = 32000;

/// Inclusive threshold bounds in offset mode
pub const OFFSET_THRESHOLD_BOUNDS: (i64, i64) = (0, 65536);

/// Inclusive threshold bounds in fixed mode
pub const FIXED_THRESHOLD_BOUNDS: (i64, i64) = (i16::MIN as i64, i16::MAX as i64);
