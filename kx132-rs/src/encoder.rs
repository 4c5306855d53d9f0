//! Translation of typed configuration into the device command string.
//!
//! Flags are emitted in a fixed order: mode, odr, resolution, read mode, g range, then
//! for the trigger part trigger mode, edge, logic, axes, `t1`, `t2` and the three
//! thresholds.

use common::{CommandString, InitConfig, TriggerConfig, TriggerMode};

use crate::validator;

/// Flags the three thresholds are emitted under.
pub fn threshold_flags(mode: TriggerMode) -> [&'static str; 3] {
    match mode {
        TriggerMode::Offset => ["xO", "yO", "zO"],
        TriggerMode::Fixed => ["xF", "yF", "zF"],
    }
}

pub fn encode_init(config: &InitConfig) -> CommandString {
    let mut command = CommandString::new();
    command
        .push_flag(config.mode.flag(), config.mode.flag_value())
        .push_flag(config.odr.flag(), config.odr.flag_value())
        .push_flag(config.resolution.flag(), config.resolution.flag_value())
        .push_flag(config.read_mode.flag(), config.read_mode.flag_value())
        .push_flag(config.g_range.flag(), config.g_range.flag_value());
    command
}

/// Encodes the trigger part. Thresholds are validated first, so out-of-range values
/// are emitted as the sentinel.
pub fn encode_trigger(config: &TriggerConfig) -> CommandString {
    let (thresholds, _) = validator::validate_thresholds(config.trigger_mode, config.thresholds);
    let [x_flag, y_flag, z_flag] = threshold_flags(config.trigger_mode);

    let mut command = CommandString::new();
    command
        .push_flag(config.trigger_mode.flag(), config.trigger_mode.flag_value())
        .push_flag(config.edge.flag(), config.edge.flag_value())
        .push_flag(config.logic.flag(), config.logic.flag_value())
        .push_flag(config.axes.flag(), config.axes.flag_value())
        .push_flag("t1", config.time_before_ms)
        .push_flag("t2", config.time_after_ms)
        .push_flag(x_flag, thresholds.x)
        .push_flag(y_flag, thresholds.y)
        .push_flag(z_flag, thresholds.z);
    command
}

/// Full command pushed through the remote configurator.
pub fn encode_command(init: &InitConfig, trigger: &TriggerConfig) -> CommandString {
    let mut command = encode_init(init);
    command.extend(&encode_trigger(trigger));
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{
        AcquisitionMode, AxisMask, EdgeDetection, GRange, OutputDataRate, ReadMode, Resolution,
        Thresholds, TriggerLogic,
    };
    use once_cell::sync::Lazy;

    static TRIGGER: Lazy<TriggerConfig> = Lazy::new(|| TriggerConfig {
        trigger_mode: TriggerMode::Offset,
        edge: EdgeDetection::Positive,
        time_before_ms: 5,
        time_after_ms: 20,
        thresholds: Thresholds::new(100, 200, 300),
        logic: TriggerLogic::Or,
        axes: AxisMask::XZ,
    });

    fn threshold_value(command: &CommandString, flag: &str) -> Option<i64> {
        command
            .tokens()
            .into_iter()
            .find(|(f, _)| *f == flag)
            .and_then(|(_, v)| v.parse().ok())
    }

    #[test]
    fn test_encode_init() {
        let config = InitConfig::new(
            AcquisitionMode::Stream,
            OutputDataRate::Hz25600,
            Resolution::Bits16,
            ReadMode::Synchronous,
            GRange::G8,
        );

        assert_eq!(
            encode_init(&config).as_str(),
            "-mode stream -odr 15 -res 16 -read sync0 -g 8"
        );
    }

    #[test]
    fn test_encode_init_is_deterministic() {
        let config = InitConfig::default();
        assert_eq!(encode_init(&config), encode_init(&config));
        assert_eq!(
            encode_init(&config).as_str(),
            "-mode trig -odr 15 -res 16 -read sync0 -g 8"
        );
    }

    #[test]
    fn test_encode_trigger_offset() {
        assert_eq!(
            encode_trigger(&TRIGGER).as_str(),
            "-trig offset -edge pos -logic 1 -axes xz -t1 5 -t2 20 -xO 100 -yO 200 -zO 300"
        );
    }

    #[test]
    fn test_encode_trigger_fixed() {
        let config = TriggerConfig {
            trigger_mode: TriggerMode::Fixed,
            thresholds: Thresholds::new(-100, 0, 32767),
            ..*TRIGGER
        };

        assert_eq!(
            encode_trigger(&config).as_str(),
            "-trig fixed -edge pos -logic 1 -axes xz -t1 5 -t2 20 -xF -100 -yF 0 -zF 32767"
        );
    }

    #[test]
    fn test_threshold_flags_follow_trigger_mode_only() {
        // Values valid for both modes must not change which flags are emitted
        for mode in TriggerMode::ALL {
            let config = TriggerConfig {
                trigger_mode: *mode,
                thresholds: Thresholds::new(10, 20, 30),
                ..*TRIGGER
            };
            let command = encode_trigger(&config);
            let flags: Vec<&str> = command.tokens().into_iter().map(|(f, _)| f).collect();

            let (expected, forbidden) = match mode {
                TriggerMode::Offset => (["xO", "yO", "zO"], ["xF", "yF", "zF"]),
                TriggerMode::Fixed => (["xF", "yF", "zF"], ["xO", "yO", "zO"]),
            };
            assert!(expected.iter().all(|f| flags.contains(f)));
            assert!(forbidden.iter().all(|f| !flags.contains(f)));
        }
    }

    #[test]
    fn test_encode_trigger_clamps_out_of_range() {
        let config = TriggerConfig {
            thresholds: Thresholds::new(70000, 65536, -1),
            ..*TRIGGER
        };
        let command = encode_trigger(&config);

        assert_eq!(threshold_value(&command, "xO"), Some(32000));
        assert_eq!(threshold_value(&command, "yO"), Some(65536));
        assert_eq!(threshold_value(&command, "zO"), Some(32000));
    }

    #[test]
    fn test_encode_command_order() {
        let command = encode_command(&InitConfig::default(), &TRIGGER);
        let flags: Vec<&str> = command.tokens().into_iter().map(|(f, _)| f).collect();

        assert_eq!(
            flags,
            vec![
                "mode", "odr", "res", "read", "g", "trig", "edge", "logic", "axes", "t1", "t2",
                "xO", "yO", "zO"
            ]
        );
    }
}
