//! Threshold validation.
//!
//! Each trigger mode bounds thresholds differently: offset thresholds are unsigned
//! 16-bit offsets `[0, 65536]`, fixed thresholds are signed 16-bit values
//! `[-32768, 32767]`. A value outside its bound is replaced with `+32000` and reported
//! as a [`ThresholdWarning`]. Validation never rejects a run.

use std::fmt;

use common::constants::{FIXED_THRESHOLD_BOUNDS, OFFSET_THRESHOLD_BOUNDS, THRESHOLD_SENTINEL};
use common::{Axis, Thresholds, TriggerConfig, TriggerMode};

/// An out-of-range threshold that was clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdWarning {
    pub axis: Axis,
    pub value: i64,
    pub bounds: (i64, i64),
    pub replacement: i64,
}

impl fmt::Display for ThresholdWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Threshold #{} was set out of boundary [{} - {}]. It will be set to +{}.",
            self.axis.number(),
            self.bounds.0,
            self.bounds.1,
            self.replacement
        )
    }
}

/// Trigger configuration whose thresholds lie within their mode's bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedTrigger {
    pub config: TriggerConfig,
    pub warnings: Vec<ThresholdWarning>,
}

/// Inclusive threshold bounds for `mode`.
pub fn threshold_bounds(mode: TriggerMode) -> (i64, i64) {
    match mode {
        TriggerMode::Offset => OFFSET_THRESHOLD_BOUNDS,
        TriggerMode::Fixed => FIXED_THRESHOLD_BOUNDS,
    }
}

/// Replaces every threshold outside the bound of `mode` with the sentinel value.
pub fn validate_thresholds(
    mode: TriggerMode,
    thresholds: Thresholds,
) -> (Thresholds, Vec<ThresholdWarning>) {
    let bounds = threshold_bounds(mode);
    let mut validated = thresholds;
    let mut warnings = Vec::new();

    for axis in Axis::ALL {
        let value = thresholds.get(axis);
        if !(bounds.0..=bounds.1).contains(&value) {
            let warning = ThresholdWarning {
                axis,
                value,
                bounds,
                replacement: THRESHOLD_SENTINEL,
            };
            log::warn!("{}", warning);
            validated.set(axis, THRESHOLD_SENTINEL);
            warnings.push(warning);
        }
    }
    (validated, warnings)
}

/// Validates the thresholds of `config` against its trigger mode.
pub fn validate(config: &TriggerConfig) -> ValidatedTrigger {
    let (thresholds, warnings) = validate_thresholds(config.trigger_mode, config.thresholds);
    ValidatedTrigger {
        config: config.with_thresholds(thresholds),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_bounds_are_inclusive() {
        let thresholds = Thresholds::new(0, 65536, 8000);
        let (validated, warnings) = validate_thresholds(TriggerMode::Offset, thresholds);

        assert_eq!(validated, thresholds);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_offset_out_of_range_is_clamped() {
        let (validated, warnings) =
            validate_thresholds(TriggerMode::Offset, Thresholds::new(70000, -1, 10));

        assert_eq!(validated, Thresholds::new(32000, 32000, 10));
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].axis, Axis::X);
        assert_eq!(warnings[0].value, 70000);
        assert_eq!(warnings[0].bounds, (0, 65536));
        assert_eq!(warnings[1].axis, Axis::Y);
    }

    #[test]
    fn test_fixed_bounds_are_inclusive() {
        let thresholds = Thresholds::new(-32768, 32767, 0);
        let (validated, warnings) = validate_thresholds(TriggerMode::Fixed, thresholds);

        assert_eq!(validated, thresholds);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_fixed_out_of_range_is_clamped() {
        let (validated, warnings) =
            validate_thresholds(TriggerMode::Fixed, Thresholds::new(5, -32769, 40000));

        assert_eq!(validated, Thresholds::new(5, 32000, 32000));
        assert_eq!(
            warnings.iter().map(|w| w.axis.number()).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(warnings.iter().all(|w| w.bounds == (-32768, 32767)));
    }

    #[test]
    fn test_sweep_preserves_in_range_values() {
        for mode in TriggerMode::ALL {
            let (low, high) = threshold_bounds(*mode);
            for value in [low - 100_000, low - 1, low, 0, 32000, high, high + 1, i64::MAX] {
                let (validated, _) = validate_thresholds(*mode, Thresholds::new(value, 0, 0));
                let expected = if (low..=high).contains(&value) {
                    value
                } else {
                    32000
                };
                assert_eq!(validated.x, expected, "mode {:?}, value {}", mode, value);
            }
        }
    }

    #[test]
    fn test_warning_message_names_axis_and_bound() {
        let (_, warnings) =
            validate_thresholds(TriggerMode::Offset, Thresholds::new(70000, 0, 0));

        assert_eq!(
            warnings[0].to_string(),
            "Threshold #1 was set out of boundary [0 - 65536]. It will be set to +32000."
        );
    }

    #[test]
    fn test_validate_keeps_other_fields() {
        let config = TriggerConfig {
            thresholds: Thresholds::new(1, 2, 99999),
            ..TriggerConfig::default()
        };
        let validated = validate(&config);

        assert_eq!(validated.config.thresholds, Thresholds::new(1, 2, 32000));
        assert_eq!(validated.config.axes, config.axes);
        assert_eq!(validated.warnings.len(), 1);
    }
}
