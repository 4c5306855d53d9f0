use serde::{Deserialize, Serialize};

use crate::constants::N_AXES;
use crate::errors::ConfigError;
use crate::types::Axis;

option_table! {
    /// Whether thresholds are unsigned offsets from a baseline or fixed signed values.
    TriggerMode, flag = "trig" {
        Offset => ("offset", "offset"),
        Fixed => ("fixed", "fixed"),
    }
}

option_table! {
    /// Edge that fires the trigger.
    EdgeDetection, flag = "edge" {
        Positive => ("positive", "pos"),
        Negative => ("negative", "neg"),
        Both => ("both", "both"),
    }
}

option_table! {
    /// How the per-axis conditions combine.
    TriggerLogic, flag = "logic" {
        And => ("AND", "0"),
        Or => ("OR", "1"),
    }
}

option_table! {
    /// Non-empty subset of axes taking part in trigger evaluation.
    AxisMask, flag = "axes" {
        X => ("X", "x"),
        Y => ("Y", "y"),
        XY => ("XY", "xy"),
        Z => ("Z", "z"),
        XZ => ("XZ", "xz"),
        YZ => ("YZ", "yz"),
        XYZ => ("XYZ", "xyz"),
    }
}

impl AxisMask {
    /// Builds the mask selecting exactly `axes`.
    /// Returns EmptyAxisMask error if no axis is given.
    pub fn from_axes(axes: &[Axis]) -> Result<Self, ConfigError> {
        let has = |axis: Axis| axes.contains(&axis);
        match (has(Axis::X), has(Axis::Y), has(Axis::Z)) {
            (true, false, false) => Ok(AxisMask::X),
            (false, true, false) => Ok(AxisMask::Y),
            (true, true, false) => Ok(AxisMask::XY),
            (false, false, true) => Ok(AxisMask::Z),
            (true, false, true) => Ok(AxisMask::XZ),
            (false, true, true) => Ok(AxisMask::YZ),
            (true, true, true) => Ok(AxisMask::XYZ),
            (false, false, false) => Err(ConfigError::EmptyAxisMask),
        }
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.label().contains(match axis {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        })
    }

    pub fn axes(&self) -> Vec<Axis> {
        Axis::ALL
            .iter()
            .copied()
            .filter(|axis| self.contains(*axis))
            .collect()
    }
}

/// Raw per-axis trigger thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Thresholds {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn inner(&self) -> [i64; N_AXES] {
        [self.x, self.y, self.z]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(8000, 8000, 8000)
    }
}

impl From<[i64; N_AXES]> for Thresholds {
    fn from(value: [i64; N_AXES]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

/// Per-run trigger configuration.
///
/// Thresholds are raw user input until they go through threshold validation; the
/// encoder never emits them unvalidated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub trigger_mode: TriggerMode,
    pub edge: EdgeDetection,
    pub time_before_ms: u32,
    pub time_after_ms: u32,
    pub thresholds: Thresholds,
    pub logic: TriggerLogic,
    pub axes: AxisMask,
}

impl TriggerConfig {
    /// Returns a copy with `thresholds` replaced.
    pub fn with_thresholds(&self, thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ..*self
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            trigger_mode: TriggerMode::Offset,
            edge: EdgeDetection::Both,
            time_before_ms: 1,
            time_after_ms: 10,
            thresholds: Thresholds::default(),
            logic: TriggerLogic::And,
            axes: AxisMask::X,
        }
    }
}
