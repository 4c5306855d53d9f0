use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

option_table! {
    /// Acquisition mode, fixed for a whole run.
    AcquisitionMode, flag = "mode" {
        Stream => ("Stream", "stream"),
        Triggered => ("Triggered", "trig"),
    }
}

option_table! {
    /// Output data rate of the sensor.
    OutputDataRate, flag = "odr" {
        Hz0_781 => ("0,781 Hz", "0"),
        Hz1_563 => ("1,563 Hz", "1"),
        Hz3_125 => ("3,125 Hz", "2"),
        Hz6_25 => ("6,25 Hz", "3"),
        Hz12_5 => ("12,5 Hz", "4"),
        Hz25 => ("25 Hz", "5"),
        Hz50 => ("50 Hz", "6"),
        Hz100 => ("100 Hz", "7"),
        Hz200 => ("200 Hz", "8"),
        Hz400 => ("400 Hz", "9"),
        Hz800 => ("800 Hz", "10"),
        Hz1600 => ("1600 Hz", "11"),
        Hz3200 => ("3200 Hz", "12"),
        Hz6400 => ("6400 Hz", "13"),
        Hz12800 => ("12800 Hz", "14"),
        Hz25600 => ("25600 Hz", "15"),
    }
}

option_table! {
    /// Bit resolution of each axis value. Only 16 bit is supported by the firmware.
    Resolution, flag = "res" {
        Bits16 => ("16-Bit", "16"),
    }
}

option_table! {
    /// How the firmware drains the sensor.
    ReadMode, flag = "read" {
        Synchronous => ("Synchronous Read", "sync0"),
        Asynchronous => ("Asynchronous Read", "async"),
    }
}

option_table! {
    /// Sensitivity range.
    GRange, flag = "g" {
        G2 => ("2 g", "2"),
        G4 => ("4 g", "4"),
        G8 => ("8 g", "8"),
        G16 => ("16 g", "16"),
    }
}

/// Per-run acquisition configuration. Never mutated once a run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    pub mode: AcquisitionMode,
    pub odr: OutputDataRate,
    pub resolution: Resolution,
    pub read_mode: ReadMode,
    pub g_range: GRange,
}

impl InitConfig {
    pub fn new(
        mode: AcquisitionMode,
        odr: OutputDataRate,
        resolution: Resolution,
        read_mode: ReadMode,
        g_range: GRange,
    ) -> Self {
        Self {
            mode,
            odr,
            resolution,
            read_mode,
            g_range,
        }
    }

    /// Builds a configuration from the labels a user picked.
    /// Returns UnknownOption error if any label is not a recognized option.
    pub fn from_labels(
        mode: &str,
        odr: &str,
        resolution: &str,
        read_mode: &str,
        g_range: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            mode: mode.try_into()?,
            odr: odr.try_into()?,
            resolution: resolution.try_into()?,
            read_mode: read_mode.try_into()?,
            g_range: g_range.try_into()?,
        })
    }
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            mode: AcquisitionMode::Triggered,
            odr: OutputDataRate::Hz25600,
            resolution: Resolution::Bits16,
            read_mode: ReadMode::Synchronous,
            g_range: GRange::G8,
        }
    }
}
