//! State estimator trait and telemetry data types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of the barometer averaging table
///
/// MB1242 telemetry reports the pressure sum divided by one less than
/// this (the table keeps one slot in flight).
pub const BARO_TAB_SIZE: usize = 21;

/// Attitude solution from the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attitude {
    /// Roll and pitch angles (0.1 degree units)
    pub angles: [i16; 2],
    /// Heading (degrees)
    pub heading: i16,
}

/// Vertical state from the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AltitudeEstimate {
    /// Estimated altitude (cm)
    pub altitude_cm: i32,
    /// Vertical speed (cm/s)
    pub vario_cm_s: i16,
}

/// Read-only view of the flight state used by telemetry replies
pub trait StateEstimator {
    /// Raw 9-DOF sensor data: accel x/y/z, gyro x/y/z, mag x/y/z
    fn raw_imu(&self) -> [i16; 9];

    /// Current attitude solution
    fn attitude(&self) -> Attitude;

    /// Current altitude estimate
    fn altitude(&self) -> AltitudeEstimate;

    /// Duration of the last main loop cycle (microseconds)
    fn cycle_time_us(&self) -> u16;

    /// Accumulated I2C bus error count
    fn i2c_error_count(&self) -> u16;

    /// Sum of the barometer pressure averaging table (Pa)
    fn baro_pressure_sum(&self) -> u32;

    /// Latest sonar altitude reading (cm)
    fn sonar_altitude_cm(&self) -> i32;
}
