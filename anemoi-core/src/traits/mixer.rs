//! Motor mixer trait

/// Number of motor outputs
pub const MOTOR_COUNT: usize = 4;

/// Per-motor access to the mixer outputs
///
/// The setter is an override path used by the configurator's prop
/// balance function; normal flight writes come from the mixer itself.
pub trait Mixer {
    /// Override one motor output value
    ///
    /// `motor` is in `0..MOTOR_COUNT`.
    fn set_motor(&mut self, motor: usize, value: i16);

    /// Read one motor output value
    fn motor(&self, motor: usize) -> i16;
}
