//! RC control-input store trait

/// Number of RC channels carried by the protocol
pub const RC_CHANNEL_COUNT: usize = 8;

/// Store for the current RC control inputs
///
/// Owned by the flight-control loop; the MSP layer writes fresh channel
/// values into it when a SET_RAW_RC frame arrives and reads them back
/// for RC telemetry replies.
pub trait RcInputs {
    /// Write one channel value (microseconds, typically 1000-2000)
    ///
    /// `channel` is in `0..RC_CHANNEL_COUNT`.
    fn set_channel(&mut self, channel: usize, value: u16);

    /// Read one channel value
    fn channel(&self, channel: usize) -> u16;

    /// Called once after a full set of channels has been written
    ///
    /// Lets failsafe logic distinguish a fresh control frame from stale
    /// values.
    fn frame_received(&mut self);
}
