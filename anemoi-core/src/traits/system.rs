//! System reset trait

/// Which way to come back up after a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetMode {
    /// Restart the firmware
    Normal,
    /// Restart into the bootloader for reflashing
    Bootloader,
}

/// System reset hook
///
/// On real hardware [`reset`](SystemControl::reset) does not return;
/// the trait returns `()` so host-side test doubles can record the
/// call, and the MSP driver stops processing immediately after
/// invoking it.
pub trait SystemControl {
    /// Reset the system in the given mode
    fn reset(&mut self, mode: ResetMode);
}
