//! The closed MSP command-id table.
//!
//! Command ids are fixed by the protocol and must stay bit-exact for
//! compatibility with existing configurators. The set is closed: the
//! flight controller answers any id not listed here with a zero-length
//! error reply.

/// Cycle time and error counters (out)
pub const MSP_STATUS: u8 = 101;
/// 9 DOF raw sensor data: accel, gyro, mag (out)
pub const MSP_RAW_IMU: u8 = 102;
/// Current motor outputs (out)
pub const MSP_MOTOR: u8 = 104;
/// Current RC channel values (out)
pub const MSP_RC: u8 = 105;
/// Attitude angles and heading (out)
pub const MSP_ATTITUDE: u8 = 108;
/// Altitude estimate and variometer (out)
pub const MSP_ALTITUDE: u8 = 109;

/// Optical flow sensor (id reserved, no handler)
pub const MSP_PX4FLOW: u8 = 125;
/// Averaged barometer pressure and sonar altitude (out)
pub const MSP_MB1242: u8 = 126;

/// Set all 8 RC channels (in)
pub const MSP_SET_RAW_RC: u8 = 200;
/// Override motor outputs directly (in)
pub const MSP_SET_MOTOR: u8 = 214;

/// Reboot after the reply is flushed (in)
pub const MSP_REBOOT: u8 = 68;
/// Build date plus reserved expansion space (out)
pub const MSP_BUILDINFO: u8 = 69;

// Out-of-band single bytes, honored only between frames and only while
// the craft is unarmed.

/// No-op acknowledgement byte
pub const OOB_COMMENT: u8 = b'#';
/// Default "reboot to bootloader" byte
pub const DEFAULT_REBOOT_CHARACTER: u8 = b'R';
