//! Command dispatch: one decoded frame in, exactly one reply frame out.
//!
//! The command set is closed, so dispatch is an exhaustive match on the
//! command id with the unknown-id error reply as the default arm. Every
//! arm, including the default, terminates by emitting a complete reply
//! frame with its trailing checksum.

use anemoi_protocol::commands::{
    MSP_ALTITUDE, MSP_ATTITUDE, MSP_BUILDINFO, MSP_MB1242, MSP_MOTOR, MSP_RAW_IMU, MSP_RC,
    MSP_REBOOT, MSP_SET_MOTOR, MSP_SET_RAW_RC, MSP_STATUS,
};
use anemoi_protocol::{Frame, PayloadCursor, ReplyWriter, SerialTx};

use crate::traits::{Mixer, RcInputs, StateEstimator, BARO_TAB_SIZE, MOTOR_COUNT, RC_CHANNEL_COUNT};

/// Firmware build date, `MMM DD YYYY` as ASCII
pub const BUILD_DATE: &[u8; 11] = b"Jun 12 2025";

/// Follow-up the driver must perform after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchAction {
    /// Nothing further
    None,
    /// Set the pending-reboot flag; the reply for this frame has
    /// already been flushed, the reset happens on the next poll
    RebootRequested,
}

/// Dispatch one decoded frame to its handler
///
/// Emits exactly one reply frame (success or error) on `tx` and returns
/// any follow-up action for the driver. Unknown command ids get a
/// zero-length error reply; this is the only wire-visible error signal.
pub fn evaluate<T, R, M, E>(
    frame: &Frame,
    tx: &mut T,
    rc: &mut R,
    mixer: &mut M,
    estimator: &E,
) -> DispatchAction
where
    T: SerialTx,
    R: RcInputs,
    M: Mixer,
    E: StateEstimator,
{
    match frame.command {
        MSP_SET_RAW_RC => {
            let mut cursor = PayloadCursor::new(frame);
            for channel in 0..RC_CHANNEL_COUNT {
                rc.set_channel(channel, cursor.read_u16());
            }
            ReplyWriter::reply(tx, frame.command, 0).finish();
            rc.frame_received();
        }

        MSP_SET_MOTOR => {
            let mut cursor = PayloadCursor::new(frame);
            for motor in 0..MOTOR_COUNT {
                mixer.set_motor(motor, cursor.read_u16() as i16);
            }
            ReplyWriter::reply(tx, frame.command, 0).finish();
        }

        MSP_STATUS => {
            let mut writer = ReplyWriter::reply(tx, frame.command, 11);
            writer.write_u16(estimator.cycle_time_us());
            writer.write_u16(estimator.i2c_error_count());
            writer.write_u16(0); // sensors, reserved
            writer.write_u8(0); // profile, reserved
            writer.write_u32(0); // future expansion
            writer.finish();
        }

        MSP_RAW_IMU => {
            let imu = estimator.raw_imu();
            let mut writer = ReplyWriter::reply(tx, frame.command, 18);
            for &value in &imu[..3] {
                writer.write_i16(value / 8); // accel
            }
            for &value in &imu[3..] {
                writer.write_i16(value); // gyro, mag
            }
            writer.finish();
        }

        MSP_MOTOR => {
            let mut writer = ReplyWriter::reply(tx, frame.command, 2 * MOTOR_COUNT as u8);
            for motor in 0..MOTOR_COUNT {
                writer.write_i16(mixer.motor(motor));
            }
            writer.finish();
        }

        MSP_RC => {
            let mut writer = ReplyWriter::reply(tx, frame.command, 2 * RC_CHANNEL_COUNT as u8);
            for channel in 0..RC_CHANNEL_COUNT {
                writer.write_u16(rc.channel(channel));
            }
            writer.finish();
        }

        MSP_ATTITUDE => {
            let attitude = estimator.attitude();
            let mut writer = ReplyWriter::reply(tx, frame.command, 6);
            writer.write_i16(attitude.angles[0]);
            writer.write_i16(attitude.angles[1]);
            writer.write_i16(attitude.heading);
            writer.finish();
        }

        MSP_ALTITUDE => {
            let altitude = estimator.altitude();
            let mut writer = ReplyWriter::reply(tx, frame.command, 6);
            writer.write_i32(altitude.altitude_cm);
            writer.write_i16(altitude.vario_cm_s);
            writer.finish();
        }

        MSP_MB1242 => {
            let mut writer = ReplyWriter::reply(tx, frame.command, 8);
            writer.write_u32(estimator.baro_pressure_sum() / (BARO_TAB_SIZE as u32 - 1));
            writer.write_i32(estimator.sonar_altitude_cm());
            writer.finish();
        }

        MSP_REBOOT => {
            // Reply first; the reset itself is deferred to the next
            // poll so this frame is guaranteed to be flushed.
            ReplyWriter::reply(tx, frame.command, 0).finish();
            return DispatchAction::RebootRequested;
        }

        MSP_BUILDINFO => {
            let mut writer = ReplyWriter::reply(tx, frame.command, 11 + 4 + 4);
            writer.write_bytes(BUILD_DATE);
            writer.write_u32(0); // future expansion
            writer.write_u32(0); // future expansion
            writer.finish();
        }

        _ => {
            ReplyWriter::error(tx, frame.command, 0).finish();
        }
    }

    DispatchAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msp::mock::{wire_checksum, MockMixer, MockRc, MockSerial};

    use crate::msp::mock::MockEstimator;
    use anemoi_protocol::commands::MSP_PX4FLOW;

    fn dispatch(frame: &Frame) -> (MockSerial, MockRc, MockMixer, DispatchAction) {
        let mut serial = MockSerial::new();
        let mut rc = MockRc::default();
        let mut mixer = MockMixer::default();
        let action = evaluate(frame, &mut serial, &mut rc, &mut mixer, &MockEstimator);
        (serial, rc, mixer, action)
    }

    #[test]
    fn test_status_reply_shape() {
        let (serial, _, _, action) = dispatch(&Frame::empty(MSP_STATUS));

        assert_eq!(action, DispatchAction::None);
        assert_eq!(&serial.tx[..5], &[0x24, 0x4D, 0x3E, 0x0B, 0x65]);
        assert_eq!(serial.tx.len(), 6 + 11);
        // cycle time 1000, 2 i2c errors, reserved zeros
        assert_eq!(&serial.tx[5..16], &[0xE8, 0x03, 0x02, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(serial.tx[16], wire_checksum(&serial.tx));
    }

    #[test]
    fn test_raw_imu_scales_accel_only() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_RAW_IMU));

        assert_eq!(serial.tx[3], 18);
        // accel 800/-64/8192 divided by 8, gyro/mag raw
        assert_eq!(&serial.tx[5..11], &[100, 0, 0xF8, 0xFF, 0x00, 0x04]);
        assert_eq!(&serial.tx[11..15], &[10, 0, 20, 0]);
        assert_eq!(serial.tx[23], wire_checksum(&serial.tx));
    }

    #[test]
    fn test_motor_reply_reads_mixer() {
        let frame = Frame::empty(MSP_MOTOR);
        let mut serial = MockSerial::new();
        let mut rc = MockRc::default();
        let mut mixer = MockMixer {
            motors: [1200, 1300, -500, 0],
        };
        evaluate(&frame, &mut serial, &mut rc, &mut mixer, &MockEstimator);

        assert_eq!(serial.tx[3], 8);
        assert_eq!(&serial.tx[5..9], &[0xB0, 0x04, 0x14, 0x05]);
        assert_eq!(&serial.tx[9..11], &[0x0C, 0xFE]); // -500
    }

    #[test]
    fn test_rc_reply_reads_channels() {
        let frame = Frame::empty(MSP_RC);
        let mut serial = MockSerial::new();
        let mut rc = MockRc {
            channels: [1500, 1000, 2000, 1500, 1500, 1500, 1500, 885],
            frames_received: 0,
        };
        let mut mixer = MockMixer::default();
        evaluate(&frame, &mut serial, &mut rc, &mut mixer, &MockEstimator);

        assert_eq!(serial.tx[3], 16);
        assert_eq!(&serial.tx[5..9], &[0xDC, 0x05, 0xE8, 0x03]);
        assert_eq!(&serial.tx[19..21], &[0x75, 0x03]); // 885
    }

    #[test]
    fn test_attitude_reply() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_ATTITUDE));

        assert_eq!(serial.tx[3], 6);
        // angles 150, -230, heading 90
        assert_eq!(&serial.tx[5..11], &[0x96, 0x00, 0x1A, 0xFF, 0x5A, 0x00]);
    }

    #[test]
    fn test_altitude_reply() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_ALTITUDE));

        assert_eq!(serial.tx[3], 6);
        // 12345 cm, -12 cm/s
        assert_eq!(&serial.tx[5..11], &[0x39, 0x30, 0x00, 0x00, 0xF4, 0xFF]);
    }

    #[test]
    fn test_mb1242_averages_pressure() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_MB1242));

        assert_eq!(serial.tx[3], 8);
        // 2_020_000 / 20 = 101_000
        assert_eq!(&serial.tx[5..9], &[0x88, 0x8A, 0x01, 0x00]);
        assert_eq!(&serial.tx[9..13], &[88, 0, 0, 0]);
    }

    #[test]
    fn test_buildinfo_reply() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_BUILDINFO));

        assert_eq!(serial.tx[3], 19);
        assert_eq!(&serial.tx[5..16], BUILD_DATE);
        assert!(serial.tx[5..16].iter().all(u8::is_ascii));
        assert_eq!(&serial.tx[16..24], &[0; 8]);
        assert_eq!(serial.tx[24], wire_checksum(&serial.tx));
    }

    #[test]
    fn test_set_raw_rc_updates_store() {
        let mut payload = [0u8; 16];
        for (channel, chunk) in payload.chunks_exact_mut(2).enumerate() {
            let value = 1000 + 100 * channel as u16;
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        let frame = Frame::new(MSP_SET_RAW_RC, &payload).unwrap();
        let (serial, rc, _, action) = dispatch(&frame);

        assert_eq!(action, DispatchAction::None);
        assert_eq!(rc.channels, [1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700]);
        assert_eq!(rc.frames_received, 1);
        // Zero-length success reply
        assert_eq!(&serial.tx[..], &[0x24, 0x4D, 0x3E, 0x00, 0xC8, 0xC8]);
    }

    #[test]
    fn test_set_motor_forwards_to_mixer() {
        let mut payload = [0u8; 8];
        for (motor, chunk) in payload.chunks_exact_mut(2).enumerate() {
            let value = 1100 + 10 * motor as u16;
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        let frame = Frame::new(MSP_SET_MOTOR, &payload).unwrap();
        let (serial, _, mixer, _) = dispatch(&frame);

        assert_eq!(mixer.motors, [1100, 1110, 1120, 1130]);
        assert_eq!(serial.tx[2], 0x3E);
        assert_eq!(serial.tx[3], 0);
    }

    #[test]
    fn test_reboot_replies_then_requests_reset() {
        let (serial, _, _, action) = dispatch(&Frame::empty(MSP_REBOOT));

        assert_eq!(action, DispatchAction::RebootRequested);
        assert_eq!(&serial.tx[..], &[0x24, 0x4D, 0x3E, 0x00, 0x44, 0x44]);
    }

    #[test]
    fn test_unknown_command_error_reply() {
        let (serial, _, _, action) = dispatch(&Frame::empty(103));

        assert_eq!(action, DispatchAction::None);
        assert_eq!(&serial.tx[..], &[0x24, 0x4D, 0x21, 0x00, 0x67, 0x67]);
    }

    #[test]
    fn test_reserved_px4flow_id_is_unhandled() {
        let (serial, _, _, _) = dispatch(&Frame::empty(MSP_PX4FLOW));

        assert_eq!(serial.tx[2], 0x21);
        assert_eq!(serial.tx[3], 0);
    }

    #[test]
    fn test_short_set_payload_reads_zeros() {
        // Declared 4 bytes for an 8-channel command: the missing
        // channels read as zero, never as stale buffer contents.
        let frame = Frame::new(MSP_SET_RAW_RC, &[0xDC, 0x05, 0xE8, 0x03]).unwrap();
        let (_, rc, _, _) = dispatch(&frame);

        assert_eq!(rc.channels, [1500, 1000, 0, 0, 0, 0, 0, 0]);
    }
}
