//! Checksummed reply serialization.
//!
//! Every outgoing frame, success or error, is built the same way: three
//! un-checksummed marker bytes, then length and command id, then the
//! payload, then the trailing XOR checksum. [`ReplyWriter`] owns the
//! running accumulator and guarantees the trailing byte is emitted
//! exactly once.

use crate::frame::{FRAME_START, PROTOCOL_M, STATUS_ERROR, STATUS_OK};

/// Byte sink for outgoing frames
///
/// Byte emission is assumed always to succeed; transport-level
/// backpressure, if any, is the implementor's concern.
pub trait SerialTx {
    /// Write one byte to the output channel
    fn write_byte(&mut self, byte: u8);
}

/// Serializer for one outgoing reply frame
///
/// Construction emits the frame header and resets the checksum
/// accumulator at the defined point (after the three marker bytes,
/// before the length). Every byte written afterwards is folded into the
/// accumulator; [`finish`](ReplyWriter::finish) consumes the writer and
/// appends the trailing checksum byte.
pub struct ReplyWriter<'a, T: SerialTx> {
    tx: &'a mut T,
    checksum: u8,
}

impl<'a, T: SerialTx> ReplyWriter<'a, T> {
    /// Begin a successful reply (`$M>`) for the given command
    pub fn reply(tx: &'a mut T, command: u8, payload_len: u8) -> Self {
        Self::begin(tx, STATUS_OK, command, payload_len)
    }

    /// Begin an error reply (`$M!`) for the given command
    pub fn error(tx: &'a mut T, command: u8, payload_len: u8) -> Self {
        Self::begin(tx, STATUS_ERROR, command, payload_len)
    }

    fn begin(tx: &'a mut T, status: u8, command: u8, payload_len: u8) -> Self {
        tx.write_byte(FRAME_START);
        tx.write_byte(PROTOCOL_M);
        tx.write_byte(status);

        // Start calculating a new checksum: the marker bytes above are
        // not part of it.
        let mut writer = Self { tx, checksum: 0 };
        writer.write_u8(payload_len);
        writer.write_u8(command);
        writer
    }

    /// Write one byte and fold it into the checksum
    pub fn write_u8(&mut self, value: u8) {
        self.tx.write_byte(value);
        self.checksum ^= value;
    }

    /// Write a 16-bit value, little-endian
    pub fn write_u16(&mut self, value: u16) {
        self.write_u8(value as u8);
        self.write_u8((value >> 8) as u8);
    }

    /// Write a signed 16-bit value, little-endian
    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    /// Write a 32-bit value, little-endian
    pub fn write_u32(&mut self, value: u32) {
        self.write_u8(value as u8);
        self.write_u8((value >> 8) as u8);
        self.write_u8((value >> 16) as u8);
        self.write_u8((value >> 24) as u8);
    }

    /// Write a signed 32-bit value, little-endian
    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    /// Write a raw byte slice, checksummed
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_u8(byte);
        }
    }

    /// Emit the trailing checksum byte, completing the frame
    pub fn finish(self) {
        let checksum = self.checksum;
        self.tx.write_byte(checksum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, FrameParser, MAX_FRAME_SIZE};
    use heapless::Vec;

    #[derive(Default)]
    struct CapturedTx {
        bytes: Vec<u8, MAX_FRAME_SIZE>,
    }

    impl SerialTx for CapturedTx {
        fn write_byte(&mut self, byte: u8) {
            let _ = self.bytes.push(byte);
        }
    }

    fn wire_checksum(frame_bytes: &[u8]) -> u8 {
        // XOR over everything between the markers and the trailing byte
        frame_bytes[3..frame_bytes.len() - 1]
            .iter()
            .fold(0, |acc, &b| acc ^ b)
    }

    #[test]
    fn test_empty_success_reply() {
        let mut tx = CapturedTx::default();
        ReplyWriter::reply(&mut tx, 200, 0).finish();

        assert_eq!(&tx.bytes[..], &[0x24, 0x4D, 0x3E, 0x00, 0xC8, 0xC8]);
    }

    #[test]
    fn test_empty_error_reply() {
        let mut tx = CapturedTx::default();
        ReplyWriter::error(&mut tx, 103, 0).finish();

        assert_eq!(&tx.bytes[..], &[0x24, 0x4D, 0x21, 0x00, 0x67, 0x67]);
    }

    #[test]
    fn test_multibyte_fields_are_little_endian() {
        let mut tx = CapturedTx::default();
        let mut writer = ReplyWriter::reply(&mut tx, 109, 6);
        writer.write_i32(0x0102_0304);
        writer.write_i16(-2);
        writer.finish();

        assert_eq!(&tx.bytes[5..11], &[0x04, 0x03, 0x02, 0x01, 0xFE, 0xFF]);
        let trailing = tx.bytes[tx.bytes.len() - 1];
        assert_eq!(trailing, wire_checksum(&tx.bytes));
    }

    #[test]
    fn test_checksum_excludes_markers() {
        let mut tx = CapturedTx::default();
        let mut writer = ReplyWriter::reply(&mut tx, 105, 2);
        writer.write_u16(0xABCD);
        writer.finish();

        assert_eq!(tx.bytes[tx.bytes.len() - 1], 2 ^ 105 ^ 0xCD ^ 0xAB);
    }

    #[test]
    fn test_reply_parses_as_request_with_direction_swapped() {
        let mut tx = CapturedTx::default();
        let mut writer = ReplyWriter::reply(&mut tx, 105, 4);
        writer.write_u16(1500);
        writer.write_u16(1000);
        writer.finish();

        // Swap '>' for '<' and the bytes form a valid inbound frame
        let mut bytes = tx.bytes.clone();
        bytes[2] = crate::frame::DIR_REQUEST;

        let mut parser = FrameParser::new();
        let frame = parser.feed_bytes(&bytes).unwrap().unwrap();
        assert_eq!(frame.command, 105);
        assert_eq!(frame.payload.len(), 4);
        assert_eq!(frame, Frame::new(105, &[0xDC, 0x05, 0xE8, 0x03]).unwrap());
    }

    #[test]
    fn test_raw_bytes_are_checksummed() {
        let mut tx = CapturedTx::default();
        let mut writer = ReplyWriter::reply(&mut tx, 69, 3);
        writer.write_bytes(b"Jan");
        writer.finish();

        assert_eq!(&tx.bytes[5..8], b"Jan");
        assert_eq!(tx.bytes[8], wire_checksum(&tx.bytes));
    }
}
