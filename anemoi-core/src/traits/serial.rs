//! Serial transport trait

use anemoi_protocol::SerialTx;

/// Bidirectional serial transport
///
/// The transport delivers an ordered byte stream with no guaranteed
/// framing. The MSP driver never blocks on it: it drains exactly what
/// [`bytes_waiting`](SerialPort::bytes_waiting) reports and returns.
pub trait SerialPort: SerialTx {
    /// Number of received bytes ready to be read without blocking
    fn bytes_waiting(&self) -> usize;

    /// Read one received byte
    ///
    /// Only called when [`bytes_waiting`](SerialPort::bytes_waiting)
    /// reports at least one byte.
    fn read_byte(&mut self) -> u8;
}
