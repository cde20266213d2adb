//! Frame parsing and encoding for the MSP wire format.
//!
//! Frame format:
//! - START (1 byte): `'$'` synchronization byte
//! - PROTOCOL (1 byte): `'M'` protocol marker
//! - DIRECTION (1 byte): `'<'` request, `'>'` reply, `'!'` error reply
//! - LENGTH (1 byte): payload length (0-128)
//! - CMD (1 byte): command identifier
//! - PAYLOAD (0-128 bytes): command-specific data, little-endian fields
//! - CHECKSUM (1 byte): XOR of LENGTH, CMD, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = b'$';

/// Protocol marker byte
pub const PROTOCOL_M: u8 = b'M';

/// Direction byte for requests addressed to the flight controller
pub const DIR_REQUEST: u8 = b'<';

/// Direction byte for successful replies
pub const STATUS_OK: u8 = b'>';

/// Direction byte for error replies
pub const STATUS_ERROR: u8 = b'!';

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 128;

/// Maximum complete frame size (3 markers + LENGTH + CMD + payload + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 3 + 1 + 1 + MAX_PAYLOAD_SIZE + 1;

/// Errors that can occur during frame parsing or encoding
///
/// Neither error is reported on the wire: the parser has already
/// returned to the idle state and the byte stream resynchronizes on the
/// next start marker. They exist so callers (and tests) can observe why
/// a frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared payload length exceeds the input buffer capacity
    Oversized,
    /// Trailing checksum byte did not match the accumulated value
    BadChecksum,
    /// Payload exceeds maximum allowed size (encoding only)
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
///
/// Frames are transient: one exists only long enough to be parsed and
/// dispatched (or encoded and transmitted), then the buffer is reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command identifier
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command id and payload
    pub fn new(command: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command: u8) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Calculate the XOR checksum over length, command, and payload
    pub fn calculate_checksum(length: u8, command: u8, payload: &[u8]) -> u8 {
        let mut checksum = length ^ command;
        for &byte in payload {
            checksum ^= byte;
        }
        checksum
    }

    /// Encode this frame as a request (`$M<` direction) into a byte buffer
    ///
    /// Returns the number of bytes written. This is the ground-side
    /// encoding; the flight controller emits replies via
    /// [`ReplyWriter`](crate::writer::ReplyWriter) instead.
    pub fn encode_request(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = 6 + self.payload.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let checksum = Self::calculate_checksum(length, self.command, &self.payload);

        buffer[0] = FRAME_START;
        buffer[1] = PROTOCOL_M;
        buffer[2] = DIR_REQUEST;
        buffer[3] = length;
        buffer[4] = self.command;
        buffer[5..5 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[5 + self.payload.len()] = checksum;

        Ok(frame_len)
    }

    /// Encode this frame as a request into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode_request(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Output of a single parser step that consumed something meaningful
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// A complete frame with a valid checksum
    Complete(Frame),
    /// A byte consumed while idle that was not a start marker
    ///
    /// The session layer inspects these for the out-of-band single-byte
    /// commands; the parser itself attaches no meaning to them.
    Unframed(u8),
}

/// State machine for parsing incoming frames
///
/// The parser consumes one byte per [`feed`](FrameParser::feed) call and
/// is interruptible at any byte boundary: a frame may span any number of
/// calls. No heap allocation occurs; the payload buffer is reused
/// frame-to-frame.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    checksum: u8,
    expected_length: u8,
    command: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for the `'$'` start marker
    Idle,
    /// Got `'$'`, waiting for `'M'`
    WaitingForM,
    /// Got `'M'`, waiting for the `'<'` direction byte
    WaitingForDirection,
    /// Waiting for the declared payload length
    WaitingForLength,
    /// Waiting for the command id
    WaitingForCommand,
    /// Reading payload bytes
    ReadingPayload,
    /// Waiting for the trailing checksum byte
    WaitingForChecksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            buffer: Vec::new(),
            checksum: 0,
            expected_length: 0,
            command: 0,
        }
    }

    /// Reset the parser to the idle state
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.buffer.clear();
        self.checksum = 0;
        self.expected_length = 0;
        self.command = 0;
    }

    /// Returns true if the parser is between frames
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::Idle
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(FrameEvent::Complete(_)))` when a complete valid
    /// frame is parsed, `Ok(Some(FrameEvent::Unframed(_)))` for a
    /// non-marker byte consumed while idle, `Ok(None)` when the byte made
    /// mid-frame progress, or `Err` when a frame was dropped. After any
    /// error the parser is back in the idle state.
    pub fn feed(&mut self, byte: u8) -> Result<Option<FrameEvent>, FrameError> {
        match self.state {
            ParseState::Idle => {
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForM;
                    Ok(None)
                } else {
                    Ok(Some(FrameEvent::Unframed(byte)))
                }
            }
            ParseState::WaitingForM => {
                self.state = if byte == PROTOCOL_M {
                    ParseState::WaitingForDirection
                } else {
                    ParseState::Idle
                };
                Ok(None)
            }
            ParseState::WaitingForDirection => {
                self.state = if byte == DIR_REQUEST {
                    ParseState::WaitingForLength
                } else {
                    ParseState::Idle
                };
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    // Oversized frame: dropped before the command id is
                    // even known, so no error reply is possible.
                    self.reset();
                    return Err(FrameError::Oversized);
                }
                self.expected_length = byte;
                self.buffer.clear();
                self.checksum = byte;
                self.state = ParseState::WaitingForCommand;
                Ok(None)
            }
            ParseState::WaitingForCommand => {
                self.command = byte;
                self.checksum ^= byte;
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                self.checksum ^= byte;
                // Cannot fail: expected_length is bounded by the capacity
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                if byte != self.checksum {
                    self.reset();
                    return Err(FrameError::BadChecksum);
                }

                let frame = Frame {
                    command: self.command,
                    payload: self.buffer.clone(),
                };

                self.reset();
                Ok(Some(FrameEvent::Complete(frame)))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any; unframed bytes are
    /// ignored. Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(FrameEvent::Complete(frame)) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

/// Read cursor over a decoded payload with typed little-endian accessors
///
/// Reads past the end of the payload yield zero. A well-formed sender
/// never triggers this; it exists so a short payload cannot read stale
/// buffer contents.
#[derive(Debug, Clone)]
pub struct PayloadCursor<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> PayloadCursor<'a> {
    /// Create a cursor positioned at the start of a frame's payload
    pub fn new(frame: &'a Frame) -> Self {
        Self {
            payload: &frame.payload,
            position: 0,
        }
    }

    /// Number of payload bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.position)
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> u8 {
        let byte = self.payload.get(self.position).copied().unwrap_or(0);
        self.position += 1;
        byte
    }

    /// Read a little-endian 16-bit value
    pub fn read_u16(&mut self) -> u16 {
        let low = self.read_u8() as u16;
        let high = self.read_u8() as u16;
        low | (high << 8)
    }

    /// Read a little-endian 32-bit value
    pub fn read_u32(&mut self) -> u32 {
        let low = self.read_u16() as u32;
        let high = self.read_u16() as u32;
        low | (high << 16)
    }
}
