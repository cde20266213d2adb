//! MSP port/session state and the serial poll loop.

use anemoi_protocol::commands::{DEFAULT_REBOOT_CHARACTER, OOB_COMMENT};
use anemoi_protocol::{FrameEvent, FrameParser};

use crate::msp::dispatch::{evaluate, DispatchAction};
use crate::traits::{Mixer, RcInputs, ResetMode, SerialPort, StateEstimator, SystemControl};

/// Session state for one MSP transport connection
///
/// Exactly one port is active at a time; supporting more is a matter of
/// keying one of these per transport. The port owns its parser (and
/// through it the input buffer) and the pending-reboot flag; nothing
/// else mutates either.
#[derive(Debug)]
pub struct MspPort {
    parser: FrameParser,
    pending_reboot: bool,
    reboot_character: u8,
}

impl Default for MspPort {
    fn default() -> Self {
        Self::new()
    }
}

impl MspPort {
    /// Create a port with the default bootloader-reboot character
    pub fn new() -> Self {
        Self {
            parser: FrameParser::new(),
            pending_reboot: false,
            reboot_character: DEFAULT_REBOOT_CHARACTER,
        }
    }

    /// Use a different out-of-band bootloader-reboot character
    pub fn with_reboot_character(mut self, character: u8) -> Self {
        self.reboot_character = character;
        self
    }

    /// Returns true if a reboot is pending from a previous poll
    pub fn reboot_pending(&self) -> bool {
        self.pending_reboot
    }

    /// Drain and process every byte the transport currently has
    ///
    /// If a reboot was requested by the previous poll it fires here,
    /// before any byte is read, so the reply that acknowledged it has
    /// already gone out. The loop never blocks waiting for bytes; a
    /// partial frame simply stays buffered until the next poll.
    ///
    /// While `armed` is false, bytes arriving between frames are
    /// checked for the two out-of-band commands: [`OOB_COMMENT`] is a
    /// no-op, and the configured reboot character resets straight into
    /// the bootloader. Armed craft ignore both.
    pub fn poll<P, R, M, E, S>(
        &mut self,
        serial: &mut P,
        rc: &mut R,
        mixer: &mut M,
        estimator: &E,
        system: &mut S,
        armed: bool,
    ) where
        P: SerialPort,
        R: RcInputs,
        M: Mixer,
        E: StateEstimator,
        S: SystemControl,
    {
        if self.pending_reboot {
            system.reset(ResetMode::Normal);
            return;
        }

        while serial.bytes_waiting() > 0 {
            let byte = serial.read_byte();

            match self.parser.feed(byte) {
                Ok(Some(FrameEvent::Complete(frame))) => {
                    let action = evaluate(&frame, serial, rc, mixer, estimator);
                    if action == DispatchAction::RebootRequested {
                        self.pending_reboot = true;
                    }
                }
                Ok(Some(FrameEvent::Unframed(byte))) if !armed => {
                    if byte == OOB_COMMENT {
                        // no-op acknowledgement
                    } else if byte == self.reboot_character {
                        system.reset(ResetMode::Bootloader);
                        return;
                    }
                }
                // Mid-frame progress, unframed bytes while armed, and
                // dropped frames (bad checksum, oversized length) all
                // fall through: the parser has already resynchronized.
                Ok(_) | Err(_) => {}
            }
        }
    }
}
