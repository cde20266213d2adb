//! Board-agnostic command/telemetry logic for the Anemoi flight controller
//!
//! This crate contains everything between the raw serial transport and
//! the flight-control loop that does not depend on specific hardware:
//!
//! - Hardware abstraction traits (serial port, RC inputs, mixer, state
//!   estimator, system reset)
//! - The MSP port/session driver and command dispatch
//!
//! The transport itself (UART, USB-CDC, radio) lives behind the
//! [`traits::SerialPort`] seam and is expected to deliver an ordered
//! byte stream with no guaranteed framing.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod msp;
pub mod traits;
