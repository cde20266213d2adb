//! Hardware abstraction traits
//!
//! These traits define the interface between the MSP layer and the
//! rest of the flight controller: the serial transport, the RC input
//! store, the motor mixer, the state estimator, and system reset.

pub mod estimator;
pub mod mixer;
pub mod rc;
pub mod serial;
pub mod system;

pub use estimator::{AltitudeEstimate, Attitude, StateEstimator, BARO_TAB_SIZE};
pub use mixer::{Mixer, MOTOR_COUNT};
pub use rc::{RcInputs, RC_CHANNEL_COUNT};
pub use serial::SerialPort;
pub use system::{ResetMode, SystemControl};
