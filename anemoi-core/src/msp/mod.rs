//! MSP port/session driver and command dispatch
//!
//! The driver is single-threaded, cooperative, and non-blocking: each
//! [`MspPort::poll`](port::MspPort::poll) call drains exactly the bytes
//! the transport already has and returns, expected to be re-invoked
//! from the main control loop. Parser state persists between calls, so
//! a frame may legitimately span multiple polls.

pub mod dispatch;
pub mod port;

pub use dispatch::{evaluate, DispatchAction, BUILD_DATE};
pub use port::MspPort;
