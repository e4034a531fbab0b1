//! # Vinylkit Communication
//!
//! The device-facing half of Vinylkit: serial port enumeration, the
//! transport/link seam over the `serialport` crate, telemetry line
//! classification, and the [`DeviceSession`] state machine that streams
//! instruction programs to the cutter.

pub mod serial;
pub mod session;
pub mod telemetry;

pub use serial::{
    list_ports, ConnectionParams, Link, SerialLink, SerialParity, SerialPortInfo, SerialTransport,
    Transport,
};
pub use session::{DeviceSession, SessionConfig, StreamReport};
pub use telemetry::Telemetry;
