//! Serial port communication
//!
//! Provides low-level serial port operations for direct hardware
//! connection to cutting devices over USB or RS-232.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Baud rate configuration (data bits, stop bits, parity are fixed at
//!   8-N-1 by the session)
//! - A [`Transport`]/[`Link`] seam so the device session can be driven by
//!   a mock in tests
//!
//! The link serializes concurrent writers behind an interior lock: the
//! streaming loop and the emergency-stop path may both write, and their
//! bytes must interleave at line granularity, not corrupt each other.

use parking_lot::Mutex;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use vinylkit_core::{Error, LinkError, Result};

/// Serial parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialParity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Parameters for opening a serial link
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Port path (e.g. "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1-2)
    pub stop_bits: u8,
    /// Parity setting
    pub parity: SerialParity,
}

impl ConnectionParams {
    /// Parameters for the fixed cutter configuration: 8 data bits, 1 stop
    /// bit, no parity, at the given baud rate.
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
        }
    }
}

/// Information about an available serial port
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// Serial number if available
    pub serial_number: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set serial number
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List available serial ports on the system
///
/// Filters ports to patterns a cutter plausibly enumerates as:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    match serialport::available_ports() {
        Ok(ports) => {
            let port_infos: Vec<SerialPortInfo> = ports
                .iter()
                .filter(|port| is_valid_cutter_port(&port.port_name))
                .map(|port| {
                    let info = SerialPortInfo::new(&port.port_name, port_description(port));

                    match &port.port_type {
                        serialport::SerialPortType::UsbPort(usb_info) => {
                            let mut info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                            if let Some(ref mfg) = usb_info.manufacturer {
                                info = info.with_manufacturer(mfg);
                            }
                            if let Some(ref serial) = usb_info.serial_number {
                                info = info.with_serial_number(serial);
                            }
                            info
                        }
                        _ => info,
                    }
                })
                .collect();

            Ok(port_infos)
        }
        Err(e) => {
            tracing::error!("Failed to enumerate serial ports: {}", e);
            Err(LinkError::Enumerate {
                reason: e.to_string(),
            }
            .into())
        }
    }
}

/// Check if a port name matches plausible cutter hardware patterns
fn is_valid_cutter_port(port_name: &str) -> bool {
    // Windows COM ports
    if port_name.starts_with("COM") && port_name[3..].chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    // Linux USB and ACM devices
    if port_name.starts_with("/dev/ttyUSB") || port_name.starts_with("/dev/ttyACM") {
        return true;
    }

    // macOS serial and modem devices
    if port_name.starts_with("/dev/cu.usbserial-") || port_name.starts_with("/dev/cu.usbmodem") {
        return true;
    }

    false
}

/// Get a user-friendly description for a port
fn port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Convert a parity setting to serialport format
fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

/// One open byte link to a device.
///
/// Writes may be issued from more than one call site (the streaming loop
/// and the emergency-stop path); implementations serialize them.
pub trait Link: Send + Sync {
    /// Write raw bytes to the device.
    fn write(&self, data: &[u8]) -> io::Result<()>;

    /// Take the incoming telemetry line stream.
    ///
    /// Yields each newline-terminated line received from the device; the
    /// channel closes when the link is lost. The stream can be taken once.
    fn take_lines(&self) -> Option<mpsc::UnboundedReceiver<String>>;

    /// Port identifier this link is bound to.
    fn port_name(&self) -> String;

    /// Close the link.
    fn close(&self) -> io::Result<()>;
}

/// Factory for links; the seam tests replace with a mock.
pub trait Transport: Send + Sync {
    /// List candidate ports.
    fn list(&self) -> Result<Vec<SerialPortInfo>>;

    /// Open a link with the given parameters.
    fn open(&self, params: &ConnectionParams) -> Result<Arc<dyn Link>>;
}

/// Real transport over the `serialport` crate.
pub struct SerialTransport;

impl Transport for SerialTransport {
    fn list(&self) -> Result<Vec<SerialPortInfo>> {
        list_ports()
    }

    fn open(&self, params: &ConnectionParams) -> Result<Arc<dyn Link>> {
        Ok(Arc::new(SerialLink::open(params)?))
    }
}

/// Real serial link implementation.
///
/// The write half sits behind a mutex; a dedicated reader thread pumps
/// received lines into an unbounded channel until the port errors or the
/// receiver goes away.
pub struct SerialLink {
    port_name: String,
    writer: Mutex<Box<dyn serialport::SerialPort>>,
    lines: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl SerialLink {
    /// Open a serial port with the given parameters.
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(10)) // Short timeout for non-blocking reads
            .data_bits(match params.data_bits {
                5 => serialport::DataBits::Five,
                6 => serialport::DataBits::Six,
                7 => serialport::DataBits::Seven,
                8 => serialport::DataBits::Eight,
                _ => {
                    return Err(Error::other(format!(
                        "invalid data bits: {}",
                        params.data_bits
                    )))
                }
            })
            .stop_bits(match params.stop_bits {
                1 => serialport::StopBits::One,
                2 => serialport::StopBits::Two,
                _ => {
                    return Err(Error::other(format!(
                        "invalid stop bits: {}",
                        params.stop_bits
                    )))
                }
            })
            .parity(to_serialport_parity(params.parity));

        let port = builder.open().map_err(|e| {
            tracing::warn!("Failed to open serial port {}: {}", params.port, e);
            LinkError::FailedToOpen {
                port: params.port.clone(),
                reason: e.to_string(),
            }
        })?;

        let reader = port.try_clone().map_err(|e| LinkError::FailedToOpen {
            port: params.port.clone(),
            reason: format!("cannot clone port handle for reading: {}", e),
        })?;

        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::Builder::new()
            .name(format!("serial-reader {}", params.port))
            .spawn(move || read_loop(reader, tx))
            .map_err(|e| LinkError::FailedToOpen {
                port: params.port.clone(),
                reason: format!("cannot spawn reader thread: {}", e),
            })?;

        Ok(Self {
            port_name: params.port.clone(),
            writer: Mutex::new(port),
            lines: Mutex::new(Some(rx)),
        })
    }
}

impl Link for SerialLink {
    fn write(&self, data: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(data)?;
        writer.flush()
    }

    fn take_lines(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.lines.lock().take()
    }

    fn port_name(&self) -> String {
        self.port_name.clone()
    }

    fn close(&self) -> io::Result<()> {
        // The OS handle closes when the link and its reader clone drop.
        Ok(())
    }
}

/// Pump newline-terminated telemetry into the channel until the port dies
/// or the session stops listening.
fn read_loop(port: Box<dyn serialport::SerialPort>, tx: mpsc::UnboundedSender<String>) {
    let mut reader = BufReader::new(port);
    let mut line = String::new();

    loop {
        match reader.read_line(&mut line) {
            Ok(0) => break, // port closed
            Ok(_) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() && tx.send(trimmed.to_string()).is_err() {
                    break; // session went away
                }
                line.clear();
            }
            // A timeout mid-line keeps the partial read accumulated in
            // `line` for the next pass.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!("serial read loop ended: {}", e);
                break;
            }
        }
    }
}
