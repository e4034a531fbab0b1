//! Device session state machine
//!
//! One [`DeviceSession`] exists per process and owns the serial link for
//! its lifetime: only the session writes to the link, and only the
//! session's telemetry reader mutates the tracked position.
//!
//! State transitions:
//! `Disconnected → Connecting → Connected → Streaming → Connected`, with
//! `emergency_stop` forcing `Stopped` from any connected state and a lost
//! link forcing `Faulted`. Recovery from `Stopped`/`Faulted` is an
//! explicit `disconnect`/`connect` cycle; the session never reconnects on
//! its own.
//!
//! Streaming is a cooperative sequential loop: each instruction write may
//! suspend the caller, followed by a fixed pacing sleep. The emergency
//! stop writes on an independent path that does not wait on the loop; the
//! link serializes the racing writes. The loop checks session state
//! between instructions and exits early once it is no longer `Streaming`.

use crate::serial::{ConnectionParams, Link, SerialPortInfo, Transport};
use crate::telemetry::Telemetry;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vinylkit_core::{
    EventDispatcher, LinkError, Position, Result, SessionError, SessionEvent, SessionState,
    SessionStatus,
};
use vinylkit_gcode::{CutProgram, Instruction, EMERGENCY_STOP_CODE, HOME_CODE};

/// Session tunables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Baud rate for the serial link.
    pub baud_rate: u32,
    /// Pause inserted after each streamed instruction. The protocol has no
    /// acknowledgement contract in scope, so pacing is time-based.
    pub pacing: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            pacing: Duration::from_millis(10),
        }
    }
}

/// Outcome of a completed or cancelled streaming job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamReport {
    /// Instructions delivered.
    pub completed: usize,
    /// Total instructions in the program.
    pub total: usize,
    /// True when the loop exited early because the session left
    /// `Streaming` (emergency stop or disconnect).
    pub cancelled: bool,
}

/// The single device session of the process.
pub struct DeviceSession {
    transport: Arc<dyn Transport>,
    config: SessionConfig,
    link: RwLock<Option<Arc<dyn Link>>>,
    state: Arc<RwLock<SessionState>>,
    position: Arc<RwLock<Position>>,
    homed: AtomicBool,
    events: EventDispatcher,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl DeviceSession {
    /// Create a session over the given transport, initially disconnected.
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            link: RwLock::new(None),
            state: Arc::new(RwLock::new(SessionState::Disconnected)),
            position: Arc::new(RwLock::new(Position::origin())),
            homed: AtomicBool::new(false),
            events: EventDispatcher::default(),
            reader: Mutex::new(None),
        }
    }

    /// The dispatcher this session publishes events to.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// List candidate device ports.
    pub fn list_ports(&self) -> Result<Vec<SerialPortInfo>> {
        self.transport.list()
    }

    /// Open the link to a device.
    ///
    /// Fails with `AlreadyConnected` unless the session is `Disconnected`.
    /// On link failure the session faults and the error is also published
    /// as an event.
    pub fn connect(&self, port: &str) -> Result<()> {
        {
            let state = self.state.read();
            if *state != SessionState::Disconnected {
                return Err(SessionError::AlreadyConnected.into());
            }
        }
        *self.state.write() = SessionState::Connecting;

        let params = ConnectionParams::new(port, self.config.baud_rate);
        let link = match self.transport.open(&params) {
            Ok(link) => link,
            Err(e) => {
                *self.state.write() = SessionState::Faulted;
                self.events.publish(SessionEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let lines = link.take_lines();
        *self.link.write() = Some(link);
        self.homed.store(false, Ordering::SeqCst);
        *self.state.write() = SessionState::Connected;
        tracing::info!(port, "connected to cutter");
        self.events.publish(SessionEvent::Connected {
            port: port.to_string(),
        });

        if let Some(rx) = lines {
            self.spawn_reader(rx);
        }
        Ok(())
    }

    /// Tear the link down from any state.
    pub fn disconnect(&self) -> Result<()> {
        if let Some(task) = self.reader.lock().take() {
            task.abort();
        }
        if let Some(link) = self.link.write().take() {
            let _ = link.close();
        }
        *self.state.write() = SessionState::Disconnected;
        tracing::info!("disconnected from cutter");
        self.events.publish(SessionEvent::Disconnected);
        Ok(())
    }

    /// Send one instruction, newline-terminated.
    ///
    /// Fails with `NotConnected` unless the session is `Connected` or
    /// `Streaming`. A write failure is surfaced to the caller and as an
    /// event; it does not change session state — the caller decides
    /// whether to fault the session.
    pub fn send_instruction(&self, instruction: &Instruction) -> Result<()> {
        self.write_line(&instruction.to_string())
    }

    /// Send raw command text, newline-terminated.
    ///
    /// Fails with `InvalidCommand` when the text is blank.
    pub fn send_command(&self, command: &str) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return Err(SessionError::InvalidCommand.into());
        }
        self.write_line(command)
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if !self.state.read().can_send() {
            return Err(SessionError::NotConnected.into());
        }
        let link = self
            .link
            .read()
            .clone()
            .ok_or(SessionError::NotConnected)?;

        if let Err(e) = link.write(format!("{}\n", line).as_bytes()) {
            let error = LinkError::Write {
                reason: e.to_string(),
            };
            self.events.publish(SessionEvent::Error {
                message: error.to_string(),
            });
            return Err(error.into());
        }
        tracing::trace!(line, "sent");
        Ok(())
    }

    /// Stream a program in order, with progress events and pacing.
    ///
    /// Requires `Connected`. A write failure aborts the remaining
    /// instructions and leaves the session `Connected` so the caller may
    /// retry; the error reports how many instructions completed. An
    /// emergency stop between instructions cancels the rest and is
    /// reported through [`StreamReport::cancelled`].
    pub async fn stream_program(&self, program: &CutProgram) -> Result<StreamReport> {
        {
            let mut state = self.state.write();
            if *state != SessionState::Connected {
                return Err(SessionError::NotConnected.into());
            }
            *state = SessionState::Streaming;
        }
        self.publish_status();

        let total = program.len();
        for (index, instruction) in program.iter().enumerate() {
            if *self.state.read() != SessionState::Streaming {
                tracing::info!(completed = index, total, "stream cancelled");
                return Ok(StreamReport {
                    completed: index,
                    total,
                    cancelled: true,
                });
            }

            if let Err(e) = self.send_instruction(instruction) {
                let mut state = self.state.write();
                if *state == SessionState::Streaming {
                    *state = SessionState::Connected;
                }
                drop(state);
                tracing::warn!(completed = index, total, "stream aborted: {}", e);
                return Err(SessionError::StreamAborted {
                    completed: index,
                    total,
                    reason: e.to_string(),
                }
                .into());
            }

            let completed = index + 1;
            self.events.publish(SessionEvent::Progress {
                completed,
                total,
                fraction: completed as f64 / total as f64,
            });

            tokio::time::sleep(self.config.pacing).await;
        }

        {
            let mut state = self.state.write();
            if *state == SessionState::Streaming {
                *state = SessionState::Connected;
            }
        }
        self.publish_status();
        tracing::info!(total, "stream complete");
        self.events.publish(SessionEvent::Complete);
        Ok(StreamReport {
            completed: total,
            total,
            cancelled: false,
        })
    }

    /// Home the machine and reset the tracked position to the origin.
    pub fn home(&self) -> Result<()> {
        self.write_line(HOME_CODE)?;
        *self.position.write() = Position::origin();
        self.homed.store(true, Ordering::SeqCst);
        tracing::info!("homed");
        self.events.publish(SessionEvent::Homed {
            position: Position::origin(),
        });
        Ok(())
    }

    /// Halt the machine immediately, from any state except `Disconnected`.
    ///
    /// The stop instruction is written best-effort on an independent path
    /// that bypasses any in-flight streaming loop; a write failure is
    /// ignored since the caller's intent is an unconditional halt. Forces
    /// the session to `Stopped`.
    pub fn emergency_stop(&self) -> Result<()> {
        if *self.state.read() == SessionState::Disconnected {
            return Err(SessionError::NotConnected.into());
        }

        if let Some(link) = self.link.read().clone() {
            let _ = link.write(format!("{}\n", EMERGENCY_STOP_CODE).as_bytes());
        }
        *self.state.write() = SessionState::Stopped;
        tracing::warn!("emergency stop");
        self.events.publish(SessionEvent::EmergencyStop);
        Ok(())
    }

    /// Classify one raw telemetry line and apply its effects.
    ///
    /// Position reports update the tracked position and publish a position
    /// event; device errors publish an error event without changing state;
    /// acknowledgements and unrecognized lines are inert.
    pub fn handle_telemetry(&self, raw: &str) {
        dispatch_telemetry(raw, &self.position, &self.events);
    }

    /// Read the current state, position, and homed flag. No side effects.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: *self.state.read(),
            position: *self.position.read(),
            homed: self.homed.load(Ordering::SeqCst),
        }
    }

    fn publish_status(&self) {
        let status = self.status();
        self.events.publish(SessionEvent::Status {
            state: status.state,
            position: status.position,
            homed: status.homed,
        });
    }

    /// Run the telemetry reader until the line stream closes. A stream
    /// closing underneath an active session means the link was lost: the
    /// session faults and stays faulted until an explicit
    /// disconnect/connect cycle.
    fn spawn_reader(&self, mut rx: mpsc::UnboundedReceiver<String>) {
        let state = Arc::clone(&self.state);
        let position = Arc::clone(&self.position);
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                dispatch_telemetry(&line, &position, &events);
            }

            let mut state = state.write();
            if matches!(
                *state,
                SessionState::Connected | SessionState::Streaming | SessionState::Connecting
            ) {
                *state = SessionState::Faulted;
                drop(state);
                let error = LinkError::Lost {
                    reason: "telemetry stream closed".to_string(),
                };
                tracing::error!("{}", error);
                events.publish(SessionEvent::Error {
                    message: error.to_string(),
                });
            }
        });

        if let Some(previous) = self.reader.lock().replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        // Process shutdown forces disconnection.
        if let Some(task) = self.reader.lock().take() {
            task.abort();
        }
    }
}

fn dispatch_telemetry(raw: &str, position: &RwLock<Position>, events: &EventDispatcher) {
    match Telemetry::parse(raw) {
        Telemetry::PositionReport { x, y } => {
            {
                let mut position = position.write();
                position.x = x;
                position.y = y;
            }
            events.publish(SessionEvent::Position { x, y });
        }
        // Reserved for ack-gated flow control.
        Telemetry::Acknowledge => {}
        Telemetry::DeviceError { message } => {
            tracing::warn!(%message, "device reported an error");
            events.publish(SessionEvent::Error { message });
        }
        Telemetry::Unrecognized { raw } => {
            tracing::debug!(%raw, "unrecognized telemetry");
        }
    }
}
