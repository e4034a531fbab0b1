//! # Vinylkit
//!
//! A Rust-based vector-to-G-code sender for motorized vinyl and film
//! cutters:
//! - SVG geometry extraction into a canonical path model
//! - Scale/offset/mirror transforms and Bézier flattening
//! - Compilation into a G-code cut program with redundant-move elimination
//! - A serial device session with progress events, homing, and emergency
//!   stop
//!
//! ## Architecture
//!
//! Vinylkit is organized as a workspace with multiple crates:
//!
//! 1. **vinylkit-core** - Shared data types, errors, session events
//! 2. **vinylkit-vector** - Path model, extractor, geometry transforms
//! 3. **vinylkit-gcode** - Instruction model, compiler, optimizer
//! 4. **vinylkit-communication** - Serial transport and device session
//! 5. **vinylkit-settings** - Configuration persistence
//! 6. **vinylkit** - Main binary that integrates all crates

pub use vinylkit_core::{
    Error, EventDispatcher, Position, Result, SessionError, SessionEvent, SessionState,
    SessionStatus, SubscriptionId, Units,
};

pub use vinylkit_vector::{
    bounds, extract, flatten, transform, Bounds, ExtractOptions, Extraction, FileFormat,
    PathSegment, TransformParams,
};

pub use vinylkit_gcode::{
    compile, optimize, test_pattern, CutParams, CutProgram, Instruction, EMERGENCY_STOP_CODE,
    HOME_CODE,
};

pub use vinylkit_communication::{
    list_ports, DeviceSession, SerialPortInfo, SerialTransport, SessionConfig, StreamReport,
    Telemetry, Transport,
};

pub use vinylkit_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr (stdout is reserved for command output)
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
