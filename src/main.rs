//! Command-line front end for the Vinylkit cutter pipeline.

use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use vinylkit::{
    compile, extract, flatten, optimize, test_pattern, transform, Config, CutParams, CutProgram,
    DeviceSession, ExtractOptions, SerialTransport, SessionConfig, SessionEvent, TransformParams,
};

fn print_usage() {
    eprintln!("vinylkit {} ({})", vinylkit::VERSION, vinylkit::BUILD_DATE);
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  vinylkit ports                      list candidate cutter ports as JSON");
    eprintln!("  vinylkit compile <file>             compile artwork to G-code on stdout");
    eprintln!("  vinylkit cut <file> [--port <p>]    compile and stream a cutting job");
    eprintln!("  vinylkit test-pattern [--port <p>]  stream the calibration square");
    eprintln!("  vinylkit home [--port <p>]          home the machine");
    eprintln!("  vinylkit stop [--port <p>]          send an emergency stop");
    eprintln!("  vinylkit version                    print version information");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vinylkit::init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let config = load_config();

    match command.as_str() {
        "ports" => cmd_ports(),
        "compile" => cmd_compile(&args[1..], &config),
        "cut" => cmd_cut(&args[1..], &config).await,
        "test-pattern" => cmd_stream(test_pattern(&cut_params(&config)), &args[1..], &config).await,
        "home" => cmd_home(&args[1..], &config),
        "stop" => cmd_stop(&args[1..], &config),
        "version" => {
            println!("vinylkit {} ({})", vinylkit::VERSION, vinylkit::BUILD_DATE);
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }
}

fn load_config() -> Config {
    let Some(path) = Config::default_path() else {
        return Config::default();
    };
    match Config::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("ignoring config at {}: {}", path.display(), e);
            Config::default()
        }
    }
}

fn cut_params(config: &Config) -> CutParams {
    CutParams {
        feed_rate: config.cutting.feed_rate,
        tool_power: config.cutting.tool_power,
        tool_up_height: config.cutting.tool_up_height,
        tool_down_height: config.cutting.tool_down_height,
        curve_segments: config.cutting.curve_segments,
    }
}

fn session_config(config: &Config) -> SessionConfig {
    SessionConfig {
        baud_rate: config.connection.baud_rate,
        pacing: Duration::from_millis(config.connection.pacing_ms),
    }
}

/// Pick the explicit `--port` flag, then the configured port, then the
/// first enumerated one.
fn resolve_port(args: &[String], config: &Config) -> anyhow::Result<String> {
    if let Some(port) = flag_value(args, "--port") {
        return Ok(port);
    }
    if config.connection.port != "Auto" {
        return Ok(config.connection.port.clone());
    }
    let ports = vinylkit::list_ports()?;
    match ports.first() {
        Some(info) => Ok(info.port_name.clone()),
        None => bail!("no cutter ports found; pass --port explicitly"),
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn cmd_ports() -> anyhow::Result<()> {
    let ports = vinylkit::list_ports()?;
    println!("{}", serde_json::to_string_pretty(&ports)?);
    Ok(())
}

/// Extract, transform, flatten, compile, optimize.
fn compile_file(path: &Path, config: &Config) -> anyhow::Result<CutProgram> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let hint = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let options = ExtractOptions {
        circle_segments: config.cutting.circle_segments,
    };
    let extraction = extract(&source, hint, &options)?;
    if let Some(error) = &extraction.error {
        tracing::warn!(
            "partial extraction ({} segments recovered): {}",
            extraction.segments.len(),
            error
        );
    }

    let params = TransformParams {
        mirror: config.cutting.mirror,
        ..TransformParams::default()
    };
    let transformed = transform(&extraction.segments, &params);
    let flat = flatten(&transformed, config.cutting.curve_segments);

    Ok(optimize(&compile(&flat, &cut_params(config))))
}

fn cmd_compile(args: &[String], config: &Config) -> anyhow::Result<()> {
    let Some(file) = args.first() else {
        bail!("compile requires a file argument");
    };
    let program = compile_file(Path::new(file), config)?;
    print!("{}", program.render());
    Ok(())
}

async fn cmd_cut(args: &[String], config: &Config) -> anyhow::Result<()> {
    let Some(file) = args.first() else {
        bail!("cut requires a file argument");
    };
    let program = compile_file(Path::new(file), config)?;
    cmd_stream(program, args, config).await
}

async fn cmd_stream(program: CutProgram, args: &[String], config: &Config) -> anyhow::Result<()> {
    let port = resolve_port(args, config)?;
    let session = DeviceSession::new(Arc::new(SerialTransport), session_config(config));

    let mut events = session.events().subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::Progress {
                    completed,
                    total,
                    fraction,
                } => {
                    eprint!("\r{}/{} ({:.0}%)", completed, total, fraction * 100.0);
                }
                SessionEvent::Complete => eprintln!("\ndone"),
                SessionEvent::Error { message } => eprintln!("\nerror: {}", message),
                _ => {}
            }
        }
    });

    session.connect(&port)?;
    let report = session.stream_program(&program).await?;
    if report.cancelled {
        eprintln!(
            "\ncancelled after {} of {} instructions",
            report.completed, report.total
        );
    }
    session.disconnect()?;
    printer.abort();
    Ok(())
}

fn cmd_home(args: &[String], config: &Config) -> anyhow::Result<()> {
    let port = resolve_port(args, config)?;
    let session = DeviceSession::new(Arc::new(SerialTransport), session_config(config));
    session.connect(&port)?;
    session.home()?;
    session.disconnect()?;
    Ok(())
}

fn cmd_stop(args: &[String], config: &Config) -> anyhow::Result<()> {
    let port = resolve_port(args, config)?;
    let session = DeviceSession::new(Arc::new(SerialTransport), session_config(config));
    session.connect(&port)?;
    session.emergency_stop()?;
    session.disconnect()?;
    Ok(())
}
