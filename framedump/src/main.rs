use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ffmpeg_decode::ffmpeg::{FfmpegBackend, LogLevel, set_log_level};
use ffmpeg_decode::{LoopEnd, ProbeError, open_input, run};

mod report;

use report::ConsoleReporter;

const DEFAULT_LOG_FILTER: &str = "framedump=info,ffmpeg_decode=info";

#[derive(Parser, Debug)]
#[command(name = "framedump", version)]
#[command(about = "Decode a media file and print the properties of every decoded frame")]
struct Args {
    /// Media file to decode
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(input) = args.input else {
        println!("{}", Args::command().render_usage());
        return ExitCode::SUCCESS;
    };

    // Logs go to stderr, the frame report owns stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    ExitCode::from(dump(&input))
}

fn dump(input: &Path) -> u8 {
    let backend = match FfmpegBackend::new() {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("failed to initialize FFmpeg: {e}");
            return 1;
        }
    };

    if tracing::enabled!(tracing::Level::DEBUG) {
        set_log_level(LogLevel::Debug);
    } else {
        set_log_level(LogLevel::Warning);
    }

    let mut session = match open_input(&backend, input) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(stage = e.stage(), "{}", error_chain(&e));
            return exit_code(&e);
        }
    };

    let mut reporter = ConsoleReporter::new(BufWriter::new(std::io::stdout().lock()));
    let summary = run(&mut session, &mut reporter);
    session.release();

    if let Err(e) = reporter.finish() {
        tracing::warn!("writing frame report failed: {e}");
    }
    if let LoopEnd::ReadError(e) = &summary.end {
        tracing::warn!("input ended early: {e}");
    }

    0
}

/**
    Process exit code for a failed open.
*/
fn exit_code(error: &ProbeError) -> u8 {
    match error {
        ProbeError::CannotOpenContainer { .. } => 2,
        ProbeError::StreamInfoUnavailable { .. } => 3,
        ProbeError::DecoderBindFailed { .. } => 4,
        ProbeError::NoUsableStreams { .. } => 5,
    }
}

/**
    The error and all of its sources on one line.
*/
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut source = error.source();
    while let Some(e) = source {
        line.push_str(": ");
        line.push_str(&e.to_string());
        source = e.source();
    }
    line
}
