use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use docopener_channel::{MethodCall, MethodChannel, MethodReply};
use docopener_core::{get_platform, DocOpenerError};
use docopener_open::{
    DocumentOpener, OpenDocumentRequest, OpenDocumentResult, OpenerConfig, ResultType,
    SystemOpener,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Open PDF and CSV documents with the platform's native viewer.
#[derive(Parser, Debug)]
#[command(name = "docopener", version, about, long_about = None)]
struct Cli {
    /// The format for log output.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// The minimum log level to display.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: tracing::Level,

    /// Program to use instead of the OS open facility [env: DOCOPENER_LAUNCHER].
    ///
    /// Receives the absolute file path as its only argument. Exit 0 means
    /// opened, 2 file not found, 3 no viewer, anything else could not open.
    #[arg(long, value_name = "PATH", global = true)]
    launcher: Option<PathBuf>,

    /// How long to watch the launcher before treating it as running, in ms
    /// [env: DOCOPENER_LAUNCH_GRACE_MS, default: 1500].
    #[arg(long, value_name = "MS", global = true)]
    launch_grace_ms: Option<u64>,

    /// Report noAppToOpen instead of falling back to Quick Look
    /// [env: DOCOPENER_NO_PREVIEW].
    #[arg(long, global = true)]
    no_preview: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a document with the default viewer.
    ///
    /// Prints the JSON result. Exits 0 when opened, 3 when no viewer is
    /// registered, 1 on any other failure.
    Open(OpenArgs),

    /// Validate and resolve a document without opening it.
    ///
    /// Prints the resolved path, kind, MIME type and URI as JSON.
    Inspect(OpenArgs),

    /// Dispatch a raw method call through the document channel.
    Call(CallArgs),
}

#[derive(Parser, Debug)]
struct OpenArgs {
    /// Absolute or relative path of the PDF or CSV document.
    #[arg(value_name = "FILE_PATH")]
    file_path: String,
}

#[derive(Parser, Debug)]
struct CallArgs {
    /// Method name (e.g. openDocument).
    #[arg(value_name = "METHOD")]
    method: String,

    /// Named arguments as a JSON object.
    #[arg(long = "args", value_name = "JSON")]
    arguments: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable text format.
    Text,
    /// Machine-readable JSON format.
    Json,
}

/// - 1: Document could not be opened (error result)
/// - 2: Method not implemented by the channel
/// - 3: No viewer registered for the document type
mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const OPEN_FAILED: i32 = 1;
    pub const NOT_IMPLEMENTED: i32 = 2;
    pub const NO_VIEWER: i32 = 3;
}

fn main() {
    let cli = Cli::parse();

    // Initialize the tracing subscriber
    let filter = EnvFilter::from_default_env().add_directive(cli.log_level.into());

    match cli.log_format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }

    info!("Initialization complete. Starting main logic.");
    let config = opener_config(&cli, OpenerConfig::from_env());
    if let Some(command) = cli.command {
        match run_command(command, config) {
            Ok(exit_code) => {
                info!("Main logic finished.");
                std::process::exit(exit_code);
            }
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(exit_codes::OPEN_FAILED);
            }
        }
    } else {
        println!("Platform: {}", get_platform());
    }
    info!("Main logic finished.");
}

/// Apply command-line flags over the `DOCOPENER_*` environment settings.
///
/// The CLI never has a host window, so one is never required.
fn opener_config(cli: &Cli, base: OpenerConfig) -> OpenerConfig {
    let mut config = OpenerConfig {
        require_host_window: false,
        ..base
    };
    if cli.no_preview {
        config.preview_fallback = false;
    }
    if let Some(ms) = cli.launch_grace_ms {
        config.launch_grace = Duration::from_millis(ms);
    }
    if let Some(launcher) = &cli.launcher {
        config.launcher = Some(launcher.clone());
    }
    config
}

fn run_command(command: Command, config: OpenerConfig) -> Result<i32, DocOpenerError> {
    let opener = SystemOpener::system(config);
    match command {
        Command::Open(args) => Ok(run_open(&opener, args)),
        Command::Inspect(args) => Ok(run_inspect(&opener, args)),
        Command::Call(args) => run_call(MethodChannel::new(opener), args),
    }
}

fn run_open(opener: &SystemOpener, args: OpenArgs) -> i32 {
    info!(file_path = %args.file_path, "Opening document");
    let result = opener.open(OpenDocumentRequest::new(args.file_path));
    println!("{}", result.to_json());
    exit_code_for(&result)
}

fn run_inspect(opener: &SystemOpener, args: OpenArgs) -> i32 {
    match opener.prepare(&OpenDocumentRequest::new(args.file_path)) {
        Ok(prepared) => match serde_json::to_string_pretty(&prepared) {
            Ok(json) => {
                println!("{json}");
                exit_codes::SUCCESS
            }
            Err(err) => {
                println!("{}", OpenDocumentResult::error(err.to_string()).to_json());
                exit_codes::OPEN_FAILED
            }
        },
        Err(err) => {
            let result = OpenDocumentResult::from(err);
            println!("{}", result.to_json());
            exit_code_for(&result)
        }
    }
}

fn run_call(channel: MethodChannel<SystemOpener>, args: CallArgs) -> Result<i32, DocOpenerError> {
    let arguments = match args.arguments.as_deref() {
        Some(raw) => serde_json::from_str::<Value>(raw).map_err(|err| {
            tracing::debug!(error = %err, "undecodable --args");
            DocOpenerError::InvalidArguments
        })?,
        None => Value::Null,
    };

    info!(channel = channel.name(), method = %args.method, "Dispatching method call");
    match channel.invoke(MethodCall::new(args.method.clone(), arguments)) {
        MethodReply::Success(payload) => {
            println!("{payload}");
            Ok(exit_codes::SUCCESS)
        }
        MethodReply::NotImplemented => {
            eprintln!("not implemented: {}", args.method);
            Ok(exit_codes::NOT_IMPLEMENTED)
        }
    }
}

fn exit_code_for(result: &OpenDocumentResult) -> i32 {
    match result.result_type {
        ResultType::Done => exit_codes::SUCCESS,
        ResultType::Error => exit_codes::OPEN_FAILED,
        ResultType::NoAppToOpen => exit_codes::NO_VIEWER,
    }
}
