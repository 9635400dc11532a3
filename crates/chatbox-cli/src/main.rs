//! chatbox CLI: a terminal chat with a scripted friend

use chatbox_engine::{Config, Message, MessageKind};
use chatbox_tui::{HeadlessConfig, HeadlessReport};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Mock one-to-one chat with a scripted friend
#[derive(Parser)]
#[command(name = "chatbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: .chatbox/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reply selection, for repeatable conversations
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat (default when no command specified)
    Tui,

    /// Run a conversation without a terminal and print the transcript
    Script {
        /// Messages or slash commands, sent in order
        #[arg(required = true)]
        steps: Vec<String>,

        /// Pause between steps in milliseconds
        #[arg(long, default_value = "500")]
        gap_ms: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default config to .chatbox/config.json
    Init,

    /// Print the effective config as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging(cli.log_file.as_deref(), cli.debug);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(chatbox_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Script {
            steps,
            gap_ms,
            json,
        }) => {
            match cli.log_file.as_deref() {
                Some(path) => init_file_logging(Some(path), cli.debug),
                None => init_stderr_logging(cli.debug),
            }
            cmd_script(&config, &steps, gap_ms, json);
        }
        Some(Commands::Init) => {
            cmd_init();
        }
        Some(Commands::Config) => {
            cmd_config(&config);
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| Config::default_path(Path::new(".")))
}

fn load_config(cli: &Cli) -> Result<Config, chatbox_engine::ConfigError> {
    let path = config_path(cli);
    // an explicit --config must exist
    let mut config = if cli.config.is_some() {
        Config::load(&path)?
    } else {
        Config::load_or_default(&path)?
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn env_filter(debug: bool) -> EnvFilter {
    let default_filter = if debug {
        "debug"
    } else {
        "info,chatbox_engine=info,chatbox_tui=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Log to a file; the terminal belongs to the UI.
fn init_file_logging(path: Option<&Path>, debug: bool) {
    let path = path.map_or_else(|| std::env::temp_dir().join("chatbox.log"), Path::to_path_buf);
    let log_file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", path.display());
            return;
        }
    };
    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();
}

fn init_stderr_logging(debug: bool) {
    // stdout carries the transcript; keep stderr quiet unless asked
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_script(config: &Config, steps: &[String], gap_ms: u64, json: bool) {
    let options = HeadlessConfig {
        gap: Duration::from_millis(gap_ms),
        ..HeadlessConfig::default()
    };
    tracing::debug!(steps = steps.len(), gap_ms, "running script");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let report = match rt.block_on(chatbox_tui::run_script(config, steps, &options)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("failed to serialize")
        );
        return;
    }

    print_transcript(config, &report);
}

fn print_transcript(config: &Config, report: &HeadlessReport) {
    for message in &report.messages {
        println!("{}", transcript_line(config, message));
    }
    for notice in &report.notices {
        eprintln!("notice: {notice}");
    }
    if report.quit_early {
        eprintln!("(quit before the script ended)");
    }
}

fn transcript_line(config: &Config, message: &Message) -> String {
    let name = if message.is_from(&config.local_user.id) {
        &config.local_user.name
    } else {
        &config.friend.name
    };

    match message.kind {
        MessageKind::Notification => format!("  -- {} ({name}) --", message.text),
        MessageKind::Image => {
            let file = message
                .image
                .as_ref()
                .map_or("image", |image| image.file_name.as_str());
            format!("{name}: {} [{file}]", message.text)
        }
        MessageKind::Text => {
            let status = message
                .status
                .filter(|_| message.is_from(&config.local_user.id))
                .map(|s| format!("  ({s})"))
                .unwrap_or_default();
            format!("{name}: {}{status}", message.text)
        }
    }
}

fn cmd_init() {
    let config_path = Config::default_path(Path::new("."));
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return;
    }

    if let Err(e) = Config::default().save(&config_path) {
        eprintln!("Failed to write {}: {e}", config_path.display());
        std::process::exit(1);
    }
    println!("Wrote default config to {}", config_path.display());
}

fn cmd_config(config: &Config) {
    println!(
        "{}",
        serde_json::to_string_pretty(config).expect("failed to serialize")
    );
}
