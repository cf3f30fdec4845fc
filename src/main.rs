use callcrm::headless::{self, HeadlessOptions};
use callcrm_core::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "callcrm", about = "Call CRM: enter, import, and review call records")]
struct Cli {
    /// Write debug logs to /tmp/callcrm-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/callcrm/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON file to import at startup. Repeatable.
    #[arg(long = "import", value_name = "FILE")]
    imports: Vec<PathBuf>,

    /// Spreadsheet URL to load at startup.
    #[arg(long, value_name = "URL")]
    sheet: Option<String>,

    /// Print the calls and statistics to stdout instead of starting the TUI.
    #[arg(long)]
    headless: bool,

    /// Write every ingested call to FILE as a JSON array (headless only).
    #[arg(long, value_name = "FILE", requires = "headless")]
    export: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/callcrm-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("callcrm debug log started, tail -f /tmp/callcrm-debug.log");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Config::defaults()
        }),
    };

    if cli.headless {
        let opts = HeadlessOptions {
            imports: cli.imports,
            sheet: cli.sheet,
            export: cli.export,
        };
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        headless::run(&config, &opts, &mut stdout.lock(), &mut stderr.lock())?;
        return Ok(());
    }

    callcrm_tui::run(
        config,
        callcrm_tui::Preload {
            imports: cli.imports,
            sheet: cli.sheet,
        },
    )
}
