use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{error, info};

use worklog_bridge::config::{self, LoggerConfig};
use worklog_bridge::{LogReporter, Orchestrator};

/// Transfers your external Jira bookings to the internal one.
#[derive(Parser, Debug)]
#[command(name = "worklog-bridge", version, about, long_about = None)]
struct Cli {
    /// Config file path (defaults to config.yml next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Day to synchronize, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Resolve and report without writing to the internal tracker
    #[arg(long)]
    dry_run: bool,
}

fn init_logging(logger: &LoggerConfig) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(logger.level.as_str()),
    );
    if logger.pretty_print_console {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format_timestamp_millis();
    }
    let _ = builder.try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let path = config::resolve_path(cli.config.as_deref());
    let mut app_config = match config::load(&path) {
        Ok(loaded) => loaded,
        Err(err) => {
            init_logging(&LoggerConfig::default());
            error!("failed to load config: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&app_config.logger);
    if cli.dry_run {
        app_config.dry_run = true;
    }

    let orchestrator = match Orchestrator::from_config(&app_config) {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            error!("failed to set up synchronization: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    if app_config.dry_run {
        info!("dry run for {}: nothing will be written", date);
    }

    let mut reporter = LogReporter;
    match orchestrator.synchronize_day(date, &mut reporter).await {
        Ok(summary) => {
            info!("{}: {}", date, summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to book internal issues: {}", err);
            ExitCode::FAILURE
        }
    }
}
