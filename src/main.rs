use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;

use monarx::alert::{CooldownTracker, ThresholdSet};
use monarx::app::App;
use monarx::config::{Config, ThresholdStore, load_config, load_config_from_path};
use monarx::event::EventHandler;
use monarx::logging;
use monarx::monitor::{LogDispatcher, Monitor};

#[derive(Parser)]
#[command(
    name = "monarx",
    about = "Host resource-health monitor with threshold alerts"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// CPU alert limit in percent (clamped to 1..=100)
    #[arg(long, allow_negative_numbers = true)]
    cpu_limit: Option<i64>,

    /// Memory alert limit in percent (clamped to 1..=100)
    #[arg(long, allow_negative_numbers = true)]
    mem_limit: Option<i64>,

    /// Swap alert limit in percent (clamped to 1..=100)
    #[arg(long, allow_negative_numbers = true)]
    swap_limit: Option<i64>,

    /// Persist the resulting limits to thresholds.json
    #[arg(long, default_value_t = false)]
    save_thresholds: bool,

    /// Take one measurement without the terminal UI and print it as JSON.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the log file as JSON lines.
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    logging::init(&logging::log_path(), &level, cli.log_json)?;
    tracing::info!(
        refresh_rate_ms = config.general.refresh_rate_ms,
        "monarx starting"
    );

    let store = ThresholdStore::default();
    let thresholds = apply_limit_overrides(&cli, store.load(config.thresholds.warn_factor));
    if cli.save_thresholds {
        store.save(&thresholds);
    }

    let monitor = Monitor::native(
        thresholds,
        CooldownTracker::new(Duration::from_secs(config.general.cooldown_secs)),
        config.general.process_limit,
    );

    if cli.once {
        return run_once(monitor).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config, monitor, store).await;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    monitor: Monitor,
    store: ThresholdStore,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let mut app = App::new(config, monitor, store);
    let mut events = EventHandler::new(tick_rate);

    app.run(&mut events, terminal).await?;

    tracing::info!("monarx exiting");
    Ok(())
}

/// The first CPU reading of a fresh sysinfo handle is meaningless; prime it
/// and wait out the minimum update interval before the reported tick.
async fn run_once(mut monitor: Monitor) -> Result<()> {
    let mut dispatcher = LogDispatcher;
    monitor.prime();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let report = monitor.tick_and_notify(&mut dispatcher);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("refresh rate must be greater than 0"));
    }
    if cli.save_thresholds
        && cli.cpu_limit.is_none()
        && cli.mem_limit.is_none()
        && cli.swap_limit.is_none()
    {
        return Err(eyre!(
            "--save-thresholds needs at least one of --cpu-limit, --mem-limit, --swap-limit"
        ));
    }

    Ok(config)
}

fn apply_limit_overrides(cli: &Cli, base: ThresholdSet) -> ThresholdSet {
    ThresholdSet::new(
        cli.cpu_limit.unwrap_or(i64::from(base.cpu_limit)),
        cli.mem_limit.unwrap_or(i64::from(base.mem_limit)),
        cli.swap_limit.unwrap_or(i64::from(base.swap_limit)),
        base.warn_factor,
    )
}
