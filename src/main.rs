//! Idle Reaper - closes applications left minimized for too long

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use idle_reaper::monitor::{render_tick, CLEAR_SCREEN};
use idle_reaper::{
    create_inspector, ConfigProvider, ConsoleForm, ExclusionSet, IdleAccounting, IdleReaper,
    PrivilegeManager, ReaperConfig, SystemTerminator,
};

#[derive(Parser)]
#[command(name = "idle-reaper")]
#[command(about = "Terminates processes whose windows stay minimized too long", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/idle-reaper/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report kill decisions without terminating anything
    #[arg(long)]
    dry_run: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = ReaperConfig::load_or_default(cli.config.as_deref())?;
    if cli.dry_run {
        config.dry_run = true;
    }
    config.validate()?;

    if cli.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let privileges = PrivilegeManager::new();
    if !config.dry_run && !privileges.can_terminate_foreign_processes() {
        warn!("Minimized windows owned by other users or elevated processes cannot be closed");
    }

    let baseline = ExclusionSet::from_names(&config.baseline_exclusions);
    let startup = ConsoleForm::stdio(baseline, config.idle_threshold_secs).collect()?;
    info!(
        "Idle limit {}s, {} excluded process names, checking every {}s on {}",
        startup.idle_threshold_secs,
        startup.exclusions.len(),
        config.check_interval_secs,
        idle_reaper::platform::platform_name()
    );

    let accounting = IdleAccounting::new(
        startup.exclusions,
        startup.idle_threshold_secs,
        config.check_interval_secs,
    );
    let mut reaper = IdleReaper::new(
        accounting,
        create_inspector(),
        SystemTerminator::new(),
        config.dry_run,
    );

    let threshold = startup.idle_threshold_secs;
    let clear_screen = config.clear_screen;
    reaper
        .run_until(shutdown_signal(), |report| {
            if clear_screen {
                print!("{}", CLEAR_SCREEN);
            }
            println!("{}", render_tick(report, threshold));
        })
        .await;

    let stats = reaper.stats();
    info!(
        "Stopped after {} ticks: {} terminated, {} failed, {} skipped ticks",
        stats.ticks, stats.terminations, stats.failed_terminations, stats.skipped_ticks
    );

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let terminate = async {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Cannot listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate => {}
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
