use clap::Parser;
use treesync::commands::daemon;
use treesync::config::Cli;
use treesync::{logging, Config, TracingLogger};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let (log_path, append) = config.log_target();
    let _log_guard = logging::init(&log_path, append, config.verbose)?;

    tracing::info!(
        source = %config.source.display(),
        replica = %config.replica.display(),
        interval = ?config.interval,
        "treesync v{} starting",
        treesync::VERSION
    );

    if config.once {
        daemon::run_once(&config, &TracingLogger)?;
        return Ok(());
    }

    let stop = daemon::install_stop_flag()?;
    let stats = daemon::run(&config, &TracingLogger, &stop);
    tracing::info!(
        cycles = stats.cycles,
        completed = stats.completed,
        failed = stats.failed,
        "treesync stopped"
    );

    Ok(())
}
