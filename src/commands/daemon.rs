//! Polling loop that drives the sync engine

use super::sync::synchronize;
use crate::logging::SyncLogger;
use crate::types::{SyncError, SyncReport};
use crate::Config;
use signal_hook::consts::TERM_SIGNALS;
use signal_hook::flag;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep between stop-flag checks
const STOP_POLL: Duration = Duration::from_millis(100);

/// Totals over the lifetime of a daemon run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonStats {
    /// Cycles attempted
    pub cycles: u64,
    /// Cycles that ended with "Synchronization completed."
    pub completed: u64,
    /// Cycles aborted by an error
    pub failed: u64,
    /// Report of the most recent successful cycle
    pub last_report: Option<SyncReport>,
}

/// Stop flag raised by the termination signals (SIGINT, SIGTERM and, on
/// unix, SIGQUIT)
///
/// The first signal lets the running cycle finish, after which [`run`]
/// returns and buffered log records get flushed. A second signal while the
/// flag is already set exits the process immediately with status 1.
pub fn install_stop_flag() -> Result<Arc<AtomicBool>, SyncError> {
    let stop = Arc::new(AtomicBool::new(false));

    for &signal in TERM_SIGNALS {
        // Order matters: the conditional exit must see the flag before the
        // second registration sets it.
        flag::register_conditional_shutdown(signal, 1, Arc::clone(&stop))?;
        flag::register(signal, Arc::clone(&stop))?;
    }

    Ok(stop)
}

/// Run a single cycle and hand back its outcome
pub fn run_once(config: &Config, logger: &dyn SyncLogger) -> Result<SyncReport, SyncError> {
    synchronize(&config.source, &config.replica, logger)
}

/// Run cycles back-to-back, sleeping `config.interval` between them
///
/// Cycles never overlap: the next one starts only after the previous one
/// returned and the interval elapsed. A failed cycle is logged and the loop
/// carries on; the next cycle repairs whatever state the replica was left
/// in. The loop ends when `stop` is set or `config.max_cycles` is reached,
/// and otherwise runs until the process is terminated.
pub fn run(config: &Config, logger: &dyn SyncLogger, stop: &AtomicBool) -> DaemonStats {
    let mut stats = DaemonStats::default();

    while !stop.load(Ordering::Relaxed) {
        stats.cycles += 1;

        match run_once(config, logger) {
            Ok(report) => {
                stats.completed += 1;
                stats.last_report = Some(report);
            }
            Err(err) => {
                stats.failed += 1;
                logger.error(&format!("Synchronization failed: {err}"));
            }
        }

        if config.max_cycles.is_some_and(|max| stats.cycles >= max) {
            break;
        }

        sleep_unless_stopped(config.interval, stop);
    }

    stats
}

fn sleep_unless_stopped(interval: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + interval;

    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
    }
}
