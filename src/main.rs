//! xss-probe - Query X11 screensaver state and idle time.
//!
//! One-shot by default: prints the current MIT-SCREEN-SAVER snapshot. With
//! `--watch`, polls and reports idle/unidle transitions until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xss_probe::config::Config;
use xss_probe::probe::{DisplayConnection, ProbeError, SaverSource, query_state};
use xss_probe::tracker::{IdleTracker, IdleTransition, PollReport, SaverTracker};

/// The watch loop never polls more often than this, whatever the tracker
/// suggests.
const MIN_POLL: Duration = Duration::from_secs(2);

/// Query X11 screensaver state and idle time.
///
/// Asks the MIT-SCREEN-SAVER extension for the current idle time and
/// screensaver state. Exits non-zero if the display's server does not
/// support the extension.
#[derive(Parser, Debug)]
#[command(name = "xss-probe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// X display to connect to (defaults to $DISPLAY).
    #[arg(short, long)]
    display: Option<String>,

    /// Print JSON instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Poll continuously, reporting idle/unidle transitions.
    #[arg(short, long)]
    watch: bool,

    /// In watch mode, follow the screensaver's own activation state
    /// instead of an idle-time threshold.
    #[arg(long)]
    saver: bool,

    /// Override the configured idle threshold (milliseconds).
    #[arg(long)]
    threshold_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    let mut config =
        Config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(threshold_ms) = args.threshold_ms {
        config.idle_threshold_ms = threshold_ms;
    }

    let display = args.display.as_deref().or(config.display.as_deref());
    let mut conn =
        DisplayConnection::open(display).context("Failed to connect to the X display")?;

    if args.watch {
        run_watch(&config, &mut conn, args.saver, args.json).await
    } else {
        run_once(&mut conn, args.json)
    }
}

/// Initialize logging with the specified level.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(format!("xss_probe={}", level))
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    Ok(())
}

/// Query once and print the snapshot.
fn run_once(conn: &mut DisplayConnection, json: bool) -> Result<()> {
    let Some(snapshot) = query_state(conn)? else {
        anyhow::bail!("MIT-SCREEN-SAVER extension not supported by this display");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("state: {}", snapshot.state.as_str());
        println!("kind: {}", snapshot.kind.as_str());
        println!("til_or_since: {} ms", snapshot.til_or_since_ms);
        println!("idle: {} ms", snapshot.idle_ms);
        println!("event_mask: {:#x}", snapshot.event_mask);
    }

    Ok(())
}

/// Either tracker flavor, selected by `--saver`.
enum Tracker {
    Idle(IdleTracker),
    Saver(SaverTracker),
}

impl Tracker {
    fn poll<S: SaverSource>(&mut self, source: &mut S) -> Result<PollReport, ProbeError> {
        match self {
            Self::Idle(tracker) => tracker.poll(source),
            Self::Saver(tracker) => tracker.poll(source),
        }
    }
}

/// Poll until interrupted, printing one line per poll.
async fn run_watch(
    config: &Config,
    conn: &mut DisplayConnection,
    use_saver: bool,
    json: bool,
) -> Result<()> {
    let mut tracker = if use_saver {
        info!("Watching screensaver activation state");
        Tracker::Saver(SaverTracker::new(
            config.poll_when_idle(),
            config.poll_when_disabled(),
        ))
    } else {
        info!(
            "Watching idle time (threshold {} ms)",
            config.idle_threshold_ms
        );
        Tracker::Idle(IdleTracker::new(
            config.idle_threshold(),
            config.poll_when_idle(),
            config.poll_when_disabled(),
        ))
    };

    loop {
        let report = tracker.poll(conn).context("Poll failed")?;

        print_report(&report, json);

        let wait = report.next_poll.max(MIN_POLL);
        debug!("Sleeping {:?} until next poll", wait);

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, exiting");
                return Ok(());
            }
            () = tokio::time::sleep(wait) => {}
        }
    }
}

/// Print one poll report line.
fn print_report(report: &PollReport, json: bool) {
    let change = report.change.map(IdleTransition::as_str);

    if json {
        let line = serde_json::json!({
            "change": change,
            "next_poll_ms": u64::try_from(report.next_poll.as_millis()).unwrap_or(u64::MAX),
            "idle_ms": u64::try_from(report.idle.as_millis()).unwrap_or(u64::MAX),
        });
        println!("{}", line);
    } else {
        println!(
            "change: {:9} next poll: {:?}  idle: {:?}",
            change.unwrap_or("none"),
            report.next_poll,
            report.idle,
        );
    }
}
