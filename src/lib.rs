//! Query the X11 MIT-SCREEN-SAVER extension.
//!
//! This crate answers one question against an open X display: is the
//! screensaver extension available, and if so what is its current state —
//! idle time, on/off/disabled, and the blanking mechanism in use. It cannot
//! activate or deactivate the screensaver (use `xset s` for that), and it is
//! an interface to the server extension, not to any screensaver program.
//!
//! [`probe::query_state`] performs one synchronous round trip and returns a
//! [`snapshot::Snapshot`], or `None` when the extension is missing. The
//! [`tracker`] module layers simple polling helpers on top that report
//! idle/unidle transitions and suggest when the next poll is worthwhile.
//!
//! ```no_run
//! use xss_probe::{DisplayConnection, query_state};
//!
//! let mut conn = DisplayConnection::open(None)?;
//! match query_state(&mut conn)? {
//!     Some(snapshot) => println!("idle for {} ms", snapshot.idle_ms),
//!     None => println!("extension not supported"),
//! }
//! # Ok::<(), xss_probe::ProbeError>(())
//! ```

pub mod config;
pub mod probe;
pub mod snapshot;
pub mod tracker;

pub use probe::{DisplayConnection, ProbeError, SaverSource, query_state};
pub use snapshot::{SaverKind, SaverState, Snapshot};
pub use tracker::{IdleTracker, IdleTransition, PollReport, SaverTracker};
