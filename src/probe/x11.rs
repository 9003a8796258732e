//! Live X11 source backed by x11rb.
//!
//! One connection, pinned to its default screen's root window. The
//! connection is opened by the caller's initialization path and never
//! explicitly closed; it lives until process exit.

use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::screensaver::{self, ConnectionExt as _};
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use super::{ExtensionCodes, ProbeError, RawSaverInfo, SaverSource};

/// An open connection to an X display.
///
/// x11rb requires no external locking, but the probe takes `&mut` on the
/// source anyway: one query per connection at a time. Callers that want to
/// share a connection across threads own the lock themselves.
pub struct DisplayConnection {
    conn: RustConnection,
    screen_num: usize,
    root: Window,
}

impl DisplayConnection {
    /// Connect to the display named by `display`, or `$DISPLAY` when `None`.
    pub fn open(display: Option<&str>) -> Result<Self, ProbeError> {
        let (conn, screen_num) =
            x11rb::connect(display).map_err(|e| ProbeError::Transport(e.to_string()))?;
        let root = conn.setup().roots[screen_num].root;

        info!(
            "Connected to X display (screen {}, root window {:#x})",
            screen_num, root
        );

        Ok(Self {
            conn,
            screen_num,
            root,
        })
    }

    /// Default screen number of this connection.
    pub fn screen_num(&self) -> usize {
        self.screen_num
    }

    /// Root window the info query targets.
    pub fn root(&self) -> Window {
        self.root
    }
}

impl SaverSource for DisplayConnection {
    fn extension_codes(&mut self) -> Result<Option<ExtensionCodes>, ProbeError> {
        let ext = self
            .conn
            .extension_information(screensaver::X11_EXTENSION_NAME)
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        match ext {
            Some(info) => {
                debug!(
                    "MIT-SCREEN-SAVER present (event base {}, error base {})",
                    info.first_event, info.first_error
                );
                Ok(Some(ExtensionCodes {
                    event_base: info.first_event,
                    error_base: info.first_error,
                }))
            }
            None => {
                debug!("MIT-SCREEN-SAVER not supported by this server");
                Ok(None)
            }
        }
    }

    fn saver_info(&mut self) -> Result<RawSaverInfo, ProbeError> {
        let reply = self
            .conn
            .screensaver_query_info(self.root)
            .map_err(|e| ProbeError::Transport(e.to_string()))?
            .reply()
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        Ok(RawSaverInfo {
            state: u8::from(reply.state),
            kind: u8::from(reply.kind),
            til_or_since_ms: reply.ms_until_server,
            idle_ms: reply.ms_since_user_input,
            event_mask: reply.event_mask,
        })
    }
}
