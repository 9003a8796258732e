//! Screensaver state probing.
//!
//! This module provides the single capability of the crate: one synchronous
//! round trip asking an X server whether the MIT-SCREEN-SAVER extension is
//! present and, if so, what the current screensaver state is.

mod x11;

pub use x11::DisplayConnection;
use thiserror::Error;

use crate::snapshot::{SaverKind, SaverState, Snapshot};

/// Event and error base codes the server assigned to the extension.
///
/// Only needed by callers that later want to decode extension-specific
/// events; the probe itself uses them for nothing beyond the availability
/// check that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionCodes {
    /// First event number owned by the extension.
    pub event_base: u8,

    /// First error number owned by the extension.
    pub error_base: u8,
}

/// Untyped reply fields from one screensaver info request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSaverInfo {
    /// Protocol state code (0=off, 1=on, 2=cycle, 3=disabled).
    pub state: u8,

    /// Protocol kind code (0=blanked, 1=internal, 2=external).
    pub kind: u8,

    /// Milliseconds until activation or since the last state change.
    pub til_or_since_ms: u32,

    /// Milliseconds since the last user input.
    pub idle_ms: u32,

    /// Screensaver event mask selected by this client.
    pub event_mask: u32,
}

/// Errors that can occur while probing.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The round trip to the X server failed. There is no recovery path
    /// here; reconnection policy belongs to the calling application.
    #[error("X server round trip failed: {0}")]
    Transport(String),

    /// The server reported a screensaver kind outside the protocol range.
    #[error("server reported out-of-range screensaver kind: {0}")]
    UnexpectedKind(u8),
}

/// A source of raw screensaver extension replies.
///
/// Implemented by [`DisplayConnection`] against a live X server. Tests
/// substitute scripted fakes, which is the point of the seam: the probe
/// logic itself never touches a socket.
pub trait SaverSource {
    /// Whether the extension is present on this connection, and its base
    /// codes if so.
    fn extension_codes(&mut self) -> Result<Option<ExtensionCodes>, ProbeError>;

    /// One info round trip against the root window of the default screen.
    fn saver_info(&mut self) -> Result<RawSaverInfo, ProbeError>;
}

/// Query the current screensaver state once.
///
/// Returns `Ok(None)` when the server does not support the extension. That
/// is a normal outcome on servers without MIT-SCREEN-SAVER, not an error,
/// and no info request is issued in that case.
///
/// Every call is a fresh round trip; nothing is cached, retried, or locked.
/// The returned snapshot is owned by the caller and goes stale as soon as
/// the server's idle counter advances.
pub fn query_state<S: SaverSource>(source: &mut S) -> Result<Option<Snapshot>, ProbeError> {
    if source.extension_codes()?.is_none() {
        return Ok(None);
    }

    let raw = source.saver_info()?;
    decode(&raw).map(Some)
}

/// Lift a raw reply into the typed snapshot.
fn decode(raw: &RawSaverInfo) -> Result<Snapshot, ProbeError> {
    let kind = SaverKind::from_raw(raw.kind).ok_or(ProbeError::UnexpectedKind(raw.kind))?;

    Ok(Snapshot {
        state: SaverState::from_raw(raw.state),
        kind,
        til_or_since_ms: raw.til_or_since_ms,
        idle_ms: raw.idle_ms,
        event_mask: raw.event_mask,
    })
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted source used by probe and tracker tests.

    use super::{ExtensionCodes, ProbeError, RawSaverInfo, SaverSource};

    /// What one poll against the fake should observe.
    #[derive(Debug, Clone)]
    pub enum FakeReply {
        /// Extension present, info request answered with these fields.
        Info(RawSaverInfo),
        /// Extension not present.
        NoExtension,
        /// Transport severed during the availability check.
        FailExtensionCheck,
        /// Extension present, transport severed during the info request.
        FailInfo,
    }

    /// Scripted [`SaverSource`]: replays `replies` in order, repeating the
    /// last entry once the script runs out.
    pub struct FakeSource {
        replies: Vec<FakeReply>,
        cursor: usize,
        pub info_requests: usize,
    }

    impl FakeSource {
        pub fn new(replies: Vec<FakeReply>) -> Self {
            Self {
                replies,
                cursor: 0,
                info_requests: 0,
            }
        }

        pub fn single(reply: FakeReply) -> Self {
            Self::new(vec![reply])
        }

        fn current(&self) -> &FakeReply {
            let last = self.replies.len() - 1;
            &self.replies[self.cursor.min(last)]
        }

        fn advance(&mut self) {
            self.cursor += 1;
        }
    }

    impl SaverSource for FakeSource {
        fn extension_codes(&mut self) -> Result<Option<ExtensionCodes>, ProbeError> {
            match self.current() {
                FakeReply::NoExtension => {
                    self.advance();
                    Ok(None)
                }
                FakeReply::FailExtensionCheck => {
                    self.advance();
                    Err(ProbeError::Transport("connection severed".to_string()))
                }
                FakeReply::Info(_) | FakeReply::FailInfo => Ok(Some(ExtensionCodes {
                    event_base: 83,
                    error_base: 147,
                })),
            }
        }

        fn saver_info(&mut self) -> Result<RawSaverInfo, ProbeError> {
            self.info_requests += 1;
            match *self.current() {
                FakeReply::Info(raw) => {
                    self.advance();
                    Ok(raw)
                }
                FakeReply::FailInfo => {
                    self.advance();
                    Err(ProbeError::Transport("connection severed".to_string()))
                }
                FakeReply::NoExtension | FakeReply::FailExtensionCheck => {
                    panic!("info request issued against a source without the extension")
                }
            }
        }
    }

    /// Reply fields for an active internal saver; handy default for tests.
    pub fn active_info() -> RawSaverInfo {
        RawSaverInfo {
            state: 1,
            kind: 1,
            til_or_since_ms: 12345,
            idle_ms: 6789,
            event_mask: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeReply, FakeSource, active_info};
    use super::*;

    #[test]
    fn test_unsupported_extension_returns_none() {
        let mut source = FakeSource::single(FakeReply::NoExtension);
        let result = query_state(&mut source).unwrap();

        assert!(result.is_none());
        // The info query must never be attempted.
        assert_eq!(source.info_requests, 0);
    }

    #[test]
    fn test_fields_copied_verbatim() {
        let mut source = FakeSource::single(FakeReply::Info(active_info()));
        let snapshot = query_state(&mut source).unwrap().unwrap();

        assert_eq!(snapshot.state, SaverState::On);
        assert_eq!(snapshot.kind, SaverKind::Internal);
        assert_eq!(snapshot.til_or_since_ms, 12345);
        assert_eq!(snapshot.idle_ms, 6789);
        assert_eq!(snapshot.event_mask, 0);
    }

    #[test]
    fn test_repeated_queries_are_deterministic() {
        // A server whose idle counter has not advanced yields snapshots
        // equal in every field; the probe holds no hidden state.
        let mut source = FakeSource::new(vec![
            FakeReply::Info(active_info()),
            FakeReply::Info(active_info()),
        ]);

        let first = query_state(&mut source).unwrap().unwrap();
        let second = query_state(&mut source).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transport_failure_on_extension_check() {
        let mut source = FakeSource::single(FakeReply::FailExtensionCheck);
        let err = query_state(&mut source).unwrap_err();
        assert!(matches!(err, ProbeError::Transport(_)));
    }

    #[test]
    fn test_transport_failure_on_info_request() {
        // Severed mid-call: no partially populated snapshot comes back.
        let mut source = FakeSource::single(FakeReply::FailInfo);
        let err = query_state(&mut source).unwrap_err();
        assert!(matches!(err, ProbeError::Transport(_)));
    }

    #[test]
    fn test_out_of_range_state_maps_to_unknown() {
        let raw = RawSaverInfo {
            state: 7,
            ..active_info()
        };
        let mut source = FakeSource::single(FakeReply::Info(raw));

        let snapshot = query_state(&mut source).unwrap().unwrap();
        assert_eq!(snapshot.state, SaverState::Unknown);
    }

    #[test]
    fn test_out_of_range_kind_is_an_error() {
        let raw = RawSaverInfo {
            kind: 9,
            ..active_info()
        };
        let mut source = FakeSource::single(FakeReply::Info(raw));

        let err = query_state(&mut source).unwrap_err();
        assert!(matches!(err, ProbeError::UnexpectedKind(9)));
    }

    #[test]
    fn test_disabled_state() {
        let raw = RawSaverInfo {
            state: 3,
            kind: 0,
            til_or_since_ms: 0,
            idle_ms: 42,
            event_mask: 0,
        };
        let mut source = FakeSource::single(FakeReply::Info(raw));

        let snapshot = query_state(&mut source).unwrap().unwrap();
        assert_eq!(snapshot.state, SaverState::Disabled);
    }
}
