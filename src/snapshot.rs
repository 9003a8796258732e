//! Domain types for screensaver state.
//!
//! These mirror the fields of the MIT-SCREEN-SAVER `QueryInfo` reply, with the
//! raw protocol codes lifted into closed enums so out-of-range values cannot
//! leak into callers.

use serde::Serialize;

/// Screensaver activation state as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaverState {
    /// The screensaver is not active.
    Off,
    /// The screensaver is active (the screen is being saved).
    On,
    /// The server is cycling to a new screensaver phase.
    Cycle,
    /// The screensaver has been disabled (e.g. `xset s off`).
    Disabled,
    /// The server reported a code outside the protocol range.
    Unknown,
}

impl SaverState {
    /// Decode a protocol state code.
    ///
    /// Codes outside the protocol range map to [`SaverState::Unknown`] rather
    /// than surfacing as bare integers.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Off,
            1 => Self::On,
            2 => Self::Cycle,
            3 => Self::Disabled,
            _ => Self::Unknown,
        }
    }

    /// Get the state as a lowercase string for display output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Cycle => "cycle",
            Self::Disabled => "disabled",
            Self::Unknown => "unknown",
        }
    }
}

/// Mechanism the server uses to blank the screen.
///
/// Only meaningful while the screensaver is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaverKind {
    /// Video blanking.
    Blanked,
    /// The server's built-in saver.
    Internal,
    /// An external screensaver client owns the saver window.
    External,
}

impl SaverKind {
    /// Decode a protocol kind code.
    ///
    /// The protocol defines no "unknown" kind, so out-of-range codes return
    /// `None` and the probe treats them as a malformed reply.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Blanked),
            1 => Some(Self::Internal),
            2 => Some(Self::External),
            _ => None,
        }
    }

    /// Get the kind as a lowercase string for display output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blanked => "blanked",
            Self::Internal => "internal",
            Self::External => "external",
        }
    }
}

/// One screensaver state snapshot.
///
/// Copied verbatim from a single server reply, with no unit conversion (the
/// wire format is already milliseconds). A snapshot is not a live view: it is
/// stale as soon as the server's idle counter advances, and each query is a
/// fresh round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current activation state.
    pub state: SaverState,

    /// Blanking mechanism, meaningful only while the saver is active.
    pub kind: SaverKind,

    /// Milliseconds until the saver activates (state off) or since it
    /// last changed (state on); the extension defines which.
    pub til_or_since_ms: u32,

    /// Milliseconds the input devices have been idle.
    pub idle_ms: u32,

    /// Screensaver event mask currently selected by this client.
    ///
    /// Always 0 unless the caller registered for events elsewhere; this
    /// crate never selects any.
    pub event_mask: u32,
}
