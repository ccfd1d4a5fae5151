//! Enumeration types for the playback state machine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The three mutually exclusive playback phases.
///
/// The engine starts in [`Phase::Showing`], drains through
/// [`Phase::Removing`] once the cursor has visited every record, and
/// settles in [`Phase::DotsOnly`] with only markers on screen. The
/// serialized names (`"showing"`, `"removing"`, `"dots-only"`) are the
/// ones the dashboard switches on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Filling: the cursor walks the record sequence and the window
    /// slides along with it.
    #[default]
    Showing,
    /// Draining: the cursor runs past the end so the window shrinks
    /// from the left, one arc per tick. Always moves forward.
    Removing,
    /// Settled: no arcs, only the accumulated markers. Terminal under
    /// forward play.
    DotsOnly,
}

impl Phase {
    /// Whether arcs are visible in this phase.
    pub const fn shows_arcs(self) -> bool {
        matches!(self, Self::Showing | Self::Removing)
    }
}

/// Playback direction during [`Phase::Showing`].
///
/// Only the showing phase honors direction; the removing phase always
/// drains forward regardless of this setting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Cursor advances by one each tick.
    #[default]
    Forward,
    /// Cursor retracts by one each tick, clamped at zero.
    Backward,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn phase_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&Phase::Showing).unwrap(), "\"showing\"");
        assert_eq!(serde_json::to_string(&Phase::Removing).unwrap(), "\"removing\"");
        assert_eq!(serde_json::to_string(&Phase::DotsOnly).unwrap(), "\"dots-only\"");
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Forward).unwrap(), "\"forward\"");
        assert_eq!(serde_json::to_string(&Direction::Backward).unwrap(), "\"backward\"");
    }

    #[test]
    fn only_arc_phases_show_arcs() {
        assert!(Phase::Showing.shows_arcs());
        assert!(Phase::Removing.shows_arcs());
        assert!(!Phase::DotsOnly.shows_arcs());
    }
}
