//! Display-period ticker for the draining phase.
//!
//! While the catalog is showing, the display period is derived directly
//! from the record under the cursor. Once draining begins there is no
//! record to derive from, so the label switches to this ticker: it
//! starts at the last record's period and walks one calendar month per
//! tick toward a fixed ceiling (the month the process started in). The
//! ticker is cosmetic and has no effect on phase transitions.

use flyway_types::Period;

/// Monotonic month counter, bounded above by a ceiling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTicker {
    current: Period,
    ceiling: Period,
}

impl PeriodTicker {
    /// Create a ticker starting at `start`.
    ///
    /// If `start` is already past `ceiling` (a record dated in the
    /// future) the ticker is pinned to the ceiling.
    pub fn new(start: Period, ceiling: Period) -> Self {
        Self {
            current: start.min(ceiling),
            ceiling,
        }
    }

    /// The period currently shown.
    pub const fn current(&self) -> Period {
        self.current
    }

    /// The ceiling this ticker saturates at.
    pub const fn ceiling(&self) -> Period {
        self.ceiling
    }

    /// Advance one calendar month, saturating at the ceiling.
    pub fn advance(&mut self) {
        if self.current < self.ceiling {
            self.current = self.current.succ();
        }
    }

    /// Whether the ticker has reached its ceiling.
    pub fn at_ceiling(&self) -> bool {
        self.current >= self.ceiling
    }
}
