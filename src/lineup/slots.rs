// Slot template expansion.

use crate::config::SlotGroupConfig;
use crate::stats::Position;

/// One seat in a round's lineup.
///
/// A required seat must be filled whenever an eligible player remains; an
/// optional seat (beyond a group's `min`) is filled only from the globally
/// re-ranked leftover pool.
#[derive(Debug, Clone)]
pub struct Slot {
    /// Display label, e.g. "QB", "RB2", "FLEX".
    pub label: String,
    /// Positions this seat admits.
    pub positions: Vec<Position>,
    pub required: bool,
}

/// Expand the configured slot groups into individual seats, in template
/// order. A group with `max > 1` gets numbered labels ("RB1", "RB2", ...);
/// within a group the required seats come first.
///
/// Position strings were validated at config load, so unknown entries
/// cannot appear here.
pub fn expand_template(groups: &[SlotGroupConfig]) -> Vec<Slot> {
    let mut slots = Vec::new();

    for group in groups {
        let positions: Vec<Position> = group
            .positions
            .iter()
            .filter_map(|s| Position::from_str_pos(s))
            .collect();

        for i in 0..group.max {
            let label = if group.max == 1 {
                group.label.clone()
            } else {
                format!("{}{}", group.label, i + 1)
            };
            slots.push(Slot {
                label,
                positions: positions.clone(),
                required: i < group.min,
            });
        }
    }

    slots
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
