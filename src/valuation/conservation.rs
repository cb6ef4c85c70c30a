// Elite-conservation policy.
//
// Transforms a base projection into an effective value for one round:
// weight by the team's advancement probability, then discount elite
// players on strong teams in the early rounds so the allocator leaves
// them for the rounds where they can actually play. The discounts
// approximate the shadow price of burning a Super-Bowl-bound asset early;
// they are tunable policy, not derived quantities.

use crate::bracket::Round;
use crate::config::ConservationRules;

/// Penalty multiplier for one (round, elite, strong) combination.
///
/// Only elite players on strong teams are discounted, and only in the two
/// early rounds; by the Championship the conservation question is moot.
pub fn penalty_multiplier(
    round: Round,
    elite: bool,
    strong: bool,
    rules: &ConservationRules,
) -> f64 {
    if !(elite && strong) {
        return 1.0;
    }
    match round {
        Round::WildCard => rules.wildcard_multiplier,
        Round::Divisional => rules.divisional_multiplier,
        Round::Championship | Round::SuperBowl => 1.0,
    }
}

/// Effective value of a player for one round.
///
/// `round_probability` is the team's advancement probability for the
/// target round; `sb_probability` is the team's Super Bowl appearance
/// probability, used as a static strength signal regardless of the
/// current round.
pub fn effective_value(
    base_projection: f64,
    round_probability: f64,
    sb_probability: f64,
    round: Round,
    rules: &ConservationRules,
) -> f64 {
    let weighted = base_projection * round_probability;
    let elite = base_projection > rules.elite_projection;
    let strong = sb_probability > rules.strong_sb_probability;
    weighted * penalty_multiplier(round, elite, strong, rules)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
