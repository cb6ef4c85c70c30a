// Lineup construction: slot templates, the one-time-use player pool, and
// the per-round allocation engine.

pub mod engine;
pub mod pool;
pub mod slots;
