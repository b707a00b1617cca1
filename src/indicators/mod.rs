// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the trend indicators.  Every
// engine produces a series aligned 1:1 with the source dates, with `None`
// marking positions where history is insufficient — callers are forced to
// handle warm-up gaps and all-undefined series explicitly.

pub mod rsi;
pub mod sma;
