// =============================================================================
// Multi-series analysis — performance normalization and correlation
// =============================================================================
//
// These engines consume whole series (or sets of series) rather than single
// close vectors.  Like the indicator engines they are pure: explicit inputs,
// new outputs, no shared state.

pub mod correlation;
pub mod performance;
