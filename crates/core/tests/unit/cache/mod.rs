//! # Cache Tests

/// Address split, recovery, and line spans.
pub mod codec;



/// Replacement policy behavior through the set array.
pub mod policies;
