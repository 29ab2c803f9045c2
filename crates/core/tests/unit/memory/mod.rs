//! # Backing Store Tests

/// Event formatting, sinks, and warm-up handling.
pub mod events;

/// Page table and epoch counting.
pub mod footprint;
