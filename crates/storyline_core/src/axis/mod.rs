//! Time axis engine.
//!
//! # Responsibility
//! - Convert between pixel positions, zoom levels and structured tags.
//! - Track the viewport and re-anchor it across zoom changes.
//! - Partition timeline scenes into granularity rows and lay them out.
//!
//! # Invariants
//! - Everything here is pure or owned by a single `Viewport`; no globals.

pub mod convert;
pub mod rows;
pub mod ruler;
pub mod viewport;
