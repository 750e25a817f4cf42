//! Text exchange of scene collections.
//!
//! # Responsibility
//! - Produce and consume the `## SCENE:` markdown document.
//! - Deliver exports through a primary sink with one fallback.

pub mod markdown;
pub mod sink;
