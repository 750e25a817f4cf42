//! Domain model for scenes, categories and time tags.
//!
//! # Responsibility
//! - Define canonical data structures used by the axis engine and services.
//! - Own the `GRANULARITY:value` tag text form.
//!
//! # Invariants
//! - Every scene is identified by a unique `SceneId`.
//! - Scenes are never deleted individually; collections are replaced whole.

pub mod category;
pub mod granularity;
pub mod scene;
pub mod time_tag;
