//! Repository layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the scene collection contract used by services.
//! - Keep storage details out of placement and editor orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Scene::validate()` before mutation.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`).

pub mod scene_repo;
