//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into editor-level operations.
//! - Keep front ends (CLI, UI shells) decoupled from storage details.

pub mod editor_service;
pub mod placement;
