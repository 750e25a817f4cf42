//! Scene repository contracts and in-memory implementation.
//!
//! # Responsibility
//! - Own the scene collection behind a storage-agnostic trait.
//! - Enforce id uniqueness and `Scene::validate()` on writes.
//!
//! # Invariants
//! - Collection order is insertion order and is preserved by updates.
//! - `replace_all` is all-or-nothing: invalid input leaves the old collection.

use crate::model::scene::{Scene, SceneId, SceneValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for scene collection operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(SceneValidationError),
    NotFound(SceneId),
    DuplicateId(SceneId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "scene not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate scene id: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<SceneValidationError> for RepoError {
    fn from(value: SceneValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for the scene collection.
pub trait SceneRepository {
    /// All scenes in collection order.
    fn scenes(&self) -> &[Scene];
    /// Mutable view for in-place placement updates.
    fn scenes_mut(&mut self) -> &mut [Scene];
    /// Appends one scene.
    fn insert(&mut self, scene: Scene) -> RepoResult<SceneId>;
    /// Replaces the whole collection.
    fn replace_all(&mut self, scenes: Vec<Scene>) -> RepoResult<()>;

    fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes().iter().find(|scene| scene.id == id)
    }

    fn get_mut(&mut self, id: SceneId) -> RepoResult<&mut Scene> {
        self.scenes_mut()
            .iter_mut()
            .find(|scene| scene.id == id)
            .ok_or(RepoError::NotFound(id))
    }

    /// Next id: `max(id) + 1`, or 1 for an empty collection.
    fn next_id(&self) -> SceneId {
        self.scenes()
            .iter()
            .map(|scene| scene.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Vec-backed scene repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySceneRepository {
    scenes: Vec<Scene>,
}

impl MemorySceneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from validated scenes.
    pub fn try_from_scenes(scenes: Vec<Scene>) -> RepoResult<Self> {
        let mut repo = Self::new();
        repo.replace_all(scenes)?;
        Ok(repo)
    }
}

impl SceneRepository for MemorySceneRepository {
    fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    fn scenes_mut(&mut self) -> &mut [Scene] {
        &mut self.scenes
    }

    fn insert(&mut self, scene: Scene) -> RepoResult<SceneId> {
        scene.validate()?;
        if self.get(scene.id).is_some() {
            return Err(RepoError::DuplicateId(scene.id));
        }
        let id = scene.id;
        self.scenes.push(scene);
        Ok(id)
    }

    fn replace_all(&mut self, scenes: Vec<Scene>) -> RepoResult<()> {
        ensure_valid_collection(&scenes)?;
        self.scenes = scenes;
        Ok(())
    }
}

fn ensure_valid_collection(scenes: &[Scene]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(scenes.len());
    for scene in scenes {
        scene.validate()?;
        if !seen.insert(scene.id) {
            return Err(RepoError::DuplicateId(scene.id));
        }
    }
    Ok(())
}
