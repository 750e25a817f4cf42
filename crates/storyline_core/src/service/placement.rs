//! Scene placement and stack cycling over a scene collection.
//!
//! # Invariants
//! - Placing on the timeline sets the tag and `stack_index = 0`.
//! - Moving to the stack clears the tag and appends at `max + 1`.
//! - Cycling rotates the stack left and never touches timeline scenes.

use crate::model::scene::{Scene, SceneId};
use crate::model::time_tag::TimeTag;
use crate::repo::scene_repo::{RepoError, RepoResult};

/// Highest stack index in use, 0 when the stack is empty.
pub fn max_stack_index(scenes: &[Scene]) -> u32 {
    scenes
        .iter()
        .filter(|scene| scene.is_stacked())
        .map(|scene| scene.stack_index)
        .max()
        .unwrap_or(0)
}

/// Index for a card appended to the back of the stack.
///
/// Saturates at `u32::MAX` instead of wrapping to the not-stacked index.
pub fn next_stack_index(scenes: &[Scene]) -> u32 {
    max_stack_index(scenes).saturating_add(1)
}

/// Stacked scenes, front (lowest index) first.
pub fn stack_order(scenes: &[Scene]) -> Vec<&Scene> {
    let mut stacked: Vec<&Scene> = scenes.iter().filter(|scene| scene.is_stacked()).collect();
    stacked.sort_by_key(|scene| scene.stack_index);
    stacked
}

/// Front card of the stack, if any.
pub fn stack_front(scenes: &[Scene]) -> Option<&Scene> {
    scenes
        .iter()
        .filter(|scene| scene.is_stacked())
        .min_by_key(|scene| scene.stack_index)
}

/// Places scene `id` on the timeline at `tag`.
pub fn place_on_timeline(scenes: &mut [Scene], id: SceneId, tag: TimeTag) -> RepoResult<()> {
    let scene = find_mut(scenes, id)?;
    scene.place_at(tag);
    Ok(())
}

/// Moves scene `id` to the back of the stack and returns its new index.
pub fn move_to_stack(scenes: &mut [Scene], id: SceneId) -> RepoResult<u32> {
    let next = next_stack_index(scenes);
    let scene = find_mut(scenes, id)?;
    scene.stack_at(next);
    Ok(next)
}

/// Rotates the stack left: the front scene goes to `max + 1`, every other
/// stacked scene above index 1 moves one step forward.
///
/// Returns the id of the scene sent to the back, or `None` for an empty stack.
pub fn cycle_stack(scenes: &mut [Scene]) -> Option<SceneId> {
    let front_id = stack_front(scenes)?.id;
    let back = next_stack_index(scenes);

    for scene in scenes.iter_mut() {
        if scene.id == front_id {
            scene.stack_index = back;
        } else if scene.stack_index > 1 {
            scene.stack_index -= 1;
        }
    }
    Some(front_id)
}

fn find_mut(scenes: &mut [Scene], id: SceneId) -> RepoResult<&mut Scene> {
    scenes
        .iter_mut()
        .find(|scene| scene.id == id)
        .ok_or(RepoError::NotFound(id))
}
