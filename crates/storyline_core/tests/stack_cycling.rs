use storyline_core::service::placement::{cycle_stack, move_to_stack, stack_order};
use storyline_core::{Scene, TimeTag};

fn stacked_ids(scenes: &[Scene]) -> Vec<u64> {
    stack_order(scenes).iter().map(|scene| scene.id).collect()
}

#[test]
fn n_cycles_restore_original_order() {
    let mut scenes = vec![
        Scene::stacked(1, "a", "Setup", 1),
        Scene::stacked(2, "b", "Setup", 2),
        Scene::stacked(3, "c", "Setup", 3),
        Scene::placed(4, "d", "Action", TimeTag::year(2003).unwrap()),
    ];
    let original = stacked_ids(&scenes);

    assert_eq!(cycle_stack(&mut scenes), Some(1));
    assert_eq!(stacked_ids(&scenes), vec![2, 3, 1]);
    cycle_stack(&mut scenes);
    cycle_stack(&mut scenes);

    assert_eq!(stacked_ids(&scenes), original);
    assert_eq!(scenes[3].stack_index, 0);
    assert!(scenes[3].is_on_timeline());
}

#[test]
fn cycling_an_empty_stack_is_a_no_op() {
    let mut scenes = vec![Scene::placed(1, "a", "Setup", TimeTag::year(2001).unwrap())];
    assert_eq!(cycle_stack(&mut scenes), None);
    assert_eq!(scenes[0].time, TimeTag::year(2001));
}

#[test]
fn timeline_scene_returns_to_the_back_of_the_stack() {
    let mut scenes = vec![
        Scene::stacked(1, "a", "Setup", 1),
        Scene::placed(2, "b", "Setup", TimeTag::year(2002).unwrap()),
    ];
    assert_eq!(move_to_stack(&mut scenes, 2).unwrap(), 2);
    assert_eq!(scenes[1].time, None);
    assert_eq!(stacked_ids(&scenes), vec![1, 2]);
}

fn stack_with_placed_scene(n: u64) -> Vec<Scene> {
    let mut scenes: Vec<Scene> = (1..=n)
        .map(|id| Scene::stacked(id, format!("scene {id}"), "Setup", id as u32))
        .collect();
    scenes.insert(
        (n / 2) as usize,
        Scene::placed(100, "placed", "Action", TimeTag::year(2004).unwrap()),
    );
    scenes
}

#[test]
fn one_cycle_rotates_and_n_cycles_restore_for_every_size() {
    for n in 1..=6 {
        let mut scenes = stack_with_placed_scene(n);
        let original = stacked_ids(&scenes);

        cycle_stack(&mut scenes);
        let mut rotated = original.clone();
        rotated.rotate_left(1);
        assert_eq!(stacked_ids(&scenes), rotated, "n={n}");

        for _ in 1..n {
            cycle_stack(&mut scenes);
        }
        assert_eq!(stacked_ids(&scenes), original, "n={n}");
        let placed = scenes.iter().find(|scene| scene.id == 100).unwrap();
        assert!(placed.is_on_timeline());
        assert_eq!(placed.stack_index, 0);
    }
}

#[test]
fn cycling_a_stack_with_a_gap_still_rotates() {
    // Front card (index 1) was dragged to the timeline.
    let mut scenes = vec![
        Scene::placed(1, "a", "Setup", TimeTag::year(2001).unwrap()),
        Scene::stacked(2, "b", "Setup", 2),
        Scene::stacked(3, "c", "Setup", 3),
    ];

    assert_eq!(cycle_stack(&mut scenes), Some(2));
    assert_eq!(stacked_ids(&scenes), vec![3, 2]);
    assert_eq!(cycle_stack(&mut scenes), Some(3));
    assert_eq!(stacked_ids(&scenes), vec![2, 3]);
    assert!(scenes[0].is_on_timeline());
}
