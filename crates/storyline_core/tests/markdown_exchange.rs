use storyline_core::{export_markdown, parse_markdown, ImportError, Scene, TimeTag};

fn collection() -> Vec<Scene> {
    vec![
        Scene::stacked(1, "Hero finds the map", "Setup", 2),
        Scene::placed(2, "Battle at the bridge", "Action", TimeTag::year(2003).unwrap()),
        Scene::placed(
            3,
            "Midnight escape",
            "Plot Point",
            "HOUR:2004-07-09 11pm".parse().unwrap(),
        ),
        Scene::stacked(4, "Quiet ending", "Epilogue", 1),
    ]
}

#[test]
fn export_then_import_preserves_scene_fields() {
    let scenes = collection();
    let document = export_markdown("Story Timeline", &scenes);
    let imported = parse_markdown(&document, "Setup").unwrap();

    let expected: Vec<_> = scenes
        .iter()
        .map(|scene| (&scene.logline, scene.time, &scene.category, scene.stack_index))
        .collect();
    let actual: Vec<_> = imported
        .scenes
        .iter()
        .map(|scene| (&scene.logline, scene.time, &scene.category, scene.stack_index))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(imported.skipped_blocks, 1);
    assert_eq!(
        imported.categories,
        vec!["Setup", "Action", "Plot Point", "Epilogue"]
    );
}

#[test]
fn import_renumbers_ids_in_document_order() {
    let content = "## SCENE:\n#LOGLINE: first\n\n## SCENE:\n#LOGLINE: second\n";
    let imported = parse_markdown(content, "Setup").unwrap();
    let ids: Vec<_> = imported.scenes.iter().map(|scene| scene.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn lenient_fields_recover_instead_of_failing() {
    let content = "\
## SCENE:
#LOGLINE: Broken fields
#TIME: MONTH:FOO-2003
#CATEGORY:
#STACK INDEX: banana
";
    let imported = parse_markdown(content, "Setup").unwrap();
    let scene = &imported.scenes[0];
    assert_eq!(scene.time, None);
    assert_eq!(scene.category, "Setup");
    assert_eq!(scene.stack_index, 1);
    assert_eq!(imported.invalid_tags, 1);
}

#[test]
fn empty_document_is_rejected_with_user_message() {
    let err = parse_markdown("", "Setup").unwrap_err();
    assert_eq!(err, ImportError::NoValidScenes);
    assert_eq!(err.to_string(), "No valid scenes found in the imported file.");
}
