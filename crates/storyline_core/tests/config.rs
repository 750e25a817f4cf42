use std::io::Write;
use storyline_core::{BufferSink, ConfigError, EditorConfig, EditorService, ExportOutcome, Granularity};

#[test]
fn load_reads_overrides_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "initial_zoom": 0,
            "fallback_category": "Misc",
            "seed_scenes": [{{ "logline": "Only seed", "category": "Misc" }}]
        }}"#
    )
    .unwrap();

    let config = EditorConfig::load(file.path()).unwrap();
    assert_eq!(config.initial_granularity(), Granularity::Year);

    let editor = EditorService::from_config(&config).unwrap();
    assert_eq!(editor.scenes().len(), 1);
    assert_eq!(editor.viewport().zoom(), Granularity::Year);
    assert_eq!(editor.categories().len(), 5);
}

#[test]
fn out_of_range_zoom_falls_back_to_year() {
    let config = EditorConfig::from_json_str(r#"{ "initial_zoom": 9 }"#).unwrap();
    assert_eq!(config.initial_granularity(), Granularity::Year);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = EditorConfig::load(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn default_export_sink_writes_configured_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig::from_json_str(r#"{ "export_file_name": "draft.md" }"#).unwrap();
    let editor = EditorService::from_config(&config).unwrap();

    let mut sink = config.export_sink(dir.path());
    assert_eq!(sink.path(), dir.path().join("draft.md"));
    let outcome = editor.export_to(&mut sink, &mut BufferSink::new());

    assert!(matches!(outcome, ExportOutcome::Delivered { .. }));
    let written = std::fs::read_to_string(dir.path().join("draft.md")).unwrap();
    assert_eq!(written, editor.export_markdown());
}
