use super::*;

#[test]
fn default_config_validates() {
    let config = default_config();
    validate_config(&config).expect("default config is valid");
    assert_eq!(config.expected_documents, Some(10_000));
    assert_eq!(config.profile_labels.len(), 5);
}

#[test]
fn config_stub_round_trips_through_loader() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("audit.json");
    std::fs::write(&path, config_stub().expect("render stub")).expect("write stub");

    let config = resolve_config(Some(&path)).expect("load stub");
    assert_eq!(config.headings.why, "Why This Skill Exists");
    assert_eq!(config.report.top_n, 15);
}

#[test]
fn partial_config_keeps_defaults_for_missing_fields() {
    let value = serde_json::json!({
        "schema_version": 1,
        "expected_documents": null,
        "report": { "top_n": 3 }
    });
    let config: AuditConfig = serde_json::from_value(value).expect("parse partial config");
    assert_eq!(config.expected_documents, None);
    assert_eq!(config.report.top_n, 3);
    assert_eq!(config.report.summary_max_chars, 120);
    assert_eq!(config.paths.shards_root, "skills/generated/shards");
}

#[test]
fn unknown_fields_are_rejected() {
    let value = serde_json::json!({ "schema_version": 1, "rubric_version": 2 });
    assert!(serde_json::from_value::<AuditConfig>(value).is_err());
}

#[test]
fn validate_rejects_parent_paths_and_empty_labels() {
    let mut config = default_config();
    config.paths.scorecard = "../escape.json".to_string();
    let err = validate_config(&config).expect_err("parent path rejected");
    assert!(err.to_string().contains("paths.scorecard"));

    let mut config = default_config();
    config.profile_labels.clear();
    assert!(validate_config(&config).is_err());
}

#[test]
fn validate_rejects_duplicate_headings() {
    let mut config = default_config();
    config.headings.handoff_contract = config.headings.output_contract.clone();
    let err = validate_config(&config).expect_err("duplicate heading rejected");
    assert!(err.to_string().contains("duplicate section heading"));
}

#[test]
fn heading_line_is_level_two() {
    let headings = SectionHeadings::default();
    assert_eq!(
        headings.line(SectionKind::Cadence),
        "## Operational Cadence (Day / Week / Month)"
    );
}
