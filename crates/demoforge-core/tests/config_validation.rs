use std::fs;
use std::path::PathBuf;

use demoforge_core::{TopicConfig, validate_config};

fn parse(yaml: &str) -> TopicConfig {
    serde_yaml::from_str(yaml).expect("parse config")
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("demoforge_core_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn accepts_well_formed_config() {
    let config = parse(
        r#"
fields:
  - name: plan
    type: choice
    values: [Free, Basic, Pro]
    weights: [0.6, 0.3, 0.1]
  - name: seats
    type: int
    min: 1
    max: 500
"#,
    );
    let issues = validate_config(&config, &std::env::temp_dir());
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn flags_duplicate_field_names() {
    let config = parse(
        r#"
fields:
  - name: plan
    type: choice
    values: [Free]
  - name: plan
    type: choice
    values: [Basic]
"#,
    );
    let issues = validate_config(&config, &std::env::temp_dir());
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("duplicate field name"))
    );
}

#[test]
fn flags_weight_arity_mismatch() {
    let config = parse(
        r#"
fields:
  - name: plan
    type: choice
    values: [Free, Basic]
    weights: [0.5, 0.3, 0.2]
"#,
    );
    let issues = validate_config(&config, &std::env::temp_dir());
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("does not match values length"))
    );
}

#[test]
fn flags_missing_reference_file_and_field() {
    let dir = temp_dir("reference");
    fs::write(
        dir.join("companies.json"),
        r#"[{"company_id": 10000, "company_name": "Acme"}]"#,
    )
    .expect("write pool");

    let config = parse(
        r#"
fields:
  - name: company
    type: reference
    reference_file: companies.json
    reference_field: company_name
  - name: ghost
    type: reference
    reference_file: missing.json
    reference_field: anything
  - name: wrong_field
    type: reference
    reference_file: companies.json
    reference_field: ticker
"#,
    );
    let issues = validate_config(&config, &dir);

    assert!(
        !issues
            .iter()
            .any(|issue| issue.field.as_deref() == Some("company")),
        "well-formed reference should pass: {issues:?}"
    );
    assert!(
        issues
            .iter()
            .any(|issue| issue.field.as_deref() == Some("ghost")
                && issue.message.contains("reference file not found"))
    );
    assert!(
        issues
            .iter()
            .any(|issue| issue.field.as_deref() == Some("wrong_field")
                && issue.message.contains("ticker"))
    );
}

#[test]
fn flags_pattern_without_components_and_unknown_placeholder() {
    let config = parse(
        r#"
fields:
  - name: empty_pattern
    type: string
    pattern: "static-value"
  - name: resource_id
    type: string
    pattern: "i-{suffix}-{zone}"
    components:
      suffix:
        type: int
        min: 0
        max: 9
"#,
    );
    let issues = validate_config(&config, &std::env::temp_dir());
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("pattern has no components"))
    );
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("unknown component 'zone'"))
    );
}

#[test]
fn flags_inverted_numeric_bounds_and_unknown_partition_field() {
    let config = parse(
        r#"
fields:
  - name: seats
    type: int
    min: 100
    max: 1
s3_partition_fields: [signup_date]
"#,
    );
    let issues = validate_config(&config, &std::env::temp_dir());
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("min is greater than max"))
    );
    assert!(
        issues
            .iter()
            .any(|issue| issue.message.contains("'signup_date' is not defined"))
    );
}
