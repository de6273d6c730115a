use demoforge_core::{FieldSpec, TopicConfig};

const AWS_BILLING_CONFIG: &str = r#"
topic: aws_billing
context:
  domain: aws_billing
fields:
  - name: account_id
    type: choice
    values: ["123456789012", "210987654321"]
  - name: service
    type: choice
    values: ["EC2", "S3"]
    weights: [0.7, 0.3]
  - name: resource_id
    type: string
    pattern: "i-{suffix}"
    components:
      suffix:
        type: int
        min: 1000
        max: 9999
  - name: usage_start
    type: datetime
    min: "2024-01-01T00:00:00"
    max: "2024-06-30T23:59:59"
  - name: usage_quantity
    type: float
    min: 1
    max: 100
    by_service:
      EC2:
        min: 10
        max: 500
  - name: cost
    type: formula
    formula: "usage_quantity * 0.12"
  - name: owner_faker
    type: faker
    faker_method: name
s3_partition_fields: [usage_start]
"#;

#[test]
fn parses_full_field_type_union() {
    let config: TopicConfig = serde_yaml::from_str(AWS_BILLING_CONFIG).expect("parse config");

    assert_eq!(config.topic.as_deref(), Some("aws_billing"));
    assert_eq!(config.fields.len(), 7);
    assert_eq!(config.s3_partition_fields, vec!["usage_start".to_string()]);
    assert_eq!(
        config.context.get("domain"),
        Some(&serde_json::Value::String("aws_billing".to_string()))
    );

    let kinds: Vec<&str> = config.fields.iter().map(|f| f.spec.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "choice", "choice", "string", "datetime", "float", "formula", "faker"
        ]
    );

    let FieldSpec::Choice(service) = &config.fields[1].spec else {
        panic!("service should be a choice field");
    };
    assert_eq!(service.weights.as_deref(), Some(&[0.7, 0.3][..]));

    let FieldSpec::String(resource) = &config.fields[2].spec else {
        panic!("resource_id should be a pattern field");
    };
    assert!(resource.components.contains_key("suffix"));

    let FieldSpec::Float(usage) = &config.fields[4].spec else {
        panic!("usage_quantity should be a float field");
    };
    let ec2 = usage
        .by_service
        .as_ref()
        .and_then(|map| map.get("EC2"))
        .expect("EC2 override");
    assert_eq!(ec2.min, Some(10.0));
    assert_eq!(ec2.max, Some(500.0));
}

#[test]
fn reference_unique_defaults_to_false() {
    let yaml = r#"
fields:
  - name: company
    type: reference
    reference_file: data/company_pool.json
    reference_field: company_name
"#;
    let config: TopicConfig = serde_yaml::from_str(yaml).expect("parse config");
    let FieldSpec::Reference(reference) = &config.fields[0].spec else {
        panic!("expected reference field");
    };
    assert!(!reference.unique);
    assert_eq!(reference.reference_field, "company_name");
}

#[test]
fn rejects_unknown_field_type() {
    let yaml = r#"
fields:
  - name: broken
    type: telepathy
"#;
    let result: Result<TopicConfig, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn config_round_trips_through_yaml() {
    let config: TopicConfig = serde_yaml::from_str(AWS_BILLING_CONFIG).expect("parse config");
    let emitted = serde_yaml::to_string(&config).expect("serialize config");
    let reparsed: TopicConfig = serde_yaml::from_str(&emitted).expect("reparse config");

    assert_eq!(reparsed.fields.len(), config.fields.len());
    for (a, b) in config.fields.iter().zip(&reparsed.fields) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.spec.kind(), b.spec.kind());
    }
}
