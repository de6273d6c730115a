use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use demoforge_core::{
    ChoiceField, DatetimeField, FakerField, FieldSpec, NumericBounds, NumericField, PatternField,
};
use demoforge_generate::GenerationError;
use demoforge_generate::catalog::DomainProfile;
use demoforge_generate::evaluators::{EvalContext, evaluate_field};
use demoforge_generate::pools::ReferencePools;
use demoforge_generate::record::{FieldValue, Record};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("demoforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn empty_context() -> BTreeMap<String, serde_json::Value> {
    BTreeMap::new()
}

#[test]
fn weighted_choice_converges_to_weights() {
    let spec = FieldSpec::Choice(ChoiceField {
        values: vec![
            serde_json::Value::String("rare".to_string()),
            serde_json::Value::String("common".to_string()),
        ],
        weights: Some(vec![0.1, 0.9]),
        values_by_company: None,
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let draws = 100_000;
    let mut common = 0_u64;
    for _ in 0..draws {
        let mut ctx = EvalContext {
            profile: DomainProfile::Neutral,
            context: &context,
            record: &record,
            pools: &mut pools,
        };
        let value = evaluate_field("status", &spec, &mut ctx, &mut rng).expect("draw choice");
        if value.as_str() == Some("common") {
            common += 1;
        }
    }

    let frequency = common as f64 / draws as f64;
    assert!(
        (frequency - 0.9).abs() < 0.02,
        "empirical frequency {frequency} should be within 2% of 0.9"
    );
}

#[test]
fn unique_pool_draws_cover_pool_then_exhaust() {
    let dir = temp_dir("unique_pool");
    let pool: Vec<serde_json::Value> = (0..5)
        .map(|i| serde_json::json!({"company_id": 10_000 + i, "company_name": format!("Company {i}")}))
        .collect();
    fs::write(
        dir.join("companies.json"),
        serde_json::to_vec(&pool).expect("serialize pool"),
    )
    .expect("write pool");

    let mut pools = ReferencePools::new(&dir);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let value = pools
            .draw("companies.json", "company_name", true, &mut rng)
            .expect("unique draw");
        seen.insert(value.as_str().expect("string entry").to_string());
    }
    assert_eq!(seen.len(), 5, "five unique draws should cover the pool");

    let exhausted = pools.draw("companies.json", "company_name", true, &mut rng);
    assert!(matches!(
        exhausted,
        Err(GenerationError::PoolExhausted { .. })
    ));
}

#[test]
fn shared_pool_draws_repeat_and_do_not_interfere_with_unique() {
    let dir = temp_dir("shared_pool");
    let pool: Vec<serde_json::Value> = (0..3)
        .map(|i| serde_json::json!({"company_name": format!("Company {i}")}))
        .collect();
    fs::write(
        dir.join("companies.json"),
        serde_json::to_vec(&pool).expect("serialize pool"),
    )
    .expect("write pool");

    let mut pools = ReferencePools::new(&dir);
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    // Far more shared draws than entries; replacement is implicit.
    for _ in 0..50 {
        pools
            .draw("companies.json", "company_name", false, &mut rng)
            .expect("shared draw");
    }

    // The shared pool above must not consume the unique pool's arena.
    for _ in 0..3 {
        pools
            .draw("companies.json", "company_name", true, &mut rng)
            .expect("unique draw after shared draws");
    }
}

#[test]
fn missing_reference_file_is_fatal() {
    let dir = temp_dir("missing_pool");
    let mut pools = ReferencePools::new(&dir);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let result = pools.draw("nope.json", "field", false, &mut rng);
    assert!(matches!(result, Err(GenerationError::MissingReference(_))));
}

#[test]
fn datetime_draws_stay_within_bounds() {
    let spec = FieldSpec::Datetime(DatetimeField {
        min: Some("2024-01-01T00:00:00".to_string()),
        max: Some("2024-01-31T23:59:59".to_string()),
        format: None,
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let min = NaiveDateTime::parse_from_str("2024-01-01T00:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
    let max = NaiveDateTime::parse_from_str("2024-01-31T23:59:59", "%Y-%m-%dT%H:%M:%S").unwrap();

    for _ in 0..500 {
        let mut ctx = EvalContext {
            profile: DomainProfile::Neutral,
            context: &context,
            record: &record,
            pools: &mut pools,
        };
        let value = evaluate_field("usage_start", &spec, &mut ctx, &mut rng).expect("draw");
        let text = value.as_str().expect("datetime renders as text");
        let instant =
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").expect("ISO datetime");
        assert!(instant >= min && instant <= max, "{instant} out of bounds");
    }
}

#[test]
fn datetime_truncates_long_bounds_to_iso_prefix() {
    let spec = FieldSpec::Datetime(DatetimeField {
        min: Some("2024-06-01T00:00:00.000Z".to_string()),
        max: Some("2024-06-01T00:00:00.999Z".to_string()),
        format: None,
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut ctx = EvalContext {
        profile: DomainProfile::Neutral,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    let value = evaluate_field("when", &spec, &mut ctx, &mut rng).expect("draw");
    assert_eq!(value.as_str(), Some("2024-06-01T00:00:00"));
}

#[test]
fn pattern_with_failing_component_resolves_null() {
    let mut components = BTreeMap::new();
    components.insert(
        "part".to_string(),
        FieldSpec::Formula(demoforge_core::FormulaField {
            formula: "missing_field * 2".to_string(),
            output_format: None,
            time_format: None,
        }),
    );
    let spec = FieldSpec::String(PatternField {
        pattern: "res-{part}".to_string(),
        components,
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut ctx = EvalContext {
        profile: DomainProfile::Neutral,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    let value = evaluate_field("resource_name", &spec, &mut ctx, &mut rng).expect("evaluate");
    assert!(value.is_null());
}

#[test]
fn numeric_by_service_bounds_override_defaults() {
    let mut by_service = BTreeMap::new();
    by_service.insert(
        "EC2".to_string(),
        NumericBounds {
            min: Some(50.0),
            max: Some(50.0),
        },
    );
    let spec = FieldSpec::Int(NumericField {
        min: Some(0.0),
        max: Some(10.0),
        by_service: Some(by_service),
    });

    let context = empty_context();
    let mut record = Record::new();
    record.insert("service", FieldValue::Text("EC2".to_string()));
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ctx = EvalContext {
        profile: DomainProfile::Neutral,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    let value = evaluate_field("instance_hours", &spec, &mut ctx, &mut rng).expect("draw");
    assert_eq!(value, FieldValue::Int(50));
}

#[test]
fn saas_plan_multiplier_scales_monetary_fields() {
    let spec = FieldSpec::Float(NumericField {
        min: Some(10.0),
        max: Some(10.0),
        by_service: None,
    });

    let context = empty_context();
    let mut record = Record::new();
    record.insert("plan", FieldValue::Text("Enterprise".to_string()));
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut ctx = EvalContext {
        profile: DomainProfile::Saas,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    // Enterprise revenue multiplier is 10.
    let value = evaluate_field("mrr_amount", &spec, &mut ctx, &mut rng).expect("draw");
    assert_eq!(value, FieldValue::Float(100.0));

    // Usage fields use the usage multiplier (Enterprise = 3).
    let mut ctx = EvalContext {
        profile: DomainProfile::Saas,
        context: &context,
        record: &record,
        pools: &mut pools,
    };
    let value = evaluate_field("usage_events", &spec, &mut ctx, &mut rng).expect("draw");
    assert_eq!(value, FieldValue::Float(30.0));
}

#[test]
fn unknown_faker_method_is_a_capability_error() {
    let spec = FieldSpec::Faker(FakerField {
        faker_method: "quantum_handle".to_string(),
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut ctx = EvalContext {
        profile: DomainProfile::Neutral,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    let result = evaluate_field("owner_faker", &spec, &mut ctx, &mut rng);
    assert!(matches!(result, Err(GenerationError::UnknownFaker(_))));
}

#[test]
fn known_faker_method_produces_text() {
    let spec = FieldSpec::Faker(FakerField {
        faker_method: "company".to_string(),
    });

    let context = empty_context();
    let record = Record::new();
    let mut pools = ReferencePools::new(".");
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let mut ctx = EvalContext {
        profile: DomainProfile::Neutral,
        context: &context,
        record: &record,
        pools: &mut pools,
    };

    let value = evaluate_field("company_faker", &spec, &mut ctx, &mut rng).expect("fake");
    let text = value.as_str().expect("faker output is text");
    assert!(!text.is_empty());
}
