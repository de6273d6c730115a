use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use demoforge_core::TopicConfig;

use crate::catalog::DomainProfile;
use crate::continuity::{ContinuityStore, EntityKey, TrendModel, TrendedMetric};
use crate::errors::GenerationError;
use crate::evaluators::{EvalContext, evaluate_field};
use crate::model::{GenerateOptions, GenerationReport};
use crate::partition::build_partition_path;
use crate::pools::ReferencePools;
use crate::record::{FieldValue, Record};

/// Fields forming the entity key; resolved before everything else so later
/// fields can couple on them.
const KEY_FIELDS: [&str; 3] = ["account_id", "service", "resource_id"];

/// Reserved output key for the partition path.
const PARTITION_PATH_FIELD: &str = "s3_path";

/// Fields with this suffix are generation helpers excluded from the output
/// projection.
const INTERNAL_FIELD_SUFFIX: &str = "_faker";

/// Result of a generation run: the ordered record batch plus the run report.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub records: Vec<Record>,
    pub report: GenerationReport,
}

/// Entry point for generating record batches from a topic config.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generate `num_records` records sequentially. Sequential order is a
    /// hard requirement: each record's trended fields derive from the
    /// previous record with the same entity key.
    pub fn run(&self, config: &TopicConfig) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let profile = DomainProfile::from_context(&config.context);
        let trend = TrendModel::new(self.options.trend);
        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        let mut pools = ReferencePools::new(&self.options.base_dir);
        let mut continuity = ContinuityStore::default();
        let mut report = GenerationReport::new(config.topic.clone(), self.options.num_records);

        // All pool I/O happens up front; generation itself never blocks.
        pools.warm(config, &mut rng)?;

        info!(
            topic = config.topic.as_deref().unwrap_or("unnamed"),
            records = self.options.num_records,
            seed = self.options.seed,
            profile = ?profile,
            "generation started"
        );

        let mut records = Vec::with_capacity(self.options.num_records as usize);
        for _ in 0..self.options.num_records {
            let record = assemble_record(
                config,
                profile,
                &trend,
                &mut pools,
                &mut continuity,
                &mut report,
                &mut rng,
            )?;
            records.push(record);
        }

        report.records_generated = records.len() as u64;
        report.entity_keys_tracked = continuity.len() as u64;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            records = report.records_generated,
            entity_keys = report.entity_keys_tracked,
            null_fields = report.null_fields,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { records, report })
    }
}

/// Build one record: key fields, then continuity-aware remaining fields,
/// then the store update, partition path, and output projection.
fn assemble_record(
    config: &TopicConfig,
    profile: DomainProfile,
    trend: &TrendModel,
    pools: &mut ReferencePools,
    continuity: &mut ContinuityStore,
    report: &mut GenerationReport,
    rng: &mut ChaCha8Rng,
) -> Result<Record, GenerationError> {
    let mut record = Record::new();

    for field in &config.fields {
        if !KEY_FIELDS.contains(&field.name.as_str()) {
            continue;
        }
        let value = {
            let mut ctx = EvalContext {
                profile,
                context: &config.context,
                record: &record,
                pools: &mut *pools,
            };
            evaluate_field(&field.name, &field.spec, &mut ctx, rng)?
        };
        report.record_usage(field.spec.kind());
        record.insert(&field.name, value);
    }

    let key = EntityKey::from_record(&record);
    let prior = continuity.get(&key).unwrap_or_default();

    for field in &config.fields {
        let name = field.name.as_str();
        if KEY_FIELDS.contains(&name) {
            continue;
        }

        let trended = match name {
            "usage_quantity" => prior
                .usage_quantity
                .map(|value| trend.successor(value, TrendedMetric::UsageQuantity, rng)),
            "cost" => prior
                .cost
                .map(|value| trend.successor(value, TrendedMetric::Cost, rng)),
            _ => None,
        };

        let value = match trended {
            Some(value) => FieldValue::Float(value),
            None => {
                let mut ctx = EvalContext {
                    profile,
                    context: &config.context,
                    record: &record,
                    pools: &mut *pools,
                };
                evaluate_field(name, &field.spec, &mut ctx, rng)?
            }
        };

        if value.is_null() {
            report.record_null(name);
        }
        report.record_usage(field.spec.kind());
        record.insert(name, value);
    }

    continuity.update(
        &key,
        record.get("usage_quantity").and_then(FieldValue::as_f64),
        record.get("cost").and_then(FieldValue::as_f64),
    );

    if !config.s3_partition_fields.is_empty() {
        let path = build_partition_path(&record, &config.s3_partition_fields);
        record.insert(PARTITION_PATH_FIELD, FieldValue::Text(path));
    }

    Ok(record.retain_fields(|name| !name.ends_with(INTERNAL_FIELD_SUFFIX)))
}
