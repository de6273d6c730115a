use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Number of records to generate.
    pub num_records: u64,
    /// Seed for the deterministic record stream.
    pub seed: u64,
    /// Directory reference-file paths are resolved against.
    pub base_dir: PathBuf,
    /// Continuity/trend knobs.
    pub trend: TrendOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            num_records: 10_000,
            seed: 0,
            base_dir: PathBuf::from("."),
            trend: TrendOptions::default(),
        }
    }
}

/// Knobs for the per-entity continuity model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendOptions {
    /// Proportional drift applied per step; positive trends upward.
    pub drift_rate: f64,
    /// Probability that a step is a multiplicative spike instead.
    pub spike_probability: f64,
    /// Inclusive spike factor range.
    pub spike_min: f64,
    pub spike_max: f64,
    /// Global scale applied to trended `cost` successors.
    pub spend_multiplier: f64,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            drift_rate: 0.005,
            spike_probability: 0.02,
            spike_min: 2.0,
            spike_max: 10.0,
            spend_multiplier: 1.0,
        }
    }
}

/// Structured diagnostic recorded during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub records_requested: u64,
    pub records_generated: u64,
    /// Fields that resolved to null through the recovered-locally policy.
    pub null_fields: u64,
    /// Distinct entity keys the continuity store tracked.
    pub entity_keys_tracked: u64,
    pub duration_ms: u64,
    pub evaluator_usage: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(topic: Option<String>, records_requested: u64) -> Self {
        Self {
            topic,
            records_requested,
            records_generated: 0,
            null_fields: 0,
            entity_keys_tracked: 0,
            duration_ms: 0,
            evaluator_usage: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_usage(&mut self, kind: &str) {
        *self.evaluator_usage.entry(kind.to_string()).or_insert(0) += 1;
    }

    /// Count a null-resolved field. The warning list carries one entry per
    /// field name, not one per record, to keep reports bounded.
    pub fn record_null(&mut self, field: &str) {
        self.null_fields += 1;
        let already_noted = self.warnings.iter().any(|issue| {
            issue.code == "field_resolved_null" && issue.field.as_deref() == Some(field)
        });
        if !already_noted {
            self.warnings.push(GenerationIssue {
                code: "field_resolved_null".to_string(),
                field: Some(field.to_string()),
                message: format!("field '{field}' resolved to null"),
            });
        }
    }
}
