use std::collections::BTreeMap;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level topic configuration for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TopicConfig {
    /// Topic label, used for default output naming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Free-form key/value bag visible to evaluators (e.g. `domain`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
    /// Ordered field definitions; generation preserves this order.
    pub fields: Vec<FieldDef>,
    /// Field names used to derive a hive-style partition path per record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub s3_partition_fields: Vec<String>,
}

/// One named field in a topic config.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

/// Field-kind union; the `type` tag selects the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Uniform random instant between two datetime bounds.
    Datetime(DatetimeField),
    /// Uniform random calendar day, optionally with a time-of-day.
    Date(DateField),
    /// Draw from an external JSON value pool.
    Reference(ReferenceField),
    /// Named synthetic-text capability (person/company/address style).
    Faker(FakerField),
    /// Template string assembled from recursively evaluated components.
    String(PatternField),
    /// Pick from an explicit value list, optionally weighted or conditioned.
    Choice(ChoiceField),
    /// Uniform integer within bounds, with optional per-service overrides.
    Int(NumericField),
    /// Uniform float within bounds, with optional per-service overrides.
    Float(NumericField),
    /// Restricted arithmetic/date expression over prior fields.
    Formula(FormulaField),
}

impl FieldSpec {
    /// Stable kind label used in diagnostics and usage counters.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::Datetime(_) => "datetime",
            FieldSpec::Date(_) => "date",
            FieldSpec::Reference(_) => "reference",
            FieldSpec::Faker(_) => "faker",
            FieldSpec::String(_) => "string",
            FieldSpec::Choice(_) => "choice",
            FieldSpec::Int(_) => "int",
            FieldSpec::Float(_) => "float",
            FieldSpec::Formula(_) => "formula",
        }
    }
}

/// Parameters for `datetime` fields.
///
/// Bounds are ISO strings (`YYYY-MM-DDTHH:MM:SS`); longer strings are
/// truncated to the 19-char ISO prefix before parsing. A missing `max`, or
/// the literal `dynamic`, resolves to the end of the current calendar month.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DatetimeField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    /// Output format; defaults to `%Y-%m-%dT%H:%M:%S`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Parameters for `date` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DateField {
    /// Inclusive start day (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Inclusive end day; missing or `dynamic` resolves to the end of the
    /// current calendar month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// When set, a random time-of-day is added and this format is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
}

/// Parameters for `reference` fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceField {
    /// Path to a JSON array of flat objects, relative to the config base dir.
    pub reference_file: String,
    /// Attribute returned from each drawn entry.
    pub reference_field: String,
    /// Under unique mode the pool is consumed destructively.
    #[serde(default)]
    pub unique: bool,
}

/// Parameters for `faker` fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FakerField {
    /// Capability name, e.g. `company`, `name`, `email`.
    pub faker_method: String,
}

/// Parameters for pattern-`string` fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PatternField {
    /// Template with `{component}` placeholders.
    pub pattern: String,
    /// Named sub-field definitions evaluated into the placeholders.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, FieldSpec>,
}

/// Parameters for `choice` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChoiceField {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<serde_json::Value>,
    /// Selection weights, parallel to `values` (same length required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    /// Value lists conditioned on the record's `company` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_by_company: Option<BTreeMap<String, Vec<serde_json::Value>>>,
}

/// Parameters for `int` and `float` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NumericField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Bound overrides keyed on the record's `service` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_service: Option<BTreeMap<String, NumericBounds>>,
}

/// Partial bound pair for `by_service` overrides.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct NumericBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Parameters for `formula` fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormulaField {
    /// Restricted arithmetic expression over prior fields.
    pub formula: String,
    /// Format applied when the result is a datetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Legacy alias consulted after `output_format`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
}

/// Load and parse a topic config from a YAML file.
pub fn load_config(path: &Path) -> Result<TopicConfig> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents)
        .map_err(|err| Error::Parse(format!("{}: {err}", path.display())))
}
