use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::schema::{ChoiceField, FieldSpec, NumericField, TopicConfig};

/// One problem found while linting a topic config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Field the issue belongs to, when attributable.
    pub field: Option<String>,
    pub message: String,
}

impl ConfigIssue {
    fn for_field(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    fn global(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "field '{}': {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Lint a topic config, collecting every issue instead of stopping at the
/// first. Reference files are resolved relative to `base_dir` and checked
/// for existence and for the presence of the referenced attribute.
pub fn validate_config(config: &TopicConfig, base_dir: &Path) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.fields.is_empty() {
        issues.push(ConfigIssue::global("config has no fields"));
    }

    let mut seen = BTreeSet::new();
    for field in &config.fields {
        if !seen.insert(field.name.as_str()) {
            issues.push(ConfigIssue::for_field(&field.name, "duplicate field name"));
        }
        validate_spec(&field.name, &field.spec, base_dir, &mut issues);
    }

    let field_names: BTreeSet<&str> = config.fields.iter().map(|f| f.name.as_str()).collect();
    for partition_field in &config.s3_partition_fields {
        if !field_names.contains(partition_field.as_str()) {
            issues.push(ConfigIssue::global(format!(
                "partition field '{partition_field}' is not defined"
            )));
        }
    }

    issues
}

fn validate_spec(name: &str, spec: &FieldSpec, base_dir: &Path, issues: &mut Vec<ConfigIssue>) {
    match spec {
        FieldSpec::Choice(choice) => validate_choice(name, choice, issues),
        FieldSpec::Int(numeric) | FieldSpec::Float(numeric) => {
            validate_numeric(name, numeric, issues)
        }
        FieldSpec::Reference(reference) => {
            validate_reference_file(
                name,
                &reference.reference_file,
                &reference.reference_field,
                base_dir,
                issues,
            );
        }
        FieldSpec::Faker(faker) => {
            if faker.faker_method.trim().is_empty() {
                issues.push(ConfigIssue::for_field(name, "faker_method is empty"));
            }
        }
        FieldSpec::String(pattern) => {
            if pattern.components.is_empty() {
                issues.push(ConfigIssue::for_field(name, "pattern has no components"));
            }
            for placeholder in placeholders(&pattern.pattern) {
                if !pattern.components.contains_key(&placeholder) {
                    issues.push(ConfigIssue::for_field(
                        name,
                        format!("pattern references unknown component '{placeholder}'"),
                    ));
                }
            }
            for (component, spec) in &pattern.components {
                validate_spec(&format!("{name}.{component}"), spec, base_dir, issues);
            }
        }
        FieldSpec::Formula(formula) => {
            if formula.formula.trim().is_empty() {
                issues.push(ConfigIssue::for_field(name, "formula is empty"));
            }
        }
        FieldSpec::Datetime(_) | FieldSpec::Date(_) => {}
    }
}

fn validate_choice(name: &str, choice: &ChoiceField, issues: &mut Vec<ConfigIssue>) {
    let conditioned = choice
        .values_by_company
        .as_ref()
        .is_some_and(|map| !map.is_empty());
    if choice.values.is_empty() && !conditioned {
        issues.push(ConfigIssue::for_field(name, "choice has no values"));
    }

    if let Some(weights) = &choice.weights {
        if weights.len() != choice.values.len() {
            issues.push(ConfigIssue::for_field(
                name,
                format!(
                    "weights length {} does not match values length {}",
                    weights.len(),
                    choice.values.len()
                ),
            ));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            issues.push(ConfigIssue::for_field(
                name,
                "weights must be finite and non-negative",
            ));
        }
    }
}

fn validate_numeric(name: &str, numeric: &NumericField, issues: &mut Vec<ConfigIssue>) {
    if let (Some(min), Some(max)) = (numeric.min, numeric.max)
        && min > max
    {
        issues.push(ConfigIssue::for_field(name, "min is greater than max"));
    }
    if let Some(by_service) = &numeric.by_service {
        for (service, bounds) in by_service {
            if let (Some(min), Some(max)) = (bounds.min, bounds.max)
                && min > max
            {
                issues.push(ConfigIssue::for_field(
                    name,
                    format!("by_service '{service}': min is greater than max"),
                ));
            }
        }
    }
}

fn validate_reference_file(
    name: &str,
    reference_file: &str,
    reference_field: &str,
    base_dir: &Path,
    issues: &mut Vec<ConfigIssue>,
) {
    let path = base_dir.join(reference_file);
    if !path.exists() {
        issues.push(ConfigIssue::for_field(
            name,
            format!("reference file not found: {}", path.display()),
        ));
        return;
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            issues.push(ConfigIssue::for_field(
                name,
                format!("error reading reference file {}: {err}", path.display()),
            ));
            return;
        }
    };

    let pool: Vec<serde_json::Map<String, serde_json::Value>> =
        match serde_json::from_str(&contents) {
            Ok(pool) => pool,
            Err(err) => {
                issues.push(ConfigIssue::for_field(
                    name,
                    format!("reference file is not a JSON array of objects: {err}"),
                ));
                return;
            }
        };

    match pool.first() {
        None => {
            issues.push(ConfigIssue::for_field(name, "reference pool is empty"));
        }
        Some(entry) if !entry.contains_key(reference_field) => {
            issues.push(ConfigIssue::for_field(
                name,
                format!("reference_field '{reference_field}' not found in {reference_file}"),
            ));
        }
        Some(_) => {}
    }
}

fn placeholders(pattern: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let inner = &rest[open + 1..open + close];
        if !inner.is_empty() {
            names.push(inner.to_string());
        }
        rest = &rest[open + close + 1..];
    }
    names
}
