use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use rand::RngCore;

use demoforge_core::ChoiceField;

use super::{Evaluate, EvalContext};
use crate::catalog::{DomainProfile, aws};
use crate::errors::GenerationError;
use crate::record::{FieldValue, Record};

/// Selection from an explicit value list, optionally weighted, with two
/// specialization hooks: value lists conditioned on the record's `company`,
/// and the cloud-billing coupling that keys `region`, `usage_type` and
/// `resource_id` candidates on the already-resolved `service`.
pub struct ChoiceEvaluator<'a> {
    pub name: &'a str,
    pub params: &'a ChoiceField,
}

impl Evaluate for ChoiceEvaluator<'_> {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        if ctx.profile == DomainProfile::CloudBilling
            && let Some(value) = coupled_value(self.name, ctx.record, rng)
        {
            return Ok(value);
        }

        if let Some(by_company) = &self.params.values_by_company
            && let Some(company) = ctx.record.get("company").and_then(FieldValue::as_str)
        {
            let values = by_company.get(company).ok_or_else(|| {
                GenerationError::InvalidConfig(format!(
                    "field '{}' has no values_by_company entry for '{company}'",
                    self.name
                ))
            })?;
            return pick_uniform(self.name, values, rng);
        }

        match &self.params.weights {
            Some(weights) => {
                if weights.len() != self.params.values.len() {
                    return Err(GenerationError::InvalidConfig(format!(
                        "field '{}': weights length {} does not match values length {}",
                        self.name,
                        weights.len(),
                        self.params.values.len()
                    )));
                }
                let dist = WeightedIndex::new(weights).map_err(|err| {
                    GenerationError::InvalidConfig(format!(
                        "field '{}': invalid weights: {err}",
                        self.name
                    ))
                })?;
                let index = dist.sample(rng);
                Ok(FieldValue::from_json(&self.params.values[index]))
            }
            None => pick_uniform(self.name, &self.params.values, rng),
        }
    }
}

/// Cloud-billing coupling. `service` draws uniformly from the catalog; the
/// dependent fields draw from the tables keyed by the record's `service`.
/// Falls through to the configured list when the service is missing or has
/// no table entry.
fn coupled_value(name: &str, record: &Record, rng: &mut dyn RngCore) -> Option<FieldValue> {
    match name {
        "service" => aws::SERVICES
            .choose(rng)
            .map(|service| FieldValue::Text(service.to_string())),
        "region" => {
            let service = record.get("service")?.as_str()?;
            aws::regions(service)?
                .choose(rng)
                .map(|region| FieldValue::Text(region.to_string()))
        }
        "usage_type" => {
            let service = record.get("service")?.as_str()?;
            aws::usage_types(service)?
                .choose(rng)
                .map(|usage_type| FieldValue::Text(usage_type.to_string()))
        }
        "resource_id" => {
            let service = record.get("service")?.as_str()?;
            aws::resource_id(service, rng).map(FieldValue::Text)
        }
        _ => None,
    }
}

fn pick_uniform(
    name: &str,
    values: &[serde_json::Value],
    rng: &mut dyn RngCore,
) -> Result<FieldValue, GenerationError> {
    values
        .choose(rng)
        .map(FieldValue::from_json)
        .ok_or_else(|| GenerationError::InvalidConfig(format!("field '{name}' has no values")))
}
