use rand::{Rng, RngCore};

use demoforge_core::NumericField;

use super::{Evaluate, EvalContext};
use crate::catalog::{DomainProfile, aws, saas};
use crate::errors::GenerationError;
use crate::record::{FieldValue, Record, round_dp};

const DEFAULT_MIN: f64 = 0.0;
const DEFAULT_MAX: f64 = 100.0;

/// Uniform draw within [min, max] with optional `by_service` bound
/// overrides and a domain multiplier. Integers multiply the drawn bound
/// value and truncate; floats are rounded to 2 decimals after multiplying.
pub struct NumericEvaluator<'a> {
    pub name: &'a str,
    pub params: &'a NumericField,
    pub integer: bool,
}

impl Evaluate for NumericEvaluator<'_> {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let (min, max) = self.bounds(ctx.record);
        if min > max {
            return Err(GenerationError::InvalidConfig(format!(
                "field '{}': min {min} is greater than max {max}",
                self.name
            )));
        }

        let multiplier = domain_multiplier(self.name, ctx.profile, ctx.record);

        if self.integer {
            let drawn = rng.random_range(min.trunc() as i64..=max.trunc() as i64);
            Ok(FieldValue::Int((drawn as f64 * multiplier).trunc() as i64))
        } else {
            let drawn = rng.random_range(min..=max);
            Ok(FieldValue::Float(round_dp(drawn * multiplier, 2)))
        }
    }
}

impl NumericEvaluator<'_> {
    fn bounds(&self, record: &Record) -> (f64, f64) {
        let mut min = self.params.min.unwrap_or(DEFAULT_MIN);
        let mut max = self.params.max.unwrap_or(DEFAULT_MAX);

        if let Some(by_service) = &self.params.by_service
            && let Some(service) = record.get("service").and_then(FieldValue::as_str)
            && let Some(bounds) = by_service.get(service)
        {
            if let Some(override_min) = bounds.min {
                min = override_min;
            }
            if let Some(override_max) = bounds.max {
                max = override_max;
            }
        }

        (min, max)
    }
}

/// Multiplier applied after the uniform draw. Cloud profile scales the
/// canonical `usage_quantity` by service; SaaS profile scales monetary
/// fields by plan (or industry) and usage fields by plan.
fn domain_multiplier(name: &str, profile: DomainProfile, record: &Record) -> f64 {
    match profile {
        DomainProfile::CloudBilling => {
            if name != "usage_quantity" {
                return 1.0;
            }
            record
                .get("service")
                .and_then(FieldValue::as_str)
                .and_then(aws::usage_multiplier)
                .unwrap_or(1.0)
        }
        DomainProfile::Saas => {
            let plan = record.get("plan").and_then(FieldValue::as_str);
            let industry = record.get("industry").and_then(FieldValue::as_str);
            if is_monetary_field(name) {
                plan.and_then(saas::plan_revenue_multiplier)
                    .or_else(|| industry.and_then(saas::industry_revenue_multiplier))
                    .unwrap_or(1.0)
            } else if is_usage_field(name) {
                plan.and_then(saas::plan_usage_multiplier).unwrap_or(1.0)
            } else {
                1.0
            }
        }
        DomainProfile::Neutral => 1.0,
    }
}

fn is_monetary_field(name: &str) -> bool {
    name.contains("revenue") || name.contains("mrr") || name.contains("amount")
}

fn is_usage_field(name: &str) -> bool {
    name.contains("usage") || name.contains("events")
}
