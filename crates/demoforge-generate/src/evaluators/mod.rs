//! Field evaluators, one unit per field kind.
//!
//! The `FieldSpec` tagged union selects the evaluator; each unit is a small
//! type over its variant's parameters so it can be exercised in isolation.
//! Evaluators see the partially-built record, the config context, and the
//! reference pools through [`EvalContext`].

mod choice;
mod date;
mod datetime;
mod faker;
mod numeric;
mod pattern;
mod reference;

pub use choice::ChoiceEvaluator;
pub use date::DateEvaluator;
pub use datetime::DatetimeEvaluator;
pub use faker::FakerEvaluator;
pub use numeric::NumericEvaluator;
pub use pattern::PatternEvaluator;
pub use reference::ReferenceEvaluator;

use std::collections::BTreeMap;

use rand::RngCore;

use demoforge_core::FieldSpec;

use crate::catalog::DomainProfile;
use crate::errors::GenerationError;
use crate::formula::evaluate_formula;
use crate::pools::ReferencePools;
use crate::record::{FieldValue, Record};

/// Evaluation surroundings for one field of one record.
pub struct EvalContext<'a> {
    pub profile: DomainProfile,
    pub context: &'a BTreeMap<String, serde_json::Value>,
    pub record: &'a Record,
    pub pools: &'a mut ReferencePools,
}

/// Capability interface implemented by every evaluator unit.
pub trait Evaluate {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError>;
}

/// Dispatch one field definition to its evaluator.
pub fn evaluate_field(
    name: &str,
    spec: &FieldSpec,
    ctx: &mut EvalContext<'_>,
    rng: &mut dyn RngCore,
) -> Result<FieldValue, GenerationError> {
    match spec {
        FieldSpec::Datetime(params) => DatetimeEvaluator { params }.evaluate(ctx, rng),
        FieldSpec::Date(params) => DateEvaluator { params }.evaluate(ctx, rng),
        FieldSpec::Reference(params) => ReferenceEvaluator { params }.evaluate(ctx, rng),
        FieldSpec::Faker(params) => FakerEvaluator { params }.evaluate(ctx, rng),
        FieldSpec::String(params) => PatternEvaluator { name, params }.evaluate(ctx, rng),
        FieldSpec::Choice(params) => ChoiceEvaluator { name, params }.evaluate(ctx, rng),
        FieldSpec::Int(params) => NumericEvaluator {
            name,
            params,
            integer: true,
        }
        .evaluate(ctx, rng),
        FieldSpec::Float(params) => NumericEvaluator {
            name,
            params,
            integer: false,
        }
        .evaluate(ctx, rng),
        FieldSpec::Formula(params) => Ok(evaluate_formula(name, params, ctx.record)),
    }
}
