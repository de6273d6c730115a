use rand::RngCore;

use demoforge_core::ReferenceField;

use super::{Evaluate, EvalContext};
use crate::errors::GenerationError;
use crate::record::FieldValue;

/// Draw the named attribute from an external value pool. Pool loading,
/// caching and exhaustion live in [`crate::pools`]; this unit only shapes
/// the drawn JSON scalar into a field value.
pub struct ReferenceEvaluator<'a> {
    pub params: &'a ReferenceField,
}

impl Evaluate for ReferenceEvaluator<'_> {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let value = ctx.pools.draw(
            &self.params.reference_file,
            &self.params.reference_field,
            self.params.unique,
            rng,
        )?;
        Ok(FieldValue::from_json(&value))
    }
}
