use std::collections::HashMap;

use rand::RngCore;
use tracing::warn;

use demoforge_core::PatternField;

use super::{Evaluate, EvalContext, evaluate_field};
use crate::errors::GenerationError;
use crate::record::FieldValue;

/// Template string assembled from recursively evaluated components.
///
/// Component evaluation errors (missing pools, bad config) stay fatal;
/// formatting failures — a component that resolved to null, a placeholder
/// without a component, an unclosed brace — resolve the field to null.
pub struct PatternEvaluator<'a> {
    pub name: &'a str,
    pub params: &'a PatternField,
}

impl Evaluate for PatternEvaluator<'_> {
    fn evaluate(
        &self,
        ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let mut components = HashMap::new();
        for (component, spec) in &self.params.components {
            let component_name = format!("{}.{}", self.name, component);
            let value = evaluate_field(&component_name, spec, ctx, rng)?;
            if value.is_null() {
                warn!(
                    field = self.name,
                    component = component.as_str(),
                    "pattern component resolved to null"
                );
                return Ok(FieldValue::Null);
            }
            components.insert(component.as_str(), value.render());
        }

        match fill_template(&self.params.pattern, &components) {
            Some(text) => Ok(FieldValue::Text(text)),
            None => {
                warn!(field = self.name, pattern = self.params.pattern.as_str(), "pattern formatting failed");
                Ok(FieldValue::Null)
            }
        }
    }
}

/// Substitute `{component}` placeholders; `None` on any malformed template
/// or missing component.
fn fill_template(pattern: &str, components: &HashMap<&str, String>) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let close = after_open.find('}')?;
        let placeholder = &after_open[..close];
        if placeholder.is_empty() {
            return None;
        }
        out.push_str(components.get(placeholder)?);
        rest = &after_open[close + 1..];
    }

    if rest.contains('}') {
        return None;
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::fill_template;
    use std::collections::HashMap;

    #[test]
    fn fills_placeholders_in_order() {
        let mut components = HashMap::new();
        components.insert("a", "one".to_string());
        components.insert("b", "2".to_string());
        assert_eq!(
            fill_template("{a}-{b}/{a}", &components),
            Some("one-2/one".to_string())
        );
    }

    #[test]
    fn rejects_missing_component_and_stray_braces() {
        let components = HashMap::new();
        assert_eq!(fill_template("{missing}", &components), None);
        assert_eq!(fill_template("un{closed", &components), None);
        assert_eq!(fill_template("stray}brace", &components), None);
        assert_eq!(fill_template("{}", &components), None);
    }

    #[test]
    fn passes_through_literal_patterns() {
        let components = HashMap::new();
        assert_eq!(
            fill_template("plain-text", &components),
            Some("plain-text".to_string())
        );
    }
}
