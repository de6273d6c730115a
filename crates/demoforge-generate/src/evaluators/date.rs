use chrono::{Duration, NaiveDate};
use rand::{Rng, RngCore};

use demoforge_core::DateField;

use super::datetime::end_of_current_month;
use super::{Evaluate, EvalContext};
use crate::errors::GenerationError;
use crate::record::FieldValue;

const DEFAULT_START: &str = "2024-01-01";
const ISO_DATE: &str = "%Y-%m-%d";

/// Uniform random calendar day, optionally carrying a random time-of-day.
pub struct DateEvaluator<'a> {
    pub params: &'a DateField,
}

impl Evaluate for DateEvaluator<'_> {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let start_raw = self.params.start.as_deref().unwrap_or(DEFAULT_START);
        let start = parse_day(start_raw).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("invalid date start bound '{start_raw}'"))
        })?;

        let end = match self.params.end.as_deref() {
            None | Some("dynamic") => end_of_current_month().date(),
            Some(raw) => parse_day(raw).ok_or_else(|| {
                GenerationError::InvalidConfig(format!("invalid date end bound '{raw}'"))
            })?,
        };

        if end < start {
            return Err(GenerationError::InvalidConfig(format!(
                "date end bound '{end}' is before start bound '{start}'"
            )));
        }

        let span_days = (end - start).num_days();
        let day = start + Duration::days(rng.random_range(0..=span_days));

        match self.params.time_format.as_deref() {
            Some(time_format) => {
                let instant = day
                    .and_hms_opt(
                        rng.random_range(0..24),
                        rng.random_range(0..60),
                        rng.random_range(0..60),
                    )
                    .unwrap_or_else(|| day.and_hms_opt(0, 0, 0).unwrap_or_default());
                Ok(FieldValue::Text(instant.format(time_format).to_string()))
            }
            None => Ok(FieldValue::Text(day.format(ISO_DATE).to_string())),
        }
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, ISO_DATE)
        .ok()
        .or_else(|| {
            let prefix = raw.get(..10)?;
            NaiveDate::parse_from_str(prefix, ISO_DATE).ok()
        })
}
