use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::{Rng, RngCore};

use demoforge_core::DatetimeField;

use super::{Evaluate, EvalContext};
use crate::errors::GenerationError;
use crate::record::FieldValue;

const DEFAULT_MIN: &str = "2024-01-01T00:00:00";
const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Uniform random instant between two datetime bounds.
pub struct DatetimeEvaluator<'a> {
    pub params: &'a DatetimeField,
}

impl Evaluate for DatetimeEvaluator<'_> {
    fn evaluate(
        &self,
        _ctx: &mut EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let min_raw = self.params.min.as_deref().unwrap_or(DEFAULT_MIN);
        let min = parse_bound(min_raw).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("invalid datetime min bound '{min_raw}'"))
        })?;

        let max = match self.params.max.as_deref() {
            None | Some("dynamic") => end_of_current_month(),
            Some(raw) => parse_bound(raw).ok_or_else(|| {
                GenerationError::InvalidConfig(format!("invalid datetime max bound '{raw}'"))
            })?,
        };

        if max < min {
            return Err(GenerationError::InvalidConfig(format!(
                "datetime max bound '{max}' is before min bound '{min}'"
            )));
        }

        let span_seconds = (max - min).num_seconds();
        let offset = rng.random_range(0..=span_seconds);
        let instant = min + Duration::seconds(offset);

        let format = self.params.format.as_deref().unwrap_or(ISO_DATETIME);
        Ok(FieldValue::Text(instant.format(format).to_string()))
    }
}

/// Parse an ISO datetime bound; strings longer than 19 chars are truncated
/// to the ISO prefix first (sub-second and zone suffixes are dropped).
fn parse_bound(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, ISO_DATETIME)
        .ok()
        .or_else(|| {
            let prefix = raw.get(..19)?;
            NaiveDateTime::parse_from_str(prefix, ISO_DATETIME).ok()
        })
}

/// Last second of the current calendar month, the dynamic upper bound.
pub(crate) fn end_of_current_month() -> NaiveDateTime {
    let now = chrono::Utc::now().naive_utc();
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| now.date())
        .and_hms_opt(0, 0, 0)
        .unwrap_or(now);
    first_of_next - Duration::seconds(1)
}
