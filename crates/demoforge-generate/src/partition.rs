use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::record::Record;

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_DATE: &str = "%Y-%m-%d";

/// Build a hive-style partition path from the configured partition fields.
///
/// Date- or datetime-shaped values expand into `year=YYYY/month=MM/day=DD`
/// segments; anything else becomes a literal `field=value` segment. Missing
/// and null fields are skipped. Non-empty paths carry a trailing `/`.
pub fn build_partition_path(record: &Record, fields: &[String]) -> String {
    let mut parts = Vec::new();

    for field in fields {
        let Some(value) = record.get(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        match value.as_str().and_then(parse_partition_date) {
            Some(date) => {
                parts.push(format!("year={}", date.year()));
                parts.push(format!("month={:02}", date.month()));
                parts.push(format!("day={:02}", date.day()));
            }
            None => parts.push(format!("{field}={}", value.render())),
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}/", parts.join("/"))
    }
}

fn parse_partition_date(text: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(text, ISO_DATETIME)
        .ok()
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(text, ISO_DATE).ok())
}
