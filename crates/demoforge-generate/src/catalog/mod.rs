//! Static service knowledge base backing the domain couplings.

pub mod aws;
pub mod saas;

use std::collections::BTreeMap;

/// Domain profile resolved from the config's `context.domain` key. The
/// profile gates the cloud-billing couplings (service-keyed regions, usage
/// types, resource ids, usage multipliers) and the SaaS plan/industry
/// multipliers; a neutral profile leaves every field exactly as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainProfile {
    CloudBilling,
    Saas,
    Neutral,
}

impl DomainProfile {
    pub fn from_context(context: &BTreeMap<String, serde_json::Value>) -> Self {
        match context.get("domain").and_then(|value| value.as_str()) {
            Some("aws" | "aws_billing" | "cloud" | "cloud_billing") => DomainProfile::CloudBilling,
            Some("saas" | "subscription" | "crm") => DomainProfile::Saas,
            _ => DomainProfile::Neutral,
        }
    }
}
