use std::collections::HashMap;

use rand::{Rng, RngCore};
use rand_distr::Normal;

use crate::model::TrendOptions;
use crate::record::{FieldValue, Record, round_dp};

/// Identity of one logical resource whose metrics evolve across records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub account_id: Option<String>,
    pub service: Option<String>,
    pub resource_id: Option<String>,
}

impl EntityKey {
    pub fn from_record(record: &Record) -> Self {
        let part = |name: &str| {
            record
                .get(name)
                .filter(|value| !value.is_null())
                .map(FieldValue::render)
        };
        Self {
            account_id: part("account_id"),
            service: part("service"),
            resource_id: part("resource_id"),
        }
    }
}

/// Last-emitted values of the trended metrics for one entity key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendState {
    pub usage_quantity: Option<f64>,
    pub cost: Option<f64>,
}

/// Metric being trended; `cost` gets the spend multiplier and 2-decimal
/// rounding, `usage_quantity` keeps full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendedMetric {
    UsageQuantity,
    Cost,
}

/// Per-run mapping from entity key to trend state. Created on first sight of
/// a key, updated after every record for that key, never deleted for the
/// lifetime of the run.
#[derive(Debug, Default)]
pub struct ContinuityStore {
    states: HashMap<EntityKey, TrendState>,
}

impl ContinuityStore {
    pub fn get(&self, key: &EntityKey) -> Option<TrendState> {
        self.states.get(key).copied()
    }

    pub fn update(&mut self, key: &EntityKey, usage_quantity: Option<f64>, cost: Option<f64>) {
        let state = self.states.entry(key.clone()).or_default();
        if usage_quantity.is_some() {
            state.usage_quantity = usage_quantity;
        }
        if cost.is_some() {
            state.cost = cost;
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Drift + noise + occasional multiplicative spike over a prior value.
#[derive(Debug, Clone, Copy)]
pub struct TrendModel {
    options: TrendOptions,
}

impl TrendModel {
    pub fn new(options: TrendOptions) -> Self {
        Self { options }
    }

    /// Warm-state successor: `max(0, v + N(drift(v), 0.05·v))`, or `v ×
    /// spike_factor` with the configured probability. Never negative.
    pub fn successor(&self, prior: f64, metric: TrendedMetric, rng: &mut dyn RngCore) -> f64 {
        let opts = &self.options;

        if opts.spike_probability > 0.0 && rng.random_bool(opts.spike_probability.clamp(0.0, 1.0)) {
            let factor = rng.random_range(opts.spike_min..=opts.spike_max);
            return self.finish(prior * factor, metric);
        }

        let drift = opts.drift_rate * prior;
        let sigma = if prior == 0.0 { 1.0 } else { 0.05 * prior };
        let step = match Normal::new(drift, sigma) {
            Ok(noise) => rng.sample(noise),
            Err(_) => drift,
        };
        self.finish(prior + step, metric)
    }

    fn finish(&self, value: f64, metric: TrendedMetric) -> f64 {
        let value = value.max(0.0);
        match metric {
            TrendedMetric::UsageQuantity => value,
            TrendedMetric::Cost => round_dp(value * self.options.spend_multiplier, 2),
        }
    }
}
