use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use demoforge_generate::TrendOptions;
use demoforge_generate::continuity::{ContinuityStore, EntityKey, TrendModel, TrendedMetric};

fn options(drift_rate: f64, spike_probability: f64) -> TrendOptions {
    TrendOptions {
        drift_rate,
        spike_probability,
        ..TrendOptions::default()
    }
}

#[test]
fn successor_mean_step_approximates_drift() {
    let model = TrendModel::new(options(0.005, 0.0));
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let prior = 100.0;
    let trials = 50_000;

    let mut total_step = 0.0;
    for _ in 0..trials {
        total_step += model.successor(prior, TrendedMetric::UsageQuantity, &mut rng) - prior;
    }
    let mean_step = total_step / trials as f64;

    // drift(100) = 0.5; sigma = 5, so the sample mean sits well inside 0.15.
    assert!(
        (mean_step - 0.5).abs() < 0.15,
        "mean step {mean_step} should approximate drift 0.5"
    );
}

#[test]
fn successors_never_go_negative() {
    let model = TrendModel::new(options(-0.5, 0.0));
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut value = 5.0;
    for _ in 0..1_000 {
        value = model.successor(value, TrendedMetric::UsageQuantity, &mut rng);
        assert!(value >= 0.0, "trended value {value} went negative");
    }
}

#[test]
fn zero_prior_uses_unit_sigma_and_stays_floored() {
    let model = TrendModel::new(options(0.0, 0.0));
    let mut rng = ChaCha8Rng::seed_from_u64(13);

    let mut moved = false;
    for _ in 0..100 {
        let next = model.successor(0.0, TrendedMetric::UsageQuantity, &mut rng);
        assert!(next >= 0.0);
        if next > 0.0 {
            moved = true;
        }
    }
    // With sigma 1.0 around drift 0, roughly half the draws are positive.
    assert!(moved, "zero prior should still produce positive successors");
}

#[test]
fn cost_successor_applies_spend_multiplier_and_rounds() {
    let model = TrendModel::new(TrendOptions {
        drift_rate: 0.005,
        spike_probability: 0.0,
        spend_multiplier: 2.0,
        ..TrendOptions::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    for _ in 0..200 {
        let cost = model.successor(40.0, TrendedMetric::Cost, &mut rng);
        let cents = cost * 100.0;
        assert!(
            (cents - cents.round()).abs() < 1e-9,
            "cost {cost} should be rounded to 2 decimals"
        );
        // Multiplier 2 pushes the additive step's neighborhood around 80.
        assert!(cost > 50.0 && cost < 110.0, "cost {cost} out of range");
    }
}

#[test]
fn forced_spike_multiplies_the_prior() {
    let model = TrendModel::new(TrendOptions {
        drift_rate: 0.005,
        spike_probability: 1.0,
        spike_min: 3.0,
        spike_max: 3.0,
        spend_multiplier: 1.0,
    });
    let mut rng = ChaCha8Rng::seed_from_u64(19);

    let usage = model.successor(10.0, TrendedMetric::UsageQuantity, &mut rng);
    assert_eq!(usage, 30.0);

    let cost = model.successor(10.0, TrendedMetric::Cost, &mut rng);
    assert_eq!(cost, 30.0);
}

#[test]
fn store_tracks_entity_keys_independently() {
    let mut store = ContinuityStore::default();
    let key_a = EntityKey {
        account_id: Some("acct-1".to_string()),
        service: Some("EC2".to_string()),
        resource_id: Some("i-1".to_string()),
    };
    let key_b = EntityKey {
        resource_id: Some("i-2".to_string()),
        ..key_a.clone()
    };

    assert!(store.get(&key_a).is_none());

    store.update(&key_a, Some(10.0), Some(1.2));
    store.update(&key_b, Some(99.0), None);

    let state_a = store.get(&key_a).expect("state for key_a");
    assert_eq!(state_a.usage_quantity, Some(10.0));
    assert_eq!(state_a.cost, Some(1.2));

    let state_b = store.get(&key_b).expect("state for key_b");
    assert_eq!(state_b.usage_quantity, Some(99.0));
    assert_eq!(state_b.cost, None);

    // A later record for key_a replaces the tracked values.
    store.update(&key_a, Some(11.0), Some(1.3));
    let state_a = store.get(&key_a).expect("state for key_a");
    assert_eq!(state_a.usage_quantity, Some(11.0));
    assert_eq!(state_a.cost, Some(1.3));
    assert_eq!(store.len(), 2);
}
