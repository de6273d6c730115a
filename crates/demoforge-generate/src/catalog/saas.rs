//! SaaS subscription and lead-generation multipliers, aligned with public
//! SaaS benchmark breakdowns.

/// Revenue multiplier per subscription plan, relative to Basic.
pub fn plan_revenue_multiplier(plan: &str) -> Option<f64> {
    let multiplier = match plan {
        "Free" => 0.01,
        "Basic" => 1.0,
        "Pro" => 3.0,
        "Enterprise" => 10.0,
        _ => return None,
    };
    Some(multiplier)
}

/// Usage-event multiplier per subscription plan; paid plans use more.
pub fn plan_usage_multiplier(plan: &str) -> Option<f64> {
    let multiplier = match plan {
        "Free" => 0.5,
        "Basic" => 1.0,
        "Pro" => 2.0,
        "Enterprise" => 3.0,
        _ => return None,
    };
    Some(multiplier)
}

/// Annual-revenue scaling by industry for lead-generation datasets.
pub fn industry_revenue_multiplier(industry: &str) -> Option<f64> {
    let multiplier = match industry {
        "Consumer Electronics" => 1.2,
        "Automotive" => 1.5,
        "Food & Beverage" => 0.8,
        "Toys" => 0.6,
        "Medical Devices" => 1.3,
        "Apparel" => 0.7,
        "Home Goods" => 0.9,
        "Industrial Equipment" => 1.1,
        _ => return None,
    };
    Some(multiplier)
}

/// Close rate per engagement status, surfaced to formulas as the derived
/// `close_rate` binding.
pub fn close_rate(engagement_status: &str) -> Option<f64> {
    let rate = match engagement_status {
        "Not Contacted" => 0.0,
        "Attempted" => 0.01,
        "Engaged" => 0.05,
        "Demo Scheduled" => 0.15,
        "Closed Won" => 1.0,
        "Closed Lost" => 0.0,
        _ => return None,
    };
    Some(rate)
}
