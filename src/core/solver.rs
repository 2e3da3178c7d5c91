use super::projection::monthly_rate;
use super::types::GoalHorizon;

/// Longest goal horizon either solver accepts (100 years).
pub const MAX_GOAL_MONTHS: u32 = 1200;

/// Level end-of-month deposit that grows `principal` into `target_amount`
/// after `years`. `None` when there is no time left to contribute and the
/// principal alone falls short, or when the horizon exceeds
/// [`MAX_GOAL_MONTHS`].
pub fn required_monthly_contribution(
    principal: f64,
    annual_return_pct: f64,
    years: u32,
    target_amount: f64,
) -> Option<f64> {
    let months = years.saturating_mul(12);
    if months > MAX_GOAL_MONTHS {
        tracing::debug!(years, max_months = MAX_GOAL_MONTHS, "goal horizon beyond cap");
        return None;
    }
    let rate = monthly_rate(annual_return_pct);
    let growth = (1.0 + rate).powf(months as f64);
    let principal_future = principal * growth;

    if principal_future >= target_amount {
        return Some(0.0);
    }
    if months == 0 {
        tracing::debug!(principal, target_amount, "no contribution window left");
        return None;
    }

    let shortfall = target_amount - principal_future;
    if rate.abs() < 1e-15 {
        return Some(shortfall / months as f64);
    }

    Some(shortfall * rate / (growth - 1.0))
}

/// Months until `principal` plus level monthly deposits reaches
/// `target_amount`, or `Unreachable` once the search cap is exhausted.
pub fn time_to_reach_goal(
    principal: f64,
    monthly_contribution: f64,
    annual_return_pct: f64,
    target_amount: f64,
) -> GoalHorizon {
    if principal >= target_amount {
        return GoalHorizon::reached(0);
    }

    let rate = monthly_rate(annual_return_pct);
    let mut value = principal;
    for month in 1..=MAX_GOAL_MONTHS {
        value = value * (1.0 + rate) + monthly_contribution;
        if value >= target_amount {
            return GoalHorizon::reached(month);
        }
    }

    tracing::debug!(
        principal,
        monthly_contribution,
        annual_return_pct,
        target_amount,
        max_months = MAX_GOAL_MONTHS,
        "goal not reached within search cap"
    );
    GoalHorizon::Unreachable
}
