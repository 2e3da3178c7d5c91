use super::types::ProjectionPoint;

/// Compounds `principal` once per year. Year 0 is not part of the output.
pub fn project(principal: f64, annual_return_pct: f64, years: u32) -> Vec<ProjectionPoint> {
    let growth = 1.0 + annual_return_pct / 100.0;
    let mut value = principal;
    (1..=years)
        .map(|year| {
            value *= growth;
            ProjectionPoint { year, value }
        })
        .collect()
}

/// Monthly rate equivalent to an annual percentage return. Losses of 100%
/// or more collapse to a full monthly loss instead of a NaN rate.
pub fn monthly_rate(annual_return_pct: f64) -> f64 {
    let annual_growth = (1.0 + annual_return_pct / 100.0).max(0.0);
    annual_growth.powf(1.0 / 12.0) - 1.0
}
