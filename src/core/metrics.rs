use super::types::{AssetAllocationEntry, PortfolioMetrics};

/// Allocation-weighted expected return and risk. Linear in the weights;
/// no covariance between asset classes is modeled.
pub fn aggregate(entries: &[AssetAllocationEntry]) -> PortfolioMetrics {
    entries
        .iter()
        .fold(PortfolioMetrics::default(), |acc, entry| {
            let weight = finite_or_zero(entry.allocation) / 100.0;
            PortfolioMetrics {
                expected_return: acc.expected_return
                    + finite_or_zero(entry.expected_return) * weight,
                risk: acc.risk + finite_or_zero(entry.risk) * weight,
            }
        })
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::template_for;
    use crate::core::types::RiskProfile;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn weighted_expected_return() {
        let entries = vec![
            AssetAllocationEntry::new("equities", 60.0, 10.0, 0.0),
            AssetAllocationEntry::new("bonds", 40.0, 5.0, 0.0),
        ];
        assert_approx(aggregate(&entries).expected_return, 8.0);
    }

    #[test]
    fn weighted_risk() {
        let entries = vec![
            AssetAllocationEntry::new("equities", 25.0, 0.0, 20.0),
            AssetAllocationEntry::new("bonds", 75.0, 0.0, 4.0),
        ];
        assert_approx(aggregate(&entries).risk, 8.0);
    }

    #[test]
    fn empty_portfolio_is_zero() {
        assert_eq!(aggregate(&[]), PortfolioMetrics::default());
    }

    #[test]
    fn missing_figures_contribute_nothing() {
        let entries: Vec<AssetAllocationEntry> = serde_json::from_str(
            r#"[
              {"name": "cash", "allocation": 50},
              {"name": "stocks", "allocation": 50, "expectedReturn": 12, "risk": 18}
            ]"#,
        )
        .expect("entries should parse");

        let metrics = aggregate(&entries);
        assert_approx(metrics.expected_return, 6.0);
        assert_approx(metrics.risk, 9.0);
    }

    #[test]
    fn non_finite_figures_contribute_nothing() {
        let entries = vec![
            AssetAllocationEntry::new("broken", 50.0, f64::NAN, f64::INFINITY),
            AssetAllocationEntry::new("bonds", 50.0, 6.0, 2.0),
        ];
        let metrics = aggregate(&entries);
        assert_approx(metrics.expected_return, 3.0);
        assert_approx(metrics.risk, 1.0);
    }

    #[test]
    fn out_of_balance_allocation_is_still_weighted() {
        let entries = vec![AssetAllocationEntry::new("only", 50.0, 10.0, 10.0)];
        let metrics = aggregate(&entries);
        assert_approx(metrics.expected_return, 5.0);
        assert_approx(metrics.risk, 5.0);
    }

    #[test]
    fn moderate_template_metrics_sit_between_extremes() {
        let conservative = aggregate(&template_for(RiskProfile::Conservative));
        let moderate = aggregate(&template_for(RiskProfile::Moderate));
        let aggressive = aggregate(&template_for(RiskProfile::Aggressive));

        assert!(conservative.risk < moderate.risk && moderate.risk < aggressive.risk);
        assert!(
            conservative.expected_return < moderate.expected_return
                && moderate.expected_return < aggressive.expected_return
        );
    }
}
