use super::types::{GrowthTrend, MacroSnapshot, ScenarioTag};

struct ScenarioRule {
    tag: ScenarioTag,
    applies: fn(&MacroSnapshot) -> bool,
}

// Evaluated top to bottom; the first match wins.
const SCENARIO_RULES: [ScenarioRule; 7] = [
    ScenarioRule {
        tag: ScenarioTag::Stagflation,
        applies: is_stagflation,
    },
    ScenarioRule {
        tag: ScenarioTag::HighInflation,
        applies: is_high_inflation,
    },
    ScenarioRule {
        tag: ScenarioTag::CurrencyCrisis,
        applies: is_currency_crisis,
    },
    ScenarioRule {
        tag: ScenarioTag::BullMarket,
        applies: is_bull_market,
    },
    ScenarioRule {
        tag: ScenarioTag::BearMarket,
        applies: is_bear_market,
    },
    ScenarioRule {
        tag: ScenarioTag::LowInterest,
        applies: is_low_interest,
    },
    ScenarioRule {
        tag: ScenarioTag::Recovery,
        applies: is_recovery,
    },
];

/// Maps a macro snapshot to a market scenario. A missing snapshot is
/// classified as `Baseline`.
pub fn classify(snapshot: Option<&MacroSnapshot>) -> ScenarioTag {
    let Some(snapshot) = snapshot else {
        tracing::debug!("no macro snapshot available, using baseline scenario");
        return ScenarioTag::Baseline;
    };

    SCENARIO_RULES
        .iter()
        .find(|rule| (rule.applies)(snapshot))
        .map(|rule| rule.tag)
        .unwrap_or(ScenarioTag::Baseline)
}

fn is_stagflation(s: &MacroSnapshot) -> bool {
    s.inflation_rate_trailing_12m > 7.0 && s.gdp_annual_forecast < 1.5
}

fn is_high_inflation(s: &MacroSnapshot) -> bool {
    s.inflation_rate_trailing_12m > 6.0
}

fn is_currency_crisis(s: &MacroSnapshot) -> bool {
    s.policy_rate_current > 13.0 && s.currency_variation_pct > 10.0
}

fn is_bull_market(s: &MacroSnapshot) -> bool {
    s.gdp_annual_forecast > 3.0 && s.growth_trend_indicator == GrowthTrend::Expansion
}

fn is_bear_market(s: &MacroSnapshot) -> bool {
    s.gdp_annual_forecast < 0.8 || s.growth_trend_indicator == GrowthTrend::Contraction
}

fn is_low_interest(s: &MacroSnapshot) -> bool {
    s.policy_rate_current < 7.0
}

fn is_recovery(s: &MacroSnapshot) -> bool {
    s.growth_trend_indicator == GrowthTrend::Expansion && s.gdp_last_quarter > 0.8
}
