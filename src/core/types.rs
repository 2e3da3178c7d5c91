use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that allocations add up to 100%.
pub const ALLOCATION_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocationEntry {
    pub name: String,
    #[serde(default)]
    pub allocation: f64,
    #[serde(default)]
    pub expected_return: f64,
    #[serde(default)]
    pub risk: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl AssetAllocationEntry {
    pub fn new(name: impl Into<String>, allocation: f64, expected_return: f64, risk: f64) -> Self {
        Self {
            name: name.into(),
            allocation,
            expected_return,
            risk,
            color: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Unknown tiers resolve to `Moderate`.
    pub fn from_tier(tier: &str) -> Self {
        match tier.trim().to_ascii_lowercase().as_str() {
            "conservative" => RiskProfile::Conservative,
            "aggressive" => RiskProfile::Aggressive,
            "moderate" => RiskProfile::Moderate,
            other => {
                tracing::debug!(tier = other, "unknown risk tier, using moderate");
                RiskProfile::Moderate
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthTrend {
    Expansion,
    Contraction,
    #[serde(other)]
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSnapshot {
    pub inflation_rate_trailing_12m: f64,
    pub gdp_annual_forecast: f64,
    pub gdp_last_quarter: f64,
    pub policy_rate_current: f64,
    pub currency_variation_pct: f64,
    pub growth_trend_indicator: GrowthTrend,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioTag {
    Stagflation,
    HighInflation,
    CurrencyCrisis,
    BullMarket,
    BearMarket,
    LowInterest,
    Recovery,
    Baseline,
}

impl ScenarioTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioTag::Stagflation => "stagflation",
            ScenarioTag::HighInflation => "high-inflation",
            ScenarioTag::CurrencyCrisis => "currency-crisis",
            ScenarioTag::BullMarket => "bull-market",
            ScenarioTag::BearMarket => "bear-market",
            ScenarioTag::LowInterest => "low-interest",
            ScenarioTag::Recovery => "recovery",
            ScenarioTag::Baseline => "baseline",
        }
    }

    /// Headline used by narrative/report collaborators.
    pub fn label(self) -> &'static str {
        match self {
            ScenarioTag::Stagflation => "Stagflation: high inflation with weak growth",
            ScenarioTag::HighInflation => "High inflation",
            ScenarioTag::CurrencyCrisis => "Currency stress under tight monetary policy",
            ScenarioTag::BullMarket => "Strong growth and expansion",
            ScenarioTag::BearMarket => "Slowdown or contraction",
            ScenarioTag::LowInterest => "Low interest rates",
            ScenarioTag::Recovery => "Economic recovery",
            ScenarioTag::Baseline => "Baseline conditions",
        }
    }
}

impl fmt::Display for ScenarioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub value: f64,
}

/// Non-fatal allocation state surfaced to the user. An invalid state blocks
/// submission downstream but never stops metrics or projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationValidation {
    pub total: f64,
    pub difference: f64,
    pub is_valid: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GoalHorizon {
    #[serde(rename_all = "camelCase")]
    Reached { months: u32, years: f64 },
    Unreachable,
}

impl GoalHorizon {
    pub fn reached(months: u32) -> Self {
        GoalHorizon::Reached {
            months,
            years: months as f64 / 12.0,
        }
    }

    pub fn months(self) -> Option<u32> {
        match self {
            GoalHorizon::Reached { months, .. } => Some(months),
            GoalHorizon::Unreachable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionRequest {
    pub principal: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioEvaluation {
    pub entries: Vec<AssetAllocationEntry>,
    pub validation: AllocationValidation,
    pub metrics: PortfolioMetrics,
    pub projection: Vec<ProjectionPoint>,
}
