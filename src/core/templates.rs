use super::types::{AssetAllocationEntry, RiskProfile};

#[derive(Clone, Copy)]
struct AssetClass {
    name: &'static str,
    expected_return: f64,
    risk: f64,
    color: &'static str,
    description: &'static str,
}

const FLOATING_RATE: AssetClass = AssetClass {
    name: "Floating-Rate Fixed Income",
    expected_return: 11.5,
    risk: 2.0,
    color: "#1f77b4",
    description: "Daily-liquidity instruments tracking the policy rate",
};

const INFLATION_LINKED: AssetClass = AssetClass {
    name: "Inflation-Linked Bonds",
    expected_return: 12.0,
    risk: 5.0,
    color: "#2ca02c",
    description: "Government bonds indexed to consumer inflation",
};

const FIXED_RATE: AssetClass = AssetClass {
    name: "Fixed-Rate Bonds",
    expected_return: 11.0,
    risk: 6.0,
    color: "#17becf",
    description: "Nominal bonds locking in today's yield curve",
};

const MULTIMARKET: AssetClass = AssetClass {
    name: "Multimarket Funds",
    expected_return: 13.0,
    risk: 8.0,
    color: "#9467bd",
    description: "Actively managed funds across asset classes",
};

const REAL_ESTATE: AssetClass = AssetClass {
    name: "Real Estate Funds",
    expected_return: 12.5,
    risk: 10.0,
    color: "#8c564b",
    description: "Listed real estate income funds",
};

const DOMESTIC_EQUITY: AssetClass = AssetClass {
    name: "Domestic Equities",
    expected_return: 15.0,
    risk: 18.0,
    color: "#d62728",
    description: "Broad local stock market exposure",
};

const INTERNATIONAL_EQUITY: AssetClass = AssetClass {
    name: "International Equities",
    expected_return: 14.0,
    risk: 16.0,
    color: "#ff7f0e",
    description: "Global equities with currency exposure",
};

// (asset class, allocation in percent)
static CONSERVATIVE: [(AssetClass, f64); 7] = [
    (FLOATING_RATE, 45.0),
    (INFLATION_LINKED, 25.0),
    (FIXED_RATE, 10.0),
    (MULTIMARKET, 10.0),
    (REAL_ESTATE, 5.0),
    (DOMESTIC_EQUITY, 3.0),
    (INTERNATIONAL_EQUITY, 2.0),
];

static MODERATE: [(AssetClass, f64); 7] = [
    (FLOATING_RATE, 25.0),
    (INFLATION_LINKED, 20.0),
    (FIXED_RATE, 10.0),
    (MULTIMARKET, 15.0),
    (REAL_ESTATE, 10.0),
    (DOMESTIC_EQUITY, 12.0),
    (INTERNATIONAL_EQUITY, 8.0),
];

static AGGRESSIVE: [(AssetClass, f64); 7] = [
    (FLOATING_RATE, 10.0),
    (INFLATION_LINKED, 10.0),
    (FIXED_RATE, 5.0),
    (MULTIMARKET, 15.0),
    (REAL_ESTATE, 10.0),
    (DOMESTIC_EQUITY, 30.0),
    (INTERNATIONAL_EQUITY, 20.0),
];

/// Recommended allocation for a risk tier. Every table sums to exactly 100.
pub fn template_for(profile: RiskProfile) -> Vec<AssetAllocationEntry> {
    let rows: &[(AssetClass, f64)] = match profile {
        RiskProfile::Conservative => &CONSERVATIVE,
        RiskProfile::Moderate => &MODERATE,
        RiskProfile::Aggressive => &AGGRESSIVE,
    };

    rows.iter()
        .map(|(class, allocation)| AssetAllocationEntry {
            name: class.name.to_string(),
            allocation: *allocation,
            expected_return: class.expected_return,
            risk: class.risk,
            color: class.color.to_string(),
            description: class.description.to_string(),
        })
        .collect()
}

pub fn template_for_tier(tier: &str) -> Vec<AssetAllocationEntry> {
    template_for(RiskProfile::from_tier(tier))
}
