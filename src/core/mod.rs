mod allocation;
mod engine;
mod error;
mod metrics;
mod projection;
mod scenario;
mod solver;
mod templates;
mod types;

pub use allocation::{allocation_total, reset_to_recommended, set_allocation, validate_allocation};
pub use engine::{apply_allocation_edit, evaluate_portfolio};
pub use error::{EngineError, Result};
pub use metrics::aggregate;
pub use projection::{monthly_rate, project};
pub use scenario::classify;
pub use solver::{MAX_GOAL_MONTHS, required_monthly_contribution, time_to_reach_goal};
pub use templates::{template_for, template_for_tier};
pub use types::{
    ALLOCATION_EPSILON, AllocationValidation, AssetAllocationEntry, GoalHorizon, GrowthTrend,
    MacroSnapshot, PortfolioEvaluation, PortfolioMetrics, ProjectionPoint, ProjectionRequest,
    RiskProfile, ScenarioTag,
};
