use super::allocation::{set_allocation, validate_allocation};
use super::error::Result;
use super::metrics::aggregate;
use super::projection::project;
use super::types::{AssetAllocationEntry, PortfolioEvaluation, ProjectionRequest};

/// Runs validate -> aggregate -> project over the current allocation.
/// An out-of-balance allocation is still evaluated; the validation result
/// travels with the numbers so callers can show live feedback.
pub fn evaluate_portfolio(
    entries: &[AssetAllocationEntry],
    request: ProjectionRequest,
) -> PortfolioEvaluation {
    let validation = validate_allocation(entries);
    let metrics = aggregate(entries);
    let projection = project(request.principal, metrics.expected_return, request.years);

    if !validation.is_valid {
        tracing::debug!(
            total = validation.total,
            "evaluating portfolio with out-of-balance allocation"
        );
    }

    PortfolioEvaluation {
        entries: entries.to_vec(),
        validation,
        metrics,
        projection,
    }
}

/// One UI edit event: normalize the edited list, then evaluate it.
pub fn apply_allocation_edit(
    entries: &[AssetAllocationEntry],
    index: usize,
    new_value: f64,
    request: ProjectionRequest,
) -> Result<PortfolioEvaluation> {
    let updated = set_allocation(entries, index, new_value)?;
    Ok(evaluate_portfolio(&updated, request))
}
