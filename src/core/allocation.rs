use super::error::{EngineError, Result};
use super::templates::template_for;
use super::types::{ALLOCATION_EPSILON, AllocationValidation, AssetAllocationEntry, RiskProfile};

const FULL_ALLOCATION: f64 = 100.0;

/// Applies a single-entry edit and pushes any excess over 100% onto the
/// other entries in proportion to their weights before the edit.
///
/// A total below 100 is returned untouched; it is reported through
/// [`validate_allocation`] rather than filled in. When every other entry is
/// already zero there is nothing to scale and the excess is left in place.
///
/// Redistributed entries are rounded to one decimal, so an entry that did
/// not absorb the rounding residual can end up to 0.05 above its previous
/// value when that value had more than one decimal. The entry that absorbs
/// the residual can drift by up to 0.05 per other entry.
pub fn set_allocation(
    entries: &[AssetAllocationEntry],
    index: usize,
    new_value: f64,
) -> Result<Vec<AssetAllocationEntry>> {
    if index >= entries.len() {
        return Err(EngineError::IndexOutOfBounds {
            index,
            len: entries.len(),
        });
    }

    let new_value = clamp_allocation(new_value);
    let mut updated = entries.to_vec();
    updated[index].allocation = new_value;

    let total = allocation_total(&updated);
    if total <= FULL_ALLOCATION {
        return Ok(updated);
    }

    let others_sum = total - new_value;
    if others_sum <= 0.0 {
        tracing::debug!(
            index,
            new_value,
            total,
            "other allocations are all zero, skipping redistribution"
        );
        return Ok(updated);
    }

    let remaining = FULL_ALLOCATION - new_value;
    for (j, entry) in updated.iter_mut().enumerate() {
        if j == index {
            continue;
        }
        let proportion = entries[j].allocation / others_sum;
        entry.allocation = round_to_tenth(proportion * remaining);
    }

    let adjusted_total = allocation_total(&updated);
    let residual = FULL_ALLOCATION - adjusted_total;
    if residual.abs() > ALLOCATION_EPSILON {
        match largest_other_index(&updated, index) {
            Some(target) => {
                let patched = updated[target].allocation + residual;
                updated[target].allocation = patched.max(0.0);
            }
            None => {
                tracing::debug!(index, residual, "no other entry to absorb rounding residual");
            }
        }
    }

    Ok(updated)
}

/// Replaces the whole list with the tier's recommended template.
pub fn reset_to_recommended(profile: RiskProfile) -> Vec<AssetAllocationEntry> {
    template_for(profile)
}

pub fn allocation_total(entries: &[AssetAllocationEntry]) -> f64 {
    entries.iter().map(|e| e.allocation).sum()
}

pub fn validate_allocation(entries: &[AssetAllocationEntry]) -> AllocationValidation {
    let total = allocation_total(entries);
    let difference = total - FULL_ALLOCATION;
    let is_valid = difference.abs() <= ALLOCATION_EPSILON;

    let message = if is_valid {
        None
    } else if difference < 0.0 {
        Some(format!(
            "Allocation totals {total:.1}%; {:.1}% still unallocated",
            -difference
        ))
    } else {
        Some(format!(
            "Allocation totals {total:.1}%; reduce by {difference:.1}%"
        ))
    };

    AllocationValidation {
        total,
        difference,
        is_valid,
        message,
    }
}

fn clamp_allocation(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, FULL_ALLOCATION)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// First entry wins on ties.
fn largest_other_index(entries: &[AssetAllocationEntry], excluded: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (j, entry) in entries.iter().enumerate() {
        if j == excluded {
            continue;
        }
        match best {
            Some(b) if entries[b].allocation >= entry.allocation => {}
            _ => best = Some(j),
        }
    }
    best
}
