//! # Distribution Table Calculator
//!
//! ```text
//! to_distribute = pool * numerator / denominator      (256-bit, truncating)
//! per_unit      = to_distribute / total_units
//! payout[a]     = per_unit * units[a]                 (units[a] > 0)
//! ```
//!
//! Truncation happens twice, so the table total can fall short of
//! `to_distribute` by less than `total_units`. It never exceeds it.

use shared_types::{Amount, U256};
use std::collections::BTreeMap;

use crate::domain::{Allocation, DistributionError, DistributionTable, HolderSnapshot};

/// Compute payouts for `snapshot` from a pool of `pool` units.
pub fn calculate(
    snapshot: &HolderSnapshot,
    pool: Amount,
    allocation: Allocation,
) -> Result<DistributionTable, DistributionError> {
    allocation.validate()?;

    if snapshot.is_empty() {
        return Err(DistributionError::ZeroHolders);
    }
    let total_units = snapshot.total_units();
    if total_units == 0 {
        return Err(DistributionError::EmptyPool);
    }

    let to_distribute = share_of(pool, allocation);
    let per_unit = to_distribute / total_units;

    let mut entries = BTreeMap::new();
    for (holder, &units) in snapshot.iter().filter(|(_, &units)| units > 0) {
        let payout = per_unit
            .checked_mul(u128::from(units))
            .ok_or(DistributionError::Overflow { units, per_unit })?;
        entries.insert(*holder, payout);
    }

    let table = DistributionTable {
        entries,
        to_distribute,
        total_units,
        per_unit,
    };

    if table.is_all_zero() {
        tracing::warn!(
            pool,
            to_distribute,
            total_units,
            "Pool share too small for a single unit; table is all zero"
        );
    } else {
        tracing::debug!(
            recipients = table.len(),
            to_distribute,
            per_unit,
            total = table.total(),
            "Computed distribution table"
        );
    }

    Ok(table)
}

/// `pool * numerator / denominator` without intermediate overflow.
///
/// The allocation must already be validated; the result is then at most
/// `pool` and always fits.
pub fn share_of(pool: Amount, allocation: Allocation) -> Amount {
    if allocation.denominator == 0 {
        return 0;
    }
    let wide = U256::from(pool) * U256::from(allocation.numerator) / U256::from(allocation.denominator);
    wide.low_u128()
}
