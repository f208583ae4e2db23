//! Invariant checks for distribution tables

use super::entities::{DistributionTable, HolderSnapshot};

/// Payouts never exceed the allocated share of the pool.
pub fn check_conservation(table: &DistributionTable) -> bool {
    table.total() <= table.to_distribute
}

/// A holder with more units never receives less than one with fewer.
pub fn check_monotonic(snapshot: &HolderSnapshot, table: &DistributionTable) -> bool {
    let mut pairs: Vec<(u64, u128)> = snapshot
        .iter()
        .filter(|(_, &units)| units > 0)
        .map(|(addr, &units)| (units, table.get(addr).unwrap_or(0)))
        .collect();
    pairs.sort_unstable();
    pairs.windows(2).all(|w| w[0].1 <= w[1].1)
}

/// Every holder with a non-zero count has an entry and nobody else does.
pub fn check_coverage(snapshot: &HolderSnapshot, table: &DistributionTable) -> bool {
    let holders = snapshot.iter().filter(|(_, &units)| units > 0).count();
    holders == table.len()
        && snapshot
            .iter()
            .filter(|(_, &units)| units > 0)
            .all(|(addr, _)| table.get(addr).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Address;

    #[test]
    fn test_conservation_violation_detected() {
        let mut table = DistributionTable {
            to_distribute: 10,
            ..Default::default()
        };
        table.entries.insert(Address::new(0, [1; 32]), 11);
        assert!(!check_conservation(&table));
    }

    #[test]
    fn test_monotonic_violation_detected() {
        let a = Address::new(0, [1; 32]);
        let b = Address::new(0, [2; 32]);
        let snapshot: HolderSnapshot = [(a, 2), (b, 1)].into_iter().collect();
        let mut table = DistributionTable::default();
        table.entries.insert(a, 5);
        table.entries.insert(b, 10);
        assert!(!check_monotonic(&snapshot, &table));
    }
}
