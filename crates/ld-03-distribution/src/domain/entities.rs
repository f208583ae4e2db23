//! Domain entities for distribution

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount};
use std::collections::BTreeMap;

use super::errors::DistributionError;

/// Fraction of the pool paid out in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub numerator: u64,
    pub denominator: u64,
}

impl Allocation {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Reject a zero denominator or a fraction above one.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.denominator == 0 || self.numerator > self.denominator {
            return Err(DistributionError::InvalidAllocation {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }
}

impl Default for Allocation {
    /// 0.314% of the pool.
    fn default() -> Self {
        Self::new(314, 100_000)
    }
}

/// Holding count per address, frozen at capture time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSnapshot {
    holdings: BTreeMap<Address, u64>,
}

impl HolderSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `units` to `holder`'s count.
    pub fn add(&mut self, holder: Address, units: u64) {
        let entry = self.holdings.entry(holder).or_insert(0);
        *entry = entry.saturating_add(units);
    }

    pub fn get(&self, holder: &Address) -> u64 {
        self.holdings.get(holder).copied().unwrap_or(0)
    }

    /// Sum of all holdings, wide enough to never overflow.
    pub fn total_units(&self) -> u128 {
        self.holdings.values().map(|&u| u128::from(u)).sum()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.holdings.iter()
    }
}

impl FromIterator<(Address, u64)> for HolderSnapshot {
    fn from_iter<T: IntoIterator<Item = (Address, u64)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (holder, units) in iter {
            snapshot.add(holder, units);
        }
        snapshot
    }
}

/// Payout per recipient plus the figures it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTable {
    pub entries: BTreeMap<Address, Amount>,
    /// `pool * numerator / denominator`
    pub to_distribute: Amount,
    /// Sum of all holdings in the snapshot
    pub total_units: u128,
    /// `to_distribute / total_units`
    pub per_unit: Amount,
}

impl DistributionTable {
    /// Sum of all payouts. Never exceeds `to_distribute`.
    pub fn total(&self) -> Amount {
        self.entries.values().sum()
    }

    /// True when the pool was too small to pay anyone.
    pub fn is_all_zero(&self) -> bool {
        self.entries.values().all(|&amount| amount == 0)
    }

    /// Left in the pool share after truncation.
    pub fn remainder(&self) -> Amount {
        self.to_distribute.saturating_sub(self.total())
    }

    pub fn get(&self, recipient: &Address) -> Option<Amount> {
        self.entries.get(recipient).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-zero payouts in address order.
    pub fn payouts(&self) -> impl Iterator<Item = (Address, Amount)> + '_ {
        self.entries
            .iter()
            .filter(|(_, &amount)| amount > 0)
            .map(|(addr, &amount)| (*addr, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    #[test]
    fn test_allocation_validate() {
        assert!(Allocation::default().validate().is_ok());
        assert!(Allocation::new(1, 1).validate().is_ok());
        assert!(Allocation::new(0, 5).validate().is_ok());
        assert_eq!(
            Allocation::new(1, 0).validate(),
            Err(DistributionError::InvalidAllocation {
                numerator: 1,
                denominator: 0
            })
        );
        assert!(Allocation::new(3, 2).validate().is_err());
    }

    #[test]
    fn test_snapshot_accumulates() {
        let snapshot: HolderSnapshot = [(addr(1), 2), (addr(2), 1), (addr(1), 3)]
            .into_iter()
            .collect();
        assert_eq!(snapshot.get(&addr(1)), 5);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.total_units(), 6);
    }

    #[test]
    fn test_total_units_does_not_overflow() {
        let snapshot: HolderSnapshot = [(addr(1), u64::MAX), (addr(2), u64::MAX)]
            .into_iter()
            .collect();
        assert_eq!(snapshot.total_units(), 2 * u128::from(u64::MAX));
    }

    #[test]
    fn test_table_helpers() {
        let mut table = DistributionTable {
            to_distribute: 100,
            total_units: 3,
            per_unit: 33,
            ..Default::default()
        };
        table.entries.insert(addr(1), 66);
        table.entries.insert(addr(2), 33);
        assert_eq!(table.total(), 99);
        assert_eq!(table.remainder(), 1);
        assert!(!table.is_all_zero());
        assert_eq!(table.payouts().count(), 2);
    }
}
