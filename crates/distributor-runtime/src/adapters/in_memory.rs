//! # In-Memory Adapters
//!
//! A [`LedgerClient`] and a [`HolderIndex`] backed by process memory. The
//! ledger enforces the sequence number of every submission, installs
//! programs carried in StateInit messages after a configurable number of
//! deployment checks, and counts every call so tests can assert on I/O.
//!
//! By default an accepted transaction shows up in the sender's seqno at
//! once. [`InMemoryLedger::with_inclusion_after_reads`] keeps it in flight
//! for a number of seqno reads instead, like a ledger that has accepted but
//! not yet included it.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ld_03_distribution::{HolderIndex, IndexedItem};
use shared_types::{
    AccountState, Address, Amount, LedgerClient, LedgerError, SequenceNumber, SignedTransfer,
};

#[derive(Debug, Clone, Default)]
struct AccountRecord {
    /// Seqno visible to readers
    seqno: u32,
    /// Seqno reads left per accepted but not yet included transaction
    in_flight: Vec<u32>,
    balance: Amount,
    initialized: bool,
    /// Deployment checks left before the program becomes visible
    pending_checks: Option<u32>,
}

/// Calls issued against an [`InMemoryLedger`].
#[derive(Debug, Default)]
pub struct CallCounters {
    pub seqno_reads: AtomicUsize,
    pub submissions: AtomicUsize,
    pub state_reads: AtomicUsize,
    pub deployment_checks: AtomicUsize,
}

impl CallCounters {
    pub fn total(&self) -> usize {
        self.seqno_reads.load(Ordering::SeqCst)
            + self.submissions.load(Ordering::SeqCst)
            + self.state_reads.load(Ordering::SeqCst)
            + self.deployment_checks.load(Ordering::SeqCst)
    }
}

/// Ledger double holding accounts in a map.
pub struct InMemoryLedger {
    accounts: Mutex<HashMap<Address, AccountRecord>>,
    accepted: Mutex<Vec<SignedTransfer>>,
    /// Checks after which a submitted program shows up; `None` never.
    deploy_after_checks: Option<u32>,
    /// Seqno reads before an accepted transaction is included; 0 at once.
    inclusion_reads: u32,
    pub calls: CallCounters,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Programs appear on the first check after submission.
    pub fn new() -> Self {
        Self::with_deploy_delay(Some(1))
    }

    pub fn with_deploy_delay(deploy_after_checks: Option<u32>) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            accepted: Mutex::new(Vec::new()),
            deploy_after_checks,
            inclusion_reads: 0,
            calls: CallCounters::default(),
        }
    }

    /// Keep accepted transactions out of the visible seqno for `reads`
    /// sequence number reads of their sender.
    pub fn with_inclusion_after_reads(mut self, reads: u32) -> Self {
        self.inclusion_reads = reads;
        self
    }

    /// Create or top up a wallet.
    pub fn fund(&self, account: Address, balance: Amount) {
        let mut accounts = self.accounts.lock();
        let record = accounts.entry(account).or_default();
        record.balance = balance;
        record.initialized = true;
    }

    pub fn set_seqno(&self, account: Address, seqno: u32) {
        self.accounts.lock().entry(account).or_default().seqno = seqno;
    }

    pub fn seqno_of(&self, account: &Address) -> u32 {
        self.accounts
            .lock()
            .get(account)
            .map(|r| r.seqno)
            .unwrap_or(0)
    }

    /// Every accepted transaction in submission order.
    pub fn accepted(&self) -> Vec<SignedTransfer> {
        self.accepted.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn get_sequence_number(&self, account: &Address) -> Result<SequenceNumber, LedgerError> {
        self.calls.seqno_reads.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock();
        let Some(record) = accounts.get_mut(account) else {
            return Ok(SequenceNumber::new(0));
        };
        for left in record.in_flight.iter_mut() {
            *left = left.saturating_sub(1);
        }
        let pending = record.in_flight.len();
        record.in_flight.retain(|left| *left > 0);
        let included = pending - record.in_flight.len();
        record.seqno = record.seqno.wrapping_add(included as u32);
        Ok(SequenceNumber::new(record.seqno))
    }

    async fn submit_transaction(&self, transfer: &SignedTransfer) -> Result<(), LedgerError> {
        self.calls.submissions.fetch_add(1, Ordering::SeqCst);
        let request = &transfer.request;
        let mut accounts = self.accounts.lock();

        let sender = accounts.entry(request.sender).or_default();
        let expected = sender.seqno.wrapping_add(sender.in_flight.len() as u32);
        if expected != request.seqno.value() {
            return Err(LedgerError::SequenceMismatch {
                expected,
                got: request.seqno.value(),
            });
        }
        if self.inclusion_reads == 0 {
            sender.seqno = sender.seqno.wrapping_add(1);
        } else {
            sender.in_flight.push(self.inclusion_reads);
        }

        for message in &request.messages {
            let target = accounts.entry(message.destination).or_default();
            target.balance = target.balance.saturating_add(message.value);
            if message.state_init.is_some() && !target.initialized {
                target.pending_checks = self.deploy_after_checks;
            }
        }
        drop(accounts);

        self.accepted.lock().push(transfer.clone());
        Ok(())
    }

    async fn read_account_state(&self, address: &Address) -> Result<AccountState, LedgerError> {
        self.calls.state_reads.fetch_add(1, Ordering::SeqCst);
        let record = self.accounts.lock().get(address).cloned().unwrap_or_default();
        Ok(AccountState {
            initialized: record.initialized,
            balance: record.balance,
            custom_state: Vec::new(),
        })
    }

    async fn is_contract_deployed(&self, address: &Address) -> Result<bool, LedgerError> {
        self.calls.deployment_checks.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock();
        let Some(record) = accounts.get_mut(address) else {
            return Ok(false);
        };
        if let Some(left) = record.pending_checks {
            if left <= 1 {
                record.pending_checks = None;
                record.initialized = true;
            } else {
                record.pending_checks = Some(left - 1);
            }
        }
        Ok(record.initialized)
    }
}

/// Holder index over fixed item lists.
#[derive(Default)]
pub struct InMemoryHolderIndex {
    collections: Mutex<HashMap<Address, Vec<IndexedItem>>>,
    pub page_requests: AtomicUsize,
}

impl InMemoryHolderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items of `collection`.
    pub fn set_items(&self, collection: Address, items: Vec<IndexedItem>) {
        self.collections.lock().insert(collection, items);
    }

    /// Build a collection where `owners[i]` owns item `i`.
    pub fn with_owners(collection: Address, owners: &[Option<Address>]) -> Self {
        let index = Self::new();
        let items = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| IndexedItem {
                index: i as u64,
                owner: *owner,
            })
            .collect();
        index.set_items(collection, items);
        index
    }
}

#[async_trait]
impl HolderIndex for InMemoryHolderIndex {
    async fn items_page(
        &self,
        collection: &Address,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IndexedItem>, LedgerError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.lock();
        let items = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        Ok(items.iter().skip(offset).take(limit).cloned().collect())
    }
}
