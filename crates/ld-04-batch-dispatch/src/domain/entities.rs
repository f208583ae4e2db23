//! Domain entities for batch dispatch

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, Cell, Hash, SendMode, SequenceNumber};

/// How a batch reacts to a single failing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// A failing message aborts the whole transaction.
    Strict,
    /// Failing messages are skipped; the rest still go out.
    #[default]
    BestEffort,
}

impl BatchMode {
    /// Send mode attached to every message of a batch.
    pub fn send_mode(self) -> SendMode {
        match self {
            Self::Strict => SendMode::PAY_GAS_SEPARATELY,
            Self::BestEffort => SendMode::PAY_GAS_SEPARATELY.union(SendMode::IGNORE_ERRORS),
        }
    }
}

impl std::str::FromStr for BatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best_effort" | "best-effort" | "besteffort" => Ok(Self::BestEffort),
            other => Err(format!("unknown batch mode '{other}'")),
        }
    }
}

/// One recipient of a batched transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub destination: Address,
    pub amount: Amount,
    /// Opaque payload forwarded to the recipient.
    pub forward_data: Option<Cell>,
}

impl TransferEntry {
    pub fn new(destination: Address, amount: Amount) -> Self {
        Self {
            destination,
            amount,
            forward_data: None,
        }
    }

    pub fn with_forward_data(mut self, data: Cell) -> Self {
        self.forward_data = Some(data);
        self
    }
}

/// Contiguous slice of the transfer list, sent as one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferBatch {
    pub index: usize,
    pub entries: Vec<TransferEntry>,
}

impl TransferBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_amount(&self) -> Amount {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// Outcome of one submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub batch_index: usize,
    pub seqno: SequenceNumber,
    pub recipients: usize,
    pub total_amount: Amount,
    /// Hash of the signed wallet body, usable as a transaction reference
    pub body_hash: Hash,
}

/// Totals of a finished dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub batches: Vec<BatchResult>,
    pub recipients: usize,
    pub total_amount: Amount,
    /// Sequence number observed after the last batch, if confirmation ran
    pub confirmed_seqno: Option<SequenceNumber>,
}

impl DispatchSummary {
    pub fn record(&mut self, result: BatchResult) {
        self.recipients += result.recipients;
        self.total_amount += result.total_amount;
        self.batches.push(result);
    }
}
