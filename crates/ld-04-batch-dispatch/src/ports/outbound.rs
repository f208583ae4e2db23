//! Outbound ports for batch dispatch

use shared_types::{Amount, CellError, OutboundMessage};

use crate::domain::TransferEntry;

/// Turns one transfer entry into the message the sender emits.
///
/// Token transfers address the sender's token wallet; native transfers
/// address the recipient directly.
pub trait TransferEncoder: Send + Sync {
    fn encode(
        &self,
        entry: &TransferEntry,
        gas_per_transfer: Amount,
    ) -> Result<OutboundMessage, CellError>;
}
