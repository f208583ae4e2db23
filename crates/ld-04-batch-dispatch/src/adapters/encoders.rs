//! Transfer encoders for token and native-value batches.

use shared_types::{Address, Amount, CellError, OutboundMessage};

use crate::domain::{JettonTransfer, TransferEntry};
use crate::ports::TransferEncoder;

/// Forward amount used when the notification should carry dust only.
pub const MIN_FORWARD_TON_AMOUNT: Amount = 1;

/// Sends tokens through the sender's token wallet.
///
/// Each message goes to `jetton_wallet` with `gas_per_transfer` attached;
/// the recipient and amount travel in the transfer body. Excess gas is
/// returned to the recipient.
#[derive(Debug, Clone)]
pub struct JettonTransferEncoder {
    pub jetton_wallet: Address,
    pub forward_ton_amount: Amount,
    pub query_id: u64,
}

impl JettonTransferEncoder {
    pub fn new(jetton_wallet: Address) -> Self {
        Self {
            jetton_wallet,
            forward_ton_amount: MIN_FORWARD_TON_AMOUNT,
            query_id: 0,
        }
    }
}

impl TransferEncoder for JettonTransferEncoder {
    fn encode(
        &self,
        entry: &TransferEntry,
        gas_per_transfer: Amount,
    ) -> Result<OutboundMessage, CellError> {
        let body = JettonTransfer {
            query_id: self.query_id,
            amount: entry.amount,
            destination: entry.destination,
            response_destination: entry.destination,
            forward_ton_amount: self.forward_ton_amount,
            forward_payload: entry.forward_data.clone(),
        }
        .to_cell()?;

        Ok(OutboundMessage::new(self.jetton_wallet, gas_per_transfer).with_body(body))
    }
}

/// Sends native value straight to each destination.
///
/// The message value is `amount + gas_per_transfer` and the body is the
/// entry's forward data as-is, which also covers mint lists where every
/// entry addresses the collection with its own mint request.
#[derive(Debug, Clone)]
pub struct NativeTransferEncoder {
    pub bounce: bool,
}

impl Default for NativeTransferEncoder {
    fn default() -> Self {
        Self { bounce: true }
    }
}

impl TransferEncoder for NativeTransferEncoder {
    fn encode(
        &self,
        entry: &TransferEntry,
        gas_per_transfer: Amount,
    ) -> Result<OutboundMessage, CellError> {
        let value = entry
            .amount
            .checked_add(gas_per_transfer)
            .ok_or(CellError::CoinsOutOfRange(entry.amount))?;
        let mut message = OutboundMessage::new(entry.destination, value).with_bounce(self.bounce);
        if let Some(body) = &entry.forward_data {
            message = message.with_body(body.clone());
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CellBuilder;

    fn addr(byte: u8) -> Address {
        Address::new(0, [byte; 32])
    }

    #[test]
    fn test_jetton_message_targets_token_wallet() {
        let encoder = JettonTransferEncoder::new(addr(0xEE));
        let entry = TransferEntry::new(addr(0x01), 500);
        let message = encoder.encode(&entry, 35_000_000).unwrap();

        assert_eq!(message.destination, addr(0xEE));
        assert_eq!(message.value, 35_000_000);
        assert!(message.bounce);

        let body = JettonTransfer::from_cell(message.body.as_ref().unwrap()).unwrap();
        assert_eq!(body.amount, 500);
        assert_eq!(body.destination, addr(0x01));
        assert_eq!(body.response_destination, addr(0x01));
        assert_eq!(body.forward_ton_amount, 1);
        assert_eq!(body.forward_payload, None);
    }

    #[test]
    fn test_native_value_adds_gas() {
        let mut b = CellBuilder::new();
        b.store_uint(7, 32).unwrap();
        let data = b.build().unwrap();

        let entry = TransferEntry::new(addr(0x02), 1_000).with_forward_data(data.clone());
        let message = NativeTransferEncoder::default().encode(&entry, 100).unwrap();

        assert_eq!(message.destination, addr(0x02));
        assert_eq!(message.value, 1_100);
        assert_eq!(message.body, Some(data));
    }

    #[test]
    fn test_native_overflow() {
        let entry = TransferEntry::new(addr(0x02), u128::MAX);
        assert!(NativeTransferEncoder::default().encode(&entry, 1).is_err());
    }
}
