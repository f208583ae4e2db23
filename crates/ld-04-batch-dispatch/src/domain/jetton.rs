//! Fungible token transfer body.
//!
//! ```text
//! transfer#0f8a7ea5 query_id:uint64 amount:Coins destination:MsgAddress
//!     response_destination:MsgAddress custom_payload:(Maybe ^Cell)
//!     forward_ton_amount:Coins forward_payload:(Either Cell ^Cell)
//!     = InternalMsgBody;
//! ```

use shared_types::{Address, Amount, Cell, CellBuilder, CellError};

/// Opcode of the token wallet `transfer` message.
pub const JETTON_TRANSFER_OP: u32 = 0x0f8a_7ea5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JettonTransfer {
    pub query_id: u64,
    pub amount: Amount,
    pub destination: Address,
    /// Receives the excess gas
    pub response_destination: Address,
    /// Native value forwarded to `destination` with the notification
    pub forward_ton_amount: Amount,
    pub forward_payload: Option<Cell>,
}

impl JettonTransfer {
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_uint(u128::from(JETTON_TRANSFER_OP), 32)?;
        b.store_uint(u128::from(self.query_id), 64)?;
        b.store_coins(self.amount)?;
        b.store_address(&self.destination)?;
        b.store_address(&self.response_destination)?;
        // no custom payload
        b.store_bit(false)?;
        b.store_coins(self.forward_ton_amount)?;
        match &self.forward_payload {
            Some(payload) => {
                b.store_bit(true)?;
                b.store_ref(payload.clone())?;
            }
            None => {
                b.store_bit(false)?;
            }
        }
        b.build()
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, CellError> {
        let mut s = cell.as_slice();
        let op = s.load_uint(32)? as u32;
        if op != JETTON_TRANSFER_OP {
            return Err(CellError::ValueOutOfRange { bits: 32 });
        }
        let query_id = s.load_uint(64)? as u64;
        let amount = s.load_coins()?;
        let destination = s
            .load_address()?
            .ok_or(CellError::UnsupportedAddress("addr_none"))?;
        let response_destination = s
            .load_address()?
            .ok_or(CellError::UnsupportedAddress("addr_none"))?;
        // custom payload is never set by this encoder
        let _ = s.load_maybe_ref()?;
        let forward_ton_amount = s.load_coins()?;
        let forward_payload = if s.load_bit()? {
            Some(s.load_ref()?.clone())
        } else {
            None
        };
        Ok(Self {
            query_id,
            amount,
            destination,
            response_destination,
            forward_ton_amount,
            forward_payload,
        })
    }
}
