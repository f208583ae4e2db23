//! # Outbound Messages and Wallet Transfers
//!
//! A wallet transaction carries up to [`MAX_MESSAGES_PER_TRANSFER`] relaxed
//! internal messages. The wallet body commits to the wallet id, an expiry,
//! the sequence number and the linked list of send actions; the signer signs
//! the representation hash of that body.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::address::Address;
use crate::cell::{Cell, CellBuilder};
use crate::entities::{Amount, Hash, SequenceNumber};
use crate::errors::CellError;

/// Ledger ceiling on messages per wallet transaction.
pub const MAX_MESSAGES_PER_TRANSFER: usize = 255;

/// Tag of `action_send_msg` in the out-action list.
pub const ACTION_SEND_MSG_TAG: u32 = 0x0ec3_c86d;

/// Send-mode flags attached to each outbound message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SendMode(u8);

impl SendMode {
    pub const ORDINARY: SendMode = SendMode(0);
    /// Pay forwarding fees from the wallet balance, not from the value.
    pub const PAY_GAS_SEPARATELY: SendMode = SendMode(1);
    /// Skip messages that fail during the action phase instead of aborting.
    pub const IGNORE_ERRORS: SendMode = SendMode(2);

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn union(self, other: SendMode) -> SendMode {
        SendMode(self.0 | other.0)
    }

    pub const fn contains(&self, other: SendMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Debug for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SendMode({})", self.0)
    }
}

/// One internal message emitted by a wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: Address,
    pub value: Amount,
    pub bounce: bool,
    /// Serialized StateInit, present when the message deploys a program.
    pub state_init: Option<Cell>,
    pub body: Option<Cell>,
}

impl OutboundMessage {
    pub fn new(destination: Address, value: Amount) -> Self {
        Self {
            destination,
            value,
            bounce: true,
            state_init: None,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Cell) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_state_init(mut self, state_init: Cell) -> Self {
        self.state_init = Some(state_init);
        self
    }

    pub fn with_bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    /// Serialize as `MessageRelaxed`: internal header, optional StateInit by
    /// reference, body by reference.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        // int_msg_info$0 ihr_disabled bounce bounced
        b.store_bit(false)?;
        b.store_bit(true)?;
        b.store_bit(self.bounce)?;
        b.store_bit(false)?;
        b.store_address_none()?;
        b.store_address(&self.destination)?;
        // value: coins + empty extra-currency dictionary
        b.store_coins(self.value)?;
        b.store_bit(false)?;
        // ihr_fee, fwd_fee, created_lt, created_at are filled by the ledger
        b.store_coins(0)?;
        b.store_coins(0)?;
        b.store_uint(0, 64)?;
        b.store_uint(0, 32)?;

        match &self.state_init {
            Some(init) => {
                b.store_bit(true)?;
                b.store_bit(true)?;
                b.store_ref(init.clone())?;
            }
            None => {
                b.store_bit(false)?;
            }
        }

        match &self.body {
            Some(body) => {
                b.store_bit(true)?;
                b.store_ref(body.clone())?;
            }
            None => {
                b.store_bit(false)?;
            }
        }

        b.build()
    }
}

/// Unsigned wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub sender: Address,
    pub wallet_id: u32,
    pub seqno: SequenceNumber,
    /// Unix time after which the ledger must reject the transaction.
    pub valid_until: u32,
    pub send_mode: SendMode,
    pub messages: Vec<OutboundMessage>,
}

impl TransferRequest {
    /// `valid_until` for a transaction signed now that lives for `valid_for`.
    pub fn expiry_after(valid_for: Duration) -> u32 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        u32::try_from(now.saturating_add(valid_for.as_secs())).unwrap_or(u32::MAX)
    }

    /// Build the wallet body that the signature commits to.
    pub fn to_body_cell(&self) -> Result<Cell, CellError> {
        if self.messages.len() > MAX_MESSAGES_PER_TRANSFER {
            return Err(CellError::TooManyMessages {
                count: self.messages.len(),
                max: MAX_MESSAGES_PER_TRANSFER,
            });
        }

        // out_list$_ prev:^OutList action:OutAction, oldest action innermost
        let mut actions: Option<Cell> = None;
        for message in &self.messages {
            let mut node = CellBuilder::new();
            node.store_ref(actions.take().unwrap_or_default())?;
            node.store_uint(u128::from(ACTION_SEND_MSG_TAG), 32)?;
            node.store_uint(u128::from(self.send_mode.bits()), 8)?;
            node.store_ref(message.to_cell()?)?;
            actions = Some(node.build()?);
        }

        let mut body = CellBuilder::new();
        body.store_uint(u128::from(self.wallet_id), 32)?;
        body.store_uint(u128::from(self.valid_until), 32)?;
        body.store_uint(u128::from(self.seqno.value()), 32)?;
        body.store_maybe_ref(actions)?;
        body.build()
    }

    /// Bytes handed to the [`Signer`](crate::ports::Signer).
    pub fn signing_payload(&self) -> Result<Hash, CellError> {
        Ok(self.to_body_cell()?.hash())
    }
}

/// A signed wallet transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub request: TransferRequest,
    pub signature: Vec<u8>,
}
