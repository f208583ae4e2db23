//! # StateInit
//!
//! ```text
//! _ split_depth:(Maybe (## 5)) special:(Maybe TickTock)
//!   code:(Maybe ^Cell) data:(Maybe ^Cell)
//!   library:(HashmapE 256 SimpleLib) = StateInit;
//! ```
//!
//! Programs deployed by this engine only set `code` and `data`, which
//! serializes to the five bits `00110` followed by two refs.

use shared_types::{Cell, CellBuilder, InitPayload};

use crate::errors::AddressError;

/// Tick/tock flags of special accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickTock {
    pub tick: bool,
    pub tock: bool,
}

/// Initial state of an account, as hashed into its address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateInit {
    pub split_depth: Option<u8>,
    pub special: Option<TickTock>,
    pub code: Option<Cell>,
    pub data: Option<Cell>,
    pub library: Option<Cell>,
}

impl StateInit {
    pub fn new(code: Cell, data: Cell) -> Self {
        Self {
            code: Some(code),
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn to_cell(&self) -> Result<Cell, AddressError> {
        let mut builder = CellBuilder::new();

        match self.split_depth {
            Some(depth) if depth == 0 || depth > 30 => {
                return Err(AddressError::InvalidSplitDepth(depth));
            }
            Some(depth) => {
                builder.store_bit(true)?;
                builder.store_uint(u128::from(depth), 5)?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }

        match self.special {
            Some(flags) => {
                builder.store_bit(true)?;
                builder.store_bit(flags.tick)?;
                builder.store_bit(flags.tock)?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }

        builder.store_maybe_ref(self.code.clone())?;
        builder.store_maybe_ref(self.data.clone())?;
        builder.store_maybe_ref(self.library.clone())?;
        Ok(builder.build()?)
    }

    pub fn from_cell(cell: &Cell) -> Result<Self, AddressError> {
        let mut slice = cell.as_slice();

        let split_depth = if slice.load_bit()? {
            Some(slice.load_uint(5)? as u8)
        } else {
            None
        };
        let special = if slice.load_bit()? {
            Some(TickTock {
                tick: slice.load_bit()?,
                tock: slice.load_bit()?,
            })
        } else {
            None
        };
        let code = slice.load_maybe_ref()?.cloned();
        let data = slice.load_maybe_ref()?.cloned();
        let library = slice.load_maybe_ref()?.cloned();
        slice.ensure_empty()?;

        Ok(Self {
            split_depth,
            special,
            code,
            data,
            library,
        })
    }
}

impl From<&InitPayload> for StateInit {
    fn from(init: &InitPayload) -> Self {
        Self::new(init.code.clone(), init.data.clone())
    }
}
