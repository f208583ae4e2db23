//! # Address Derivation Services
//!
//! Pure functions computing where a program will live before it is ever
//! submitted. The address hash is the representation hash of the StateInit
//! cell, so any single-bit change in code or initial state moves the
//! program elsewhere.

use shared_types::{Address, Cell, InitPayload};

use super::state_init::StateInit;
use crate::errors::AddressError;

/// Derived address together with the StateInit cell to attach to the
/// deployment message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: Address,
    pub state_init: Cell,
}

// =============================================================================
// DERIVATION
// =============================================================================

/// Compute the address `init` will occupy on `workchain`.
pub fn derive_address(workchain: i32, init: &InitPayload) -> Result<Address, AddressError> {
    predict(workchain, init).map(|derived| derived.address)
}

/// Compute the address and keep the StateInit cell for submission.
pub fn predict(workchain: i32, init: &InitPayload) -> Result<DerivedAddress, AddressError> {
    if i8::try_from(workchain).is_err() {
        return Err(AddressError::WorkchainOutOfRange(workchain));
    }
    let state_init = StateInit::from(init).to_cell()?;
    Ok(DerivedAddress {
        address: Address::new(workchain, state_init.hash()),
        state_init,
    })
}

/// Derive and compare against `expected`.
///
/// Must succeed before any value-bearing message is sent to `expected`.
pub fn verify_address(
    workchain: i32,
    init: &InitPayload,
    expected: &Address,
) -> Result<Address, AddressError> {
    let computed = derive_address(workchain, init)?;
    if computed != *expected {
        tracing::warn!(
            expected = %expected,
            computed = %computed,
            "Derived address does not match expected address"
        );
        return Err(AddressError::Mismatch {
            expected: *expected,
            computed,
        });
    }
    Ok(computed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{CellBuilder, BASECHAIN, MASTERCHAIN};

    fn bytes_cell(bytes: &[u8]) -> Cell {
        let mut b = CellBuilder::new();
        b.store_bytes(bytes).unwrap();
        b.build().unwrap()
    }

    /// Initial state of a minter-like program: owner, supply, content.
    fn minter_state(owner: u8, supply: u128, content: &[u8]) -> Cell {
        let mut b = CellBuilder::new();
        b.store_coins(supply).unwrap();
        b.store_address(&Address::new(0, [owner; 32])).unwrap();
        b.store_ref(bytes_cell(content)).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_known_vector_empty_code_and_data() {
        let init = InitPayload::new(Cell::empty(), Cell::empty());
        let address = derive_address(BASECHAIN, &init).unwrap();
        assert_eq!(
            hex::encode(address.hash),
            "ad31eb762e688fc1ba21575d4359b0f9c48738af653e166a233300bdc6b29ae9"
        );
    }

    #[test]
    fn test_deterministic() {
        let init = InitPayload::new(bytes_cell(b"code"), bytes_cell(b"data"));
        assert_eq!(
            derive_address(BASECHAIN, &init).unwrap(),
            derive_address(BASECHAIN, &init).unwrap()
        );
    }

    #[test]
    fn test_workchain_does_not_change_hash() {
        let init = InitPayload::new(bytes_cell(b"code"), bytes_cell(b"data"));
        let base = derive_address(BASECHAIN, &init).unwrap();
        let master = derive_address(MASTERCHAIN, &init).unwrap();
        assert_eq!(base.hash, master.hash);
        assert_ne!(base, master);
    }

    #[test]
    fn test_one_field_difference_moves_address() {
        let code = bytes_cell(b"minter-code");
        let a = InitPayload::new(code.clone(), minter_state(1, 1_000, b"ipfs://a"));
        let b = InitPayload::new(code, minter_state(1, 1_001, b"ipfs://a"));
        assert_ne!(
            derive_address(BASECHAIN, &a).unwrap(),
            derive_address(BASECHAIN, &b).unwrap()
        );
    }

    #[test]
    fn test_predict_matches_derive() {
        let init = InitPayload::new(bytes_cell(b"c"), bytes_cell(b"d"));
        let derived = predict(BASECHAIN, &init).unwrap();
        assert_eq!(derived.address.hash, derived.state_init.hash());
        assert_eq!(derived.address, derive_address(BASECHAIN, &init).unwrap());
    }

    #[test]
    fn test_verify_address() {
        let init = InitPayload::new(bytes_cell(b"c"), bytes_cell(b"d"));
        let expected = derive_address(BASECHAIN, &init).unwrap();
        assert_eq!(verify_address(BASECHAIN, &init, &expected), Ok(expected));

        let wrong = Address::new(BASECHAIN, [0u8; 32]);
        assert_eq!(
            verify_address(BASECHAIN, &init, &wrong),
            Err(AddressError::Mismatch {
                expected: wrong,
                computed: expected,
            })
        );
    }

    #[test]
    fn test_workchain_out_of_range() {
        let init = InitPayload::new(Cell::empty(), Cell::empty());
        assert_eq!(
            derive_address(1000, &init),
            Err(AddressError::WorkchainOutOfRange(1000))
        );
    }

    proptest! {
        #[test]
        fn prop_single_byte_sensitivity(
            data in proptest::collection::vec(any::<u8>(), 1..100),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let code = bytes_cell(b"code");
            let original = InitPayload::new(code.clone(), bytes_cell(&data));

            let mut changed = data.clone();
            let i = index.index(changed.len());
            changed[i] ^= flip;
            let modified = InitPayload::new(code, bytes_cell(&changed));

            prop_assert_ne!(
                derive_address(BASECHAIN, &original).unwrap(),
                derive_address(BASECHAIN, &modified).unwrap()
            );
        }

        #[test]
        fn prop_code_sensitivity(
            code in proptest::collection::vec(any::<u8>(), 1..100),
            index in any::<prop::sample::Index>(),
        ) {
            let data = bytes_cell(b"data");
            let mut changed = code.clone();
            let i = index.index(changed.len());
            changed[i] = changed[i].wrapping_add(1);

            prop_assert_ne!(
                derive_address(BASECHAIN, &InitPayload::new(bytes_cell(&code), data.clone())).unwrap(),
                derive_address(BASECHAIN, &InitPayload::new(bytes_cell(&changed), data)).unwrap()
            );
        }
    }
}
