//! # Content → Address
//!
//! Metadata is encoded into content cells, embedded in a program's initial
//! state, and the resulting init payload determines the program address.

#[cfg(test)]
mod tests {
    use ld_01_content_encoding::{ContentEncodingApi, MetadataEncoder, MetadataPayload};
    use ld_02_address_derivation::{derive_address, verify_address, AddressError};
    use proptest::prelude::*;
    use shared_types::{Address, Cell, CellBuilder, InitPayload, BASECHAIN};

    use super::super::fixtures::{address, cell};

    /// Collection-style initial state: owner, next index, ^content.
    fn collection_data(owner: &Address, content: Cell) -> Cell {
        let mut b = CellBuilder::new();
        b.store_address(owner).unwrap();
        b.store_uint(0, 64).unwrap();
        b.store_ref(content).unwrap();
        b.build().unwrap()
    }

    fn metadata(description: &str) -> MetadataPayload {
        MetadataPayload::new()
            .with_field("name", "Orbit Holders")
            .with_field("description", description)
            .with_field("image", "https://example.org/collection.png")
    }

    #[test]
    fn test_one_field_changes_the_address() {
        let encoder = MetadataEncoder::default();
        let code = cell(0xC0DE);
        let owner = address(1);

        let content_a = encoder.encode_metadata(&metadata("first run")).unwrap();
        let content_b = encoder.encode_metadata(&metadata("first rum")).unwrap();

        let a = derive_address(
            BASECHAIN,
            &InitPayload::new(code.clone(), collection_data(&owner, content_a)),
        )
        .unwrap();
        let b = derive_address(
            BASECHAIN,
            &InitPayload::new(code, collection_data(&owner, content_b)),
        )
        .unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_long_description_survives_embedding() {
        let encoder = MetadataEncoder::default();
        let description = "x".repeat(10_000);
        let content = encoder.encode_metadata(&metadata(&description)).unwrap();
        let data = collection_data(&address(1), content);

        let embedded = data.refs()[0].clone();
        let value = encoder.lookup(&embedded, "description").unwrap();
        assert_eq!(value, description.as_bytes());

        let init = InitPayload::new(cell(1), data);
        let expected = derive_address(BASECHAIN, &init).unwrap();
        assert_eq!(verify_address(BASECHAIN, &init, &expected).unwrap(), expected);
    }

    #[test]
    fn test_verification_rejects_other_address() {
        let init = InitPayload::new(cell(1), cell(2));
        assert!(matches!(
            verify_address(BASECHAIN, &init, &address(7)),
            Err(AddressError::Mismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_address_follows_content(
            fields in prop::collection::btree_map("[a-z_]{1,12}", prop::collection::vec(any::<u8>(), 0..400), 1..6)
        ) {
            let encoder = MetadataEncoder::default();
            let forward: MetadataPayload = fields
                .iter()
                .map(|(k, v)| ld_01_content_encoding::ContentField::new(k.clone(), v.clone()))
                .collect();
            let reverse: MetadataPayload = fields
                .iter()
                .rev()
                .map(|(k, v)| ld_01_content_encoding::ContentField::new(k.clone(), v.clone()))
                .collect();

            let a = encoder.encode_metadata(&forward).unwrap();
            let b = encoder.encode_metadata(&reverse).unwrap();
            prop_assert_eq!(a.hash(), b.hash());

            let owner = address(3);
            let addr_a = derive_address(BASECHAIN, &InitPayload::new(cell(9), collection_data(&owner, a))).unwrap();
            let addr_b = derive_address(BASECHAIN, &InitPayload::new(cell(9), collection_data(&owner, b))).unwrap();
            prop_assert_eq!(addr_a, addr_b);
        }
    }
}
