//! # Hashed-Key Dictionary
//!
//! Binary Patricia trie (`HashmapE n ^Cell`) keyed by fixed-width bit
//! strings. Every edge stores the label shared by all keys below it, so a
//! dictionary with `m` entries has `2m - 1` cells regardless of key width.
//!
//! ## Label encodings
//!
//! | Kind  | Prefix | Layout                       | Size            |
//! |-------|--------|------------------------------|-----------------|
//! | short | `0`    | unary length, `0`, bits      | `2m + 2`        |
//! | long  | `10`   | length in `k` bits, bits     | `2 + k + m`     |
//! | same  | `11`   | bit value, length in `k` bits | `3 + k`        |
//!
//! where `k` is the bit length of the remaining key width `n`. The shortest
//! encoding wins; ties keep the earlier kind in the table.

use shared_types::{Cell, CellBuilder, CellSlice};
use std::collections::BTreeMap;

use crate::domain::{DictKey, EncodingError, DICT_KEY_BITS};

/// Bits needed to store any length in `0..=n`.
fn length_bits(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}

// =============================================================================
// BUILD
// =============================================================================

/// Build a dictionary with 256-bit keys. Returns `None` for an empty map.
pub fn build_dictionary(entries: &BTreeMap<DictKey, Cell>) -> Result<Option<Cell>, EncodingError> {
    let items: Vec<(Vec<bool>, Cell)> = entries
        .iter()
        .map(|(key, value)| (key.bits(), value.clone()))
        .collect();
    build_bits(&items, DICT_KEY_BITS)
}

/// Build a dictionary from raw bit keys of width `key_bits`.
///
/// `items` must be sorted and free of duplicates.
pub fn build_bits(items: &[(Vec<bool>, Cell)], key_bits: usize) -> Result<Option<Cell>, EncodingError> {
    if items.is_empty() {
        return Ok(None);
    }
    if let Some((key, _)) = items.iter().find(|(key, _)| key.len() != key_bits) {
        return Err(EncodingError::MalformedDictionary(format!(
            "key of {} bits in a {key_bits}-bit dictionary",
            key.len()
        )));
    }
    let refs: Vec<(&[bool], &Cell)> = items.iter().map(|(k, v)| (k.as_slice(), v)).collect();
    build_edge(&refs, key_bits).map(Some)
}

fn build_edge(items: &[(&[bool], &Cell)], n: usize) -> Result<Cell, EncodingError> {
    let prefix = common_prefix(items);
    let mut builder = CellBuilder::new();
    store_label(&mut builder, &items[0].0[..prefix], n)?;

    if prefix == n {
        if items.len() != 1 {
            return Err(EncodingError::MalformedDictionary("duplicate key".into()));
        }
        builder.store_ref(items[0].1.clone())?;
        return Ok(builder.build()?);
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    for &(key, value) in items {
        let child = (&key[prefix + 1..], value);
        if key[prefix] {
            right.push(child);
        } else {
            left.push(child);
        }
    }

    let child_bits = n - prefix - 1;
    builder.store_ref(build_edge(&left, child_bits)?)?;
    builder.store_ref(build_edge(&right, child_bits)?)?;
    Ok(builder.build()?)
}

fn common_prefix(items: &[(&[bool], &Cell)]) -> usize {
    let first = items[0].0;
    items[1..].iter().fold(first.len(), |len, (key, _)| {
        first[..len]
            .iter()
            .zip(key.iter())
            .take_while(|(a, b)| a == b)
            .count()
    })
}

fn store_label(builder: &mut CellBuilder, label: &[bool], n: usize) -> Result<(), EncodingError> {
    let m = label.len();
    let k = length_bits(n);

    let short_len = 2 * m + 2;
    let long_len = 2 + k + m;
    let same_len = 3 + k;
    let all_same = label.windows(2).all(|w| w[0] == w[1]);

    if all_same && same_len < short_len.min(long_len) {
        builder.store_uint(0b11, 2)?;
        builder.store_bit(label.first().copied().unwrap_or(false))?;
        builder.store_uint(m as u128, k)?;
    } else if long_len < short_len {
        builder.store_uint(0b10, 2)?;
        builder.store_uint(m as u128, k)?;
        builder.store_bits(label)?;
    } else {
        builder.store_bit(false)?;
        for _ in 0..m {
            builder.store_bit(true)?;
        }
        builder.store_bit(false)?;
        builder.store_bits(label)?;
    }
    Ok(())
}

// =============================================================================
// PARSE
// =============================================================================

/// Parse every entry of a dictionary with 256-bit keys.
pub fn parse_dictionary(root: &Cell) -> Result<BTreeMap<DictKey, Cell>, EncodingError> {
    let mut out = BTreeMap::new();
    for (bits, value) in parse_bits(root, DICT_KEY_BITS)? {
        let key = DictKey::from_bits(&bits)
            .ok_or_else(|| EncodingError::MalformedDictionary("bad key width".into()))?;
        out.insert(key, value);
    }
    Ok(out)
}

/// Parse every entry of a dictionary with `key_bits`-wide keys.
pub fn parse_bits(root: &Cell, key_bits: usize) -> Result<Vec<(Vec<bool>, Cell)>, EncodingError> {
    let mut out = Vec::new();
    let mut stack = vec![(root, Vec::with_capacity(key_bits), key_bits)];

    while let Some((cell, mut prefix, n)) = stack.pop() {
        let mut slice = cell.as_slice();
        let label = load_label(&mut slice, n)?;
        prefix.extend_from_slice(&label);

        if label.len() == n {
            let value = slice.load_ref()?.clone();
            out.push((prefix, value));
            continue;
        }

        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        let mut right_prefix = prefix.clone();
        right_prefix.push(true);
        prefix.push(false);

        // Right first so the left branch pops first and output stays sorted
        stack.push((right, right_prefix, n - label.len() - 1));
        stack.push((left, prefix, n - label.len() - 1));
    }

    Ok(out)
}

/// Look up a single 256-bit key without materializing the whole map.
pub fn dictionary_get(root: &Cell, key: &DictKey) -> Result<Option<Cell>, EncodingError> {
    let bits = key.bits();
    let mut remaining: &[bool] = &bits;
    let mut cell = root;

    loop {
        let mut slice = cell.as_slice();
        let label = load_label(&mut slice, remaining.len())?;
        if !remaining.starts_with(&label) {
            return Ok(None);
        }
        remaining = &remaining[label.len()..];

        if remaining.is_empty() {
            return Ok(Some(slice.load_ref()?.clone()));
        }

        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        cell = if remaining[0] { right } else { left };
        remaining = &remaining[1..];
    }
}

fn load_label(slice: &mut CellSlice<'_>, n: usize) -> Result<Vec<bool>, EncodingError> {
    let label = if !slice.load_bit()? {
        let mut m = 0usize;
        while slice.load_bit()? {
            m += 1;
            if m > n {
                break;
            }
        }
        check_label_len(m, n)?;
        slice.load_bits(m)?
    } else if !slice.load_bit()? {
        let m = slice.load_uint(length_bits(n))? as usize;
        check_label_len(m, n)?;
        slice.load_bits(m)?
    } else {
        let bit = slice.load_bit()?;
        let m = slice.load_uint(length_bits(n))? as usize;
        check_label_len(m, n)?;
        vec![bit; m]
    };
    Ok(label)
}

fn check_label_len(m: usize, n: usize) -> Result<(), EncodingError> {
    if m > n {
        return Err(EncodingError::MalformedDictionary(format!(
            "label of {m} bits exceeds remaining key width {n}"
        )));
    }
    Ok(())
}
