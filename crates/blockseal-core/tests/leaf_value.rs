//! Leaf values depend only on the decoded bytes of a header's `hash`.

use blockseal_core::{leaf_digest, to_prefixed_hex, Header, HeaderError};
use proptest::prelude::*;

fn header_with(number: u64, hash: String, filler: u8) -> Header {
    let f = to_prefixed_hex(&[filler; 32]);
    Header {
        number,
        hash,
        parent_hash: f.clone(),
        state_root: f.clone(),
        extrinsics_root: f,
    }
}

proptest! {
    #[test]
    fn only_hash_bytes_matter(
        bytes in prop::array::uniform32(any::<u8>()),
        n1 in any::<u64>(),
        n2 in any::<u64>(),
        f1 in any::<u8>(),
        f2 in any::<u8>(),
    ) {
        let a = header_with(n1, to_prefixed_hex(&bytes), f1);
        let b = header_with(n2, hex::encode_upper(bytes), f2);
        prop_assert_eq!(a.leaf_value().unwrap(), b.leaf_value().unwrap());
        prop_assert_eq!(a.leaf_value().unwrap(), leaf_digest(&bytes));
    }

    #[test]
    fn wrong_width_never_yields_a_leaf(len in 0usize..64) {
        prop_assume!(len != 32);
        let h = header_with(1, format!("0x{}", "7f".repeat(len)), 0);
        let is_malformed = matches!(h.leaf_value(), Err(HeaderError::MalformedHash { .. }));
        prop_assert!(is_malformed);
    }
}

#[test]
fn leaf_is_not_the_hash_itself() {
    let bytes = [0x5a; 32];
    let h = header_with(0, to_prefixed_hex(&bytes), 0);
    assert_ne!(h.leaf_value().unwrap(), bytes);
}
