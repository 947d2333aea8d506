//! Property tests for signing and verification.

use doc_signer::{digest_bytes, digest_source, sign_bytes, verify_bytes, ChunkedReader, KeyManager};
use proptest::prelude::*;
use std::io::Cursor;
use std::sync::OnceLock;

fn keys() -> &'static KeyManager {
    static KEYS: OnceLock<KeyManager> = OnceLock::new();
    KEYS.get_or_init(|| KeyManager::initialize().unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn signed_documents_verify(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let signature = sign_bytes(keys(), &data).unwrap();
        prop_assert!(verify_bytes(keys(), &data, signature.as_str()));
    }

    #[test]
    fn single_bit_flip_breaks_signature(
        data in proptest::collection::vec(any::<u8>(), 1..2048),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let signature = sign_bytes(keys(), &data).unwrap();
        let mut mutated = data.clone();
        mutated[index.index(data.len())] ^= 1 << bit;
        prop_assert!(!verify_bytes(keys(), &mutated, signature.as_str()));
    }

    #[test]
    fn different_documents_do_not_cross_verify(
        a in proptest::collection::vec(any::<u8>(), 0..256),
        b in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(a != b);
        let signature = sign_bytes(keys(), &b).unwrap();
        prop_assert!(!verify_bytes(keys(), &a, signature.as_str()));
    }

    #[test]
    fn arbitrary_signature_text_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        text in ".*",
    ) {
        prop_assert!(!verify_bytes(keys(), &data, &text));
    }

    #[test]
    fn chunked_digest_matches_buffered(
        data in proptest::collection::vec(any::<u8>(), 0..8192),
        chunk_size in 1usize..1024,
    ) {
        let mut source = ChunkedReader::with_chunk_size(Cursor::new(&data), chunk_size);
        prop_assert_eq!(digest_source(&mut source).unwrap(), digest_bytes(&data));
    }
}
