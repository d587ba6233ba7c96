use proptest::prelude::*;

use sts_codecs::DeflateCodec;
use sts_core::container;
use sts_core::format::MAX_NAME_LEN;
use sts_core::{Header, StsError, HEADER_SIZE};

proptest! {
    #[test]
    fn container_round_trips(data in proptest::collection::vec(any::<u8>(), 0..8192), name in "[a-z0-9._-]{0,40}") {
        let codec = DeflateCodec::default();
        let bytes = container::compress(&codec, &data, &name).unwrap().to_bytes();
        let out = container::decompress(&codec, &bytes).unwrap();
        prop_assert_eq!(out.data, data);
        prop_assert_eq!(out.header.original_name, name);
    }

    #[test]
    fn header_decode_inverts_encode(
        original_size in any::<u64>(),
        compressed_size in any::<u64>(),
        name in "\\PC{0,300}",
    ) {
        let h = Header::new(original_size, compressed_size, &name);
        prop_assert!(h.original_name.len() <= MAX_NAME_LEN);
        prop_assert!(name.starts_with(h.original_name.as_str()));
        prop_assert_eq!(Header::from_bytes(&h.to_bytes()).unwrap(), h);
    }

    #[test]
    fn short_input_is_always_too_small(data in proptest::collection::vec(any::<u8>(), 0..HEADER_SIZE)) {
        let result = container::decompress(&DeflateCodec::default(), &data);
        prop_assert!(
            matches!(result, Err(StsError::TooSmall { .. })),
            "expected TooSmall, got {:?}",
            result
        );
    }

    #[test]
    fn arbitrary_bytes_never_panic(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let _ = container::decompress(&DeflateCodec::default(), &data);
        let _ = container::inspect(&data, data.len() as u64);
    }
}
