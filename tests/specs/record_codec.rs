//! Record Codec specifications.

use rlog_core::CommandRecord;

#[test]
fn a_query_record_round_trips_through_the_wire_format() {
    let record = CommandRecord::Query(rlog_core::QueryRequest {
        statements: vec!["SELECT 1".to_string()],
        timings: true,
    });
    let bytes = rlog_wire::encode(&record);
    let decoded = rlog_wire::decode(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn an_unrecognized_tag_decodes_to_unknown_instead_of_erroring() {
    // Hand-build an envelope with a tag byte the codec has never heard of.
    let mut bytes = vec![0xEFu8, 0x00];
    bytes.extend_from_slice(&0u32.to_be_bytes());
    let decoded = rlog_wire::decode(&bytes).unwrap();
    assert_eq!(decoded, CommandRecord::Unknown { tag: 0xEF });
}

#[test]
fn a_compressed_envelope_is_transparently_decompressed() {
    let record = CommandRecord::Noop;
    // Noop's sub-command is empty; compress it anyway to exercise the path.
    let compressed = zstd::stream::encode_all(&b""[..], 3).unwrap();
    let mut bytes = vec![5u8, 1u8]; // tag=Noop, compressed=1
    bytes.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&compressed);

    let decoded = rlog_wire::decode(&bytes).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn a_length_mismatch_is_rejected_rather_than_silently_truncated() {
    let mut bytes = vec![5u8, 0u8];
    bytes.extend_from_slice(&10u32.to_be_bytes());
    bytes.extend_from_slice(b"short"); // only 5 bytes, not 10
    assert!(rlog_wire::decode(&bytes).is_err());
}
