use ws_isa::*;

#[test]
fn decode_empty_is_ok() {
    assert!(decode(&[]).unwrap().is_empty());
}

#[test]
fn decode_unknown_opcode() {
    let err = decode(&[0x001]).unwrap_err();
    assert_eq!(err, DecodeError::UnknownOpcode { index: 0, code: 0x001 });
}

#[test]
fn decode_unknown_opcode_mid_stream() {
    let err = decode(&[0x100, 0x110, 0x05, 0x3FF]).unwrap_err();
    assert!(
        matches!(err, DecodeError::UnknownOpcode { index: 3, code: 0x3FF }),
        "expected UnknownOpcode at 3, got {err}"
    );
}

#[test]
fn decode_past_call_function_range() {
    // 0x300 is LOAD_MODEL, not CALL_FN_252
    let insns = decode(&[0x300]).unwrap();
    assert_eq!(insns[0].to_string(), "LOAD_MODEL");
    assert!(decode(&[0x301]).is_err());
}

#[test]
fn decode_truncated_operand() {
    let err = decode(&[0x100, 0x110]).unwrap_err();
    assert_eq!(err, DecodeError::Truncated { index: 1 });
}

#[test]
fn decode_truncated_goto() {
    let err = decode(&[0x200]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { index: 0 }));
}

#[test]
fn odd_byte_length() {
    let err = words_from_le_bytes(&[0x00, 0x01, 0x10]).unwrap_err();
    assert_eq!(err, DecodeError::OddLength(3));
    assert!(err.to_string().contains("whole number of words"));
}
