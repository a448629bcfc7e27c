use ws_isa::*;

/// Decode `words`, re-encode them, and check both the words and the listing
/// text survive unchanged.
pub fn assert_roundtrip(words: &[u16]) {
    let decoded = decode(words).unwrap();
    let encoded = encode(&decoded).unwrap();
    assert_eq!(encoded, words, "word mismatch for {decoded:?}");

    let text = format_listing(&decoded, None);
    let reparsed = parse_listing(&text).unwrap();
    assert_eq!(reparsed, decoded, "listing mismatch:\n{text}");
}
