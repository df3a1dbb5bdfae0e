#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail with a typed error,
    // never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(doc) = dtafilter::from_filter_text(text) {
        // A successfully parsed document must serialize, and its output must
        // parse back to the same document.
        let out = dtafilter::to_filter_text(&doc).expect("parsed document failed to serialize");
        let reparsed =
            dtafilter::from_filter_text(&out).expect("serialized document failed to reparse");
        assert_eq!(doc, reparsed);
    }
});
