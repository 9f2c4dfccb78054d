#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // Two oracles: never panic on malformed input, and stay lossless — the
    // tree must render back to exactly the source text.
    let result = onyx_syntax::parse(text);
    assert_eq!(result.syntax().to_string(), text, "parse lost source text");
});
