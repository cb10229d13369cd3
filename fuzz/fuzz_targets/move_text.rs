#![no_main]
use attrlift::markup::parse_with_config;
use attrlift::{move_text_to_attribute, Dialect, ParserConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&seed, rest)) = data.split_first() else {
        return;
    };
    if let Ok(s) = std::str::from_utf8(rest) {
        let offset = usize::from(seed).min(s.len());
        if let Ok(Some(out)) = move_text_to_attribute(s, offset, Dialect::Xml) {
            let config = ParserConfig::default().with_duplicate_attributes(true);
            assert!(parse_with_config(&out, config).is_ok(), "edit produced unparsable output");
        }
    }
});
