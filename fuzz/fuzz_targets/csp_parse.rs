#![no_main]
//! CSP parsing fuzzing
//!
//! The parser must never panic, and any policy it accepts must render and
//! reparse to the same value.

use libfuzzer_sys::fuzz_target;

use auditdash_security::ContentSecurityPolicy;

fuzz_target!(|data: &[u8]| {
    let input = match std::str::from_utf8(data) {
        Ok(input) => input,
        Err(_) => return,
    };
    // Skip excessively large inputs to prevent timeout
    if input.len() > 50_000 {
        return;
    }

    if let Ok(policy) = ContentSecurityPolicy::parse(input) {
        let rendered = policy.header_value();
        let reparsed =
            ContentSecurityPolicy::parse(&rendered).expect("accepted policy must reparse");
        assert_eq!(reparsed.header_value(), rendered);
    }
});
