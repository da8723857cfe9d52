//! Fuzz target for the inventory access documents.
//!
//! Goal: The parsers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_access_documents
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Snapshot documents are JSON, so only UTF-8 input is interesting
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = bucketguard_inventory::fuzz::parse_public_access_block(text);
        let _ = bucketguard_inventory::fuzz::parse_acl(text);
        let _ = bucketguard_inventory::fuzz::parse_policy(text);
    }
});
