#![no_main]

use libfuzzer_sys::fuzz_target;
use symremap::customdebuginfo::{
    encode_iterator_class, encode_iterator_scopes, parse_custom_metadata, CustomMetadata,
};

fuzz_target!(|data: &[u8]| {
    let Ok(records) = parse_custom_metadata(data) else {
        return;
    };

    // A single decoded iterator record must re-encode to the exact input
    if let [record] = records.as_slice() {
        let encoded = match record {
            CustomMetadata::IteratorClass { name } => encode_iterator_class(name).ok(),
            CustomMetadata::IteratorScopes { scopes } => encode_iterator_scopes(scopes).ok(),
            CustomMetadata::Unknown { .. } => None,
        };
        if let Some(encoded) = encoded {
            assert_eq!(encoded, data);
        }
    }
});
