#![no_main]
extern crate ct_resume_hash;

use libfuzzer_sys::fuzz_target;

use ct_resume_hash::{normalize, normalize_vartime};

fuzz_target!(|data: &[u8]| {
    match (normalize(data), normalize_vartime(data)) {
        (Ok(slow), Ok(fast)) => {
            assert_eq!(slow.as_bytes(), fast.as_bytes());
            assert_eq!(slow.padded(), fast.padded());
            // canonical form is a fixed point
            let again = normalize(slow.as_bytes()).unwrap();
            assert_eq!(again, slow);
        }
        (Err(a), Err(b)) => assert_eq!(a, b),
        _ => panic!("normalization paths disagree on {} bytes", data.len()),
    }
});
