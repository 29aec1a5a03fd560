#![no_main]
extern crate arbitrary;
extern crate ct_resume_hash;

use libfuzzer_sys::fuzz_target;

use ct_resume_hash::{equal, normalize_vartime, resume_hash, verify};

#[derive(arbitrary::Arbitrary, Debug)]
pub struct Input {
    pub a: Box<[u8]>,
    pub b: Box<[u8]>,
    pub context: Option<Box<[u8]>>,
}

fuzz_target!(|input: Input| {
    let context = input.context.as_deref();
    let (Ok(ha), Ok(hb)) = (resume_hash(&input.a, context), resume_hash(&input.b, context)) else {
        return;
    };

    let same_canonical = normalize_vartime(&input.a).unwrap() == normalize_vartime(&input.b).unwrap();
    if same_canonical {
        assert!(equal(ha.as_bytes(), hb.as_bytes()));
    }
    assert_eq!(verify(&input.b, context, &ha).unwrap(), equal(ha.as_bytes(), hb.as_bytes()));
});
