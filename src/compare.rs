use core::hint::black_box;

use crate::config::RESUME_DIGEST_LEN;

/// equal reports whether two digests are identical, in constant time.
///
/// All 32 byte pairs are XORed and OR-accumulated before the single reduction
/// to `bool`, so the running time does not depend on where (or whether) the
/// digests differ.
///
/// ```rust
/// use ct_resume_hash::compare::equal;
/// let a = [0u8; 32];
/// let mut b = [0u8; 32];
/// assert!(equal(&a, &b));
/// b[31] = 1;
/// assert!(!equal(&a, &b));
/// ```
#[inline]
pub fn equal(a: &[u8; RESUME_DIGEST_LEN], b: &[u8; RESUME_DIGEST_LEN]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    // Fence: keep the optimiser from short-circuiting the loop.
    let diff = black_box(diff) as u32;
    // diff - 1 only underflows when diff == 0
    (diff.wrapping_sub(1) >> 31) == 1
}

/// equal_partial compares two byte strings of any length.
///
/// **Not constant time.** It returns at the first differing byte and on a
/// length mismatch. Only use it for values that are public anyway; nothing
/// inside this crate calls it.
pub fn equal_partial(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// [test::equal_runs_in_constant_time] runs a statistical test that the
/// position of the first differing byte does not correlate with run time.
#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn identical_digests() {
        let d = [0xa5u8; RESUME_DIGEST_LEN];
        assert!(equal(&d, &d));
        assert!(equal(&[0u8; 32], &[0u8; 32]));
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let a = [0x3cu8; RESUME_DIGEST_LEN];
        for i in 0..RESUME_DIGEST_LEN {
            for bit in 0..8 {
                let mut b = a;
                b[i] ^= 1 << bit;
                assert!(!equal(&a, &b), "flip of bit {} in byte {} missed", bit, i);
                assert!(!equal(&b, &a));
            }
        }
    }

    #[test]
    fn partial_is_plain_equality() {
        assert!(equal_partial(b"abc", b"abc"));
        assert!(!equal_partial(b"abc", b"abd"));
        assert!(!equal_partial(b"abc", b"ab"));
        assert!(equal_partial(b"", b""));
    }

    #[cfg(feature = "constant_time_tests")]
    #[test]
    fn equal_runs_in_constant_time() {
        use core::hint::black_box;
        use std::time::Instant;

        // Half the samples differ in the first byte, half in the last.
        let n: usize = 1E6 as usize;
        let secret = [0x5au8; RESUME_DIGEST_LEN];
        let mut early = secret;
        early[0] ^= 1;
        let mut late = secret;
        late[RESUME_DIGEST_LEN - 1] ^= 1;

        let correlation = crate::timing::correlation(n, |class| {
            let candidate = if class { early } else { late };
            let now = Instant::now();
            equal(black_box(&secret), black_box(&candidate));
            now.elapsed()
        });
        println!("correlation: {:.6?}", correlation);
        assert!(
            correlation.abs() < 0.01,
            "execution time correlates with mismatch position"
        );
    }
}
