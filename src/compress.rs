use byteorder::{BigEndian, ByteOrder};
use zeroize::Zeroize;

/// Block size, in bytes, of the SHA-256 compression function.
pub const BLOCK_SIZE: usize = 64;

/// The size in bytes of a SHA-256 checksum.
pub const DIGEST_SIZE: usize = 32;

/// Initial hash value H(0): first 32 bits of the fractional parts of the
/// square roots of the first eight primes.
pub const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Round constants: first 32 bits of the fractional parts of the cube roots
/// of the first 64 primes.
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[inline(always)]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// compress absorbs one 64-byte block into the chaining value `state`.
///
/// The sequence of operations is the same for every block: all indices are
/// round numbers, never message bytes, and there is no branch on the data.
pub fn compress(state: &mut [u32; 8], block: &[u8]) {
    if block.len() != BLOCK_SIZE {
        panic!(
            "could not compress block. input size is wrong. size is {:?}, expected {:?}",
            block.len(),
            BLOCK_SIZE
        );
    }

    let mut w = [0u32; 64];
    BigEndian::read_u32_into(block, &mut w[..16]);
    for i in 16..64 {
        w[i] = small_sigma1(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }

    let mut v = *state;
    for i in 0..64 {
        let [a, b, c, d, e, f, g, h] = v;
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));
        v = [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g];
    }

    state
        .iter_mut()
        .zip(v.iter())
        .for_each(|(s, x)| *s = s.wrapping_add(*x));

    w.zeroize();
    v.zeroize();
}

#[cfg(test)]
pub mod test {
    use super::*;
    use rand::Rng;
    use sha2::digest::generic_array::GenericArray;

    #[test]
    fn compression_matches_reference() {
        let mut rnd = rand::thread_rng();

        (0..1000).for_each(|_| {
            let mut block = [0u8; BLOCK_SIZE];
            rnd.fill(&mut block[..]);
            let mut ours = H0;
            let mut theirs = H0;

            compress(&mut ours, &block);
            sha2::compress256(&mut theirs, &[GenericArray::clone_from_slice(&block)]);

            assert_eq!(ours, theirs, "compression outputs are different");
        });
    }

    #[test]
    fn chaining_value_changes_every_block() {
        let mut state = H0;
        let block = [0u8; BLOCK_SIZE];
        compress(&mut state, &block);
        let first = state;
        compress(&mut state, &block);
        assert_ne!(first, H0);
        assert_ne!(state, first);
    }

    #[test]
    #[should_panic(expected = "input size is wrong")]
    fn short_block_is_rejected() {
        let mut state = H0;
        compress(&mut state, &[0u8; BLOCK_SIZE - 1]);
    }
}
