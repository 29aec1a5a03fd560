use byteorder::{BigEndian, ByteOrder};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::compress::{BLOCK_SIZE, DIGEST_SIZE};
use crate::sha256core::Sha256Core;

/// DigestState is one in-progress SHA-256 computation.
///
/// The lifecycle is `init` → `update`* → `finalize`. `finalize` takes the
/// state by value, so a finalized state can never absorb more input or be
/// finalized twice. The chaining value and the partial block are zeroized
/// when the state is dropped, including right after `finalize`.
///
/// A state is owned by exactly one computation. Independent states share
/// nothing and can run on different threads.
pub struct DigestState {
    core: Sha256Core,
    x: [u8; BLOCK_SIZE], // data written since last compression
    nx: usize,           // number of input bytes written since last compression
}

impl DigestState {
    /// init returns a fresh state holding the SHA-256 initial hash value.
    pub fn init() -> Self {
        Self::from_midstate(Sha256Core::default())
    }

    /// from_midstate resumes hashing from a core that has already absorbed
    /// some whole blocks, e.g. a fixed domain prefix.
    pub(crate) fn from_midstate(core: Sha256Core) -> Self {
        DigestState {
            core,
            x: [0; BLOCK_SIZE],
            nx: 0,
        }
    }

    /// update absorbs `p`. Full blocks are compressed as soon as they are
    /// complete, the remainder stays buffered.
    ///
    /// Only the length of `p` decides how the input is split; its content
    /// never influences control flow.
    pub fn update(&mut self, mut p: &[u8]) {
        // Check if the new length (in bits) overflows the 64-bit counter.
        let written = self.core.bit_len(self.nx) >> 3;
        if p.len() as u64 >= (1 << 61) - written {
            panic!(
                "length overflow: already wrote {} bytes, trying to write {} bytes",
                written,
                p.len()
            );
        }

        if self.nx > 0 {
            // continue with existing buffer, if nonempty
            let n = (BLOCK_SIZE - self.nx).min(p.len());
            self.x[self.nx..self.nx + n].copy_from_slice(&p[..n]);
            self.nx += n;
            if self.nx == BLOCK_SIZE {
                self.core.compress_block(&self.x);
                self.nx = 0;
            }
            p = &p[n..];
        }

        // handle any remaining full input blocks
        let mut blocks = p.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            self.core.compress_block(block);
        }

        // handle any remaining input
        let rest = blocks.remainder();
        if !rest.is_empty() {
            self.x[..rest.len()].copy_from_slice(rest);
            self.nx = rest.len();
        }
    }

    /// finalize applies the standard SHA-256 padding and returns the digest.
    pub fn finalize(mut self) -> [u8; DIGEST_SIZE] {
        let mut out = [0u8; DIGEST_SIZE];
        self.finalize_into(&mut out);
        out
    }

    fn finalize_into(&mut self, out: &mut [u8; DIGEST_SIZE]) {
        let bitlen = self.core.bit_len(self.nx);

        // Padding. Add a 1 bit and 0 bits until 56 bytes mod 64.
        let mut tmp = [0u8; BLOCK_SIZE];
        tmp[0] = 0x80;
        if self.nx < 56 {
            self.update(&tmp[0..56 - self.nx]);
        } else {
            self.update(&tmp[0..BLOCK_SIZE + 56 - self.nx]);
        }

        // Write length in bits, big-endian.
        BigEndian::write_u64(&mut tmp[0..], bitlen);
        self.update(&tmp[0..8]);

        if self.nx != 0 {
            // buffer must be empty now
            panic!("d.nx != 0")
        }

        self.core.write_output(out);
    }
}

impl Default for DigestState {
    fn default() -> Self {
        Self::init()
    }
}

impl Drop for DigestState {
    fn drop(&mut self) {
        self.x.zeroize();
        self.nx.zeroize();
    }
}

impl ZeroizeOnDrop for DigestState {}

#[cfg(test)]
pub mod test {
    use std::io::Write;

    use super::*;
    use anyhow::Result;
    use sha3::{
        digest::{ExtendableOutput, XofReader},
        Shake256,
    };

    fn shake_input(seed: &str, len: usize) -> Vec<u8> {
        let mut input = vec![0; len];
        let mut v = Shake256::default();
        v.write_all(seed.as_bytes()).unwrap();
        v.finalize_xof().read(&mut input);
        input
    }

    #[test]
    fn known_answers() -> Result<()> {
        let mut d = DigestState::init();
        d.update(b"");
        assert_eq!(
            hex::encode(d.finalize()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        let mut d = DigestState::init();
        d.update(b"abc");
        let result =
            hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")?;
        assert_eq!(d.finalize().to_vec(), result);

        Ok(())
    }

    #[test]
    fn split_writes_match_single_write() {
        let input = shake_input("digest state", 777);
        let expected = <sha2::Sha256 as sha2::Digest>::digest(&input);

        for split in [1, 7, 55, 56, 63, 64, 65, 128, 500] {
            let mut d = DigestState::init();
            input.chunks(split).for_each(|c| d.update(c));
            assert_eq!(
                d.finalize().as_slice(),
                expected.as_slice(),
                "chunk size {} changed the digest",
                split
            );
        }
    }

    #[test]
    fn padding_boundaries() {
        for l in 50..140 {
            let input = shake_input("padding", l);
            let mut d = DigestState::init();
            d.update(&input);
            let expected = <sha2::Sha256 as sha2::Digest>::digest(&input);
            assert_eq!(d.finalize().as_slice(), expected.as_slice(), "length {}", l);
        }
    }

    #[test]
    fn midstate_resumes_after_whole_block() {
        let input = shake_input("midstate", 64 + 21);

        let mut core = Sha256Core::default();
        core.compress_block(&input[..64]);
        let mut resumed = DigestState::from_midstate(core);
        resumed.update(&input[64..]);

        let mut d = DigestState::init();
        d.update(&input);

        assert_eq!(resumed.finalize(), d.finalize());
    }

    #[test]
    fn states_are_independent_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let input = shake_input("threads", 100 + i);
                    let mut d = DigestState::init();
                    d.update(&input);
                    (input, d.finalize())
                })
            })
            .collect();

        for h in handles {
            let (input, sum) = h.join().unwrap();
            let expected = <sha2::Sha256 as sha2::Digest>::digest(&input);
            assert_eq!(sum.as_slice(), expected.as_slice());
        }
    }
}
