use digest::{
    block_buffer::Eager,
    core_api::{Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore},
    crypto_common::{Block, BlockSizeUser},
    typenum::{U32, U64},
    HashMarker, Output, OutputSizeUser, Reset,
};

use byteorder::{BigEndian, ByteOrder};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::compress::{compress, BLOCK_SIZE, DIGEST_SIZE, H0};

/// Sha256 is the buffered hasher over [`Sha256Core`], usable through the
/// `digest` traits.
pub type Sha256 = CoreWrapper<Sha256Core>;

/// Sha256Core is the block-level SHA-256 state: the chaining value and the
/// number of blocks compressed so far.
#[derive(Clone)]
pub struct Sha256Core {
    h: [u32; 8], // hash chain (from last compression, or IV)
    block_len: u64,
}

impl Sha256Core {
    pub(crate) fn compress_block(&mut self, block: &[u8]) {
        self.block_len += 1;
        compress(&mut self.h, block);
    }

    /// Total number of message bits absorbed, given `pending` buffered bytes.
    pub(crate) fn bit_len(&self, pending: usize) -> u64 {
        (self.block_len * BLOCK_SIZE as u64 + pending as u64) << 3
    }

    pub(crate) fn write_output(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), DIGEST_SIZE);
        BigEndian::write_u32_into(&self.h, out);
    }
}

impl Default for Sha256Core {
    fn default() -> Self {
        Self { h: H0, block_len: 0 }
    }
}

impl Reset for Sha256Core {
    fn reset(&mut self) {
        self.h = H0;
        self.block_len = 0;
    }
}

impl HashMarker for Sha256Core {}

impl BlockSizeUser for Sha256Core {
    type BlockSize = U64;
}

impl BufferKindUser for Sha256Core {
    type BufferKind = Eager;
}

impl OutputSizeUser for Sha256Core {
    type OutputSize = U32;
}

impl FixedOutputCore for Sha256Core {
    fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
        let bitlen = self.bit_len(buffer.get_pos());
        buffer.len64_padding_be(bitlen, |b| compress(&mut self.h, b));

        self.write_output(out);
    }
}

impl UpdateCore for Sha256Core {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        for b in blocks {
            self.compress_block(b)
        }
    }
}

impl Drop for Sha256Core {
    fn drop(&mut self) {
        self.h.zeroize();
        self.block_len.zeroize();
    }
}

impl ZeroizeOnDrop for Sha256Core {}

/// sha256 returns the SHA-256 checksum of `data`.
pub fn sha256(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut state = crate::sha256::DigestState::init();
    state.update(data);
    state.finalize()
}
