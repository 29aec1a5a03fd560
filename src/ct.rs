//! Branch-free building blocks for code that handles secret bytes.
//!
//! A mask is a `u8` that is either `0x00` (false) or `0xff` (true). Every
//! helper here computes its result with arithmetic only, and masks pass
//! through [`black_box`] so the optimiser cannot turn them back into
//! branches.
//!
//! ## Leaks
//! Execution time grows with the length of the buffers involved, which is
//! considered public.

use core::hint::black_box;

/// Turns the low bit of `bit` (0 or 1) into a mask.
#[inline(always)]
fn mask(bit: u32) -> u8 {
    black_box((bit & 1) as u8).wrapping_neg()
}

/// `0xff` if `a == b`.
#[inline]
pub fn eq_u8(a: u8, b: u8) -> u8 {
    let x = (a ^ b) as u32;
    // x is at most 0xff, so x - 1 only underflows when x == 0
    mask(x.wrapping_sub(1) >> 31)
}

/// `0xff` if `a < b`.
#[inline]
pub fn lt_u8(a: u8, b: u8) -> u8 {
    mask((a as u32).wrapping_sub(b as u32) >> 31)
}

/// `0xff` if `a > b`.
#[inline]
pub fn gt_u8(a: u8, b: u8) -> u8 {
    lt_u8(b, a)
}

/// `0xff` if `lo <= x <= hi`.
#[inline]
pub fn in_range_u8(x: u8, lo: u8, hi: u8) -> u8 {
    !lt_u8(x, lo) & !gt_u8(x, hi)
}

/// `0xff` if `a == b`.
#[inline]
pub fn eq_usize(a: usize, b: usize) -> u8 {
    let x = (a ^ b) as u64;
    // (x | -x) has its top bit set iff x != 0
    mask(!(((x | x.wrapping_neg()) >> 63) as u32))
}

/// `0xff` if `a < b`. Both operands must be below 2^63.
#[inline]
pub fn lt_usize(a: usize, b: usize) -> u8 {
    mask(((a as u64).wrapping_sub(b as u64) >> 63) as u32)
}

/// Picks `a` when `m` is `0xff` and `b` when `m` is `0x00`.
#[inline]
pub fn select_u8(m: u8, a: u8, b: u8) -> u8 {
    b ^ (m & (a ^ b))
}

/// Writes `value` to `buf[pos]` when `m` is `0xff`.
///
/// Every position of `buf` is read and rewritten, so the memory access
/// pattern does not reveal `pos`. A `pos` outside the buffer writes nothing.
#[inline]
pub fn store(buf: &mut [u8], pos: usize, value: u8, m: u8) {
    for (i, slot) in buf.iter_mut().enumerate() {
        let hit = eq_usize(i, pos) & m;
        *slot = select_u8(hit, value, *slot);
    }
}
