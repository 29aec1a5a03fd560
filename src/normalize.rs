//! Canonical form of a resume reference.
//!
//! Two raw references name the same resume point iff they map to the same
//! bytes under these rules, applied per byte:
//!
//! 1. space, `\t`, `\n`, `\f` and `\r` are whitespace;
//! 2. any other byte below `0x20` is dropped;
//! 3. any byte above `0x7e` becomes `?` (one `?` per byte, so a two-byte
//!    UTF-8 character becomes `??`);
//! 4. `A`-`Z` become `a`-`z`;
//! 5. leading and trailing whitespace is removed and every inner run of
//!    whitespace becomes a single space.
//!
//! [`normalize`] and [`normalize_vartime`] implement the same rules and agree
//! on every input. Only the length is ever checked, so normalization never
//! fails on content.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};
#[cfg(feature = "constant-time")]
use zeroize::Zeroizing;

use crate::config::{Normalization, MAX_REFERENCE_LEN};
use crate::ct;
use crate::error::{Error, Result};

/// CanonicalReference is a normalized reference in a fixed-width buffer.
///
/// The canonical bytes are followed by zero padding up to
/// [`MAX_REFERENCE_LEN`]. Equality is evaluated in constant time over the
/// whole buffer. The buffer is zeroized on drop.
#[derive(Clone)]
pub struct CanonicalReference {
    bytes: [u8; MAX_REFERENCE_LEN],
    len: usize,
}

impl CanonicalReference {
    fn empty() -> Self {
        CanonicalReference {
            bytes: [0; MAX_REFERENCE_LEN],
            len: 0,
        }
    }

    /// Number of canonical bytes, not counting padding.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the reference normalized to nothing (e.g. it was all spaces).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The canonical bytes without padding.
    ///
    /// Slicing reveals the length. Prefer [`padded`](Self::padded) when the
    /// length is secret.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full fixed-width buffer, canonical bytes first, then zeros.
    pub fn padded(&self) -> &[u8; MAX_REFERENCE_LEN] {
        &self.bytes
    }
}

impl PartialEq for CanonicalReference {
    fn eq(&self, other: &Self) -> bool {
        let mut diff = 0u8;
        for (x, y) in self.bytes.iter().zip(other.bytes.iter()) {
            diff |= x ^ y;
        }
        // Fence: keep the optimiser from short-circuiting the loop.
        let diff = core::hint::black_box(diff);
        (ct::eq_u8(diff, 0) & ct::eq_usize(self.len, other.len)) == 0xff
    }
}

impl Eq for CanonicalReference {}

impl fmt::Debug for CanonicalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanonicalReference").finish_non_exhaustive()
    }
}

impl Drop for CanonicalReference {
    fn drop(&mut self) {
        self.bytes.zeroize();
        self.len.zeroize();
    }
}

impl ZeroizeOnDrop for CanonicalReference {}

fn check_length(raw: &[u8]) -> Result<()> {
    if raw.len() > MAX_REFERENCE_LEN {
        log::debug!(
            "rejecting reference of {} bytes (maximum {})",
            raw.len(),
            MAX_REFERENCE_LEN
        );
        return Err(Error::MalformedReference {
            len: raw.len(),
            max: MAX_REFERENCE_LEN,
        });
    }
    Ok(())
}

/// normalize_with brings `raw` into canonical form using the chosen path.
pub fn normalize_with(raw: &[u8], mode: Normalization) -> Result<CanonicalReference> {
    log::trace!("normalizing {} bytes ({:?})", raw.len(), mode);
    match mode {
        #[cfg(feature = "constant-time")]
        Normalization::ConstantTime => normalize(raw),
        Normalization::Vartime => normalize_vartime(raw),
    }
}

/// normalize_vartime is the fast path for references that are not secret.
///
/// **Not constant time**: it branches on every byte.
pub fn normalize_vartime(raw: &[u8]) -> Result<CanonicalReference> {
    check_length(raw)?;

    let mut out = CanonicalReference::empty();
    let mut seen_non_ws = false;
    let mut last_space = false;

    for &b in raw {
        let ch = match b {
            b' ' | b'\t' | b'\n' | 0x0c | b'\r' => b' ',
            0x00..=0x1f => continue,
            0x7f..=0xff => b'?',
            _ => b.to_ascii_lowercase(),
        };

        if ch == b' ' {
            if !seen_non_ws || last_space {
                continue;
            }
            last_space = true;
        } else {
            seen_non_ws = true;
            last_space = false;
        }

        out.bytes[out.len] = ch;
        out.len += 1;
    }

    if last_space {
        out.len -= 1;
        out.bytes[out.len] = 0;
    }

    Ok(out)
}

/// normalize is the constant-time path for secret references.
///
/// All [`MAX_REFERENCE_LEN`] positions are processed with the same operation
/// sequence; positions past `raw.len()` are masked out. Classification and
/// case folding are mask arithmetic, and each output byte is written with a
/// masked scan over the whole buffer, so neither timing nor addresses depend
/// on the content.
///
/// ## Leaks
/// Only whether `raw.len()` exceeds the maximum, which is checked up front.
#[cfg(feature = "constant-time")]
pub fn normalize(raw: &[u8]) -> Result<CanonicalReference> {
    check_length(raw)?;

    let mut input = Zeroizing::new([0u8; MAX_REFERENCE_LEN]);
    input[..raw.len()].copy_from_slice(raw);

    let mut out = CanonicalReference::empty();
    let mut len = 0usize;
    let mut seen_non_ws = 0u8;
    let mut last_space = 0u8;

    for (i, &b) in input.iter().enumerate() {
        let live = ct::lt_usize(i, raw.len());

        let is_ws = ct::eq_u8(b, b' ')
            | ct::eq_u8(b, b'\t')
            | ct::eq_u8(b, b'\n')
            | ct::eq_u8(b, 0x0c)
            | ct::eq_u8(b, b'\r');
        let is_ctrl = ct::lt_u8(b, 0x20);
        let is_high = ct::gt_u8(b, 0x7e);
        let is_upper = ct::in_range_u8(b, b'A', b'Z');

        let folded = ct::select_u8(is_high, b'?', b ^ (is_upper & 0x20));
        let ch = ct::select_u8(is_ws, b' ', folded);

        let emit_char = live & !is_ws & !is_ctrl;
        let emit_space = live & is_ws & seen_non_ws & !last_space;
        let emit = emit_char | emit_space;

        ct::store(&mut out.bytes, len, ch, emit);
        len += (emit & 1) as usize;

        seen_non_ws |= emit_char;
        last_space = ct::select_u8(emit_char, 0, ct::select_u8(emit_space, 0xff, last_space));
    }

    // a trailing space is always the last byte written
    ct::store(&mut out.bytes, len.wrapping_sub(1), 0, last_space);
    len -= (last_space & 1) as usize;
    out.len = len;

    Ok(out)
}
