//! Resume digest composition.
//!
//! A resume digest is SHA-256 over a fixed 389-byte frame. Multi-byte
//! integers are big-endian.
//!
//! | offset | size | field                                                   |
//! |--------|------|---------------------------------------------------------|
//! | 0      | 64   | [`DOMAIN_TAG`], zero padded                             |
//! | 64     | 2    | canonical reference length                              |
//! | 66     | 256  | canonical reference, zero padded                        |
//! | 322    | 1    | context flag: `0x00` absent, `0x01` present             |
//! | 323    | 2    | context length, `0` when absent                         |
//! | 325    | 64   | context, zero padded                                    |
//!
//! The first field is exactly one block, so its compression is done once and
//! the resulting midstate is reused by every call.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use once_cell::sync::Lazy;
use zeroize::Zeroizing;

use crate::compare;
use crate::compress::BLOCK_SIZE;
use crate::config::{Normalization, DOMAIN_TAG, MAX_CONTEXT_LEN, MAX_REFERENCE_LEN, RESUME_DIGEST_LEN};
use crate::error::{Error, Result};
#[cfg(feature = "constant-time")]
use crate::normalize::normalize;
use crate::normalize::{normalize_vartime, normalize_with, CanonicalReference};
use crate::sha256::DigestState;
use crate::sha256core::{sha256, Sha256Core};

const REF_LEN_AT: usize = 0;
const REF_AT: usize = REF_LEN_AT + 2;
const CTX_FLAG_AT: usize = REF_AT + MAX_REFERENCE_LEN;
const CTX_LEN_AT: usize = CTX_FLAG_AT + 1;
const CTX_AT: usize = CTX_LEN_AT + 2;
const FRAME_LEN: usize = CTX_AT + MAX_CONTEXT_LEN;

static DOMAIN_MIDSTATE: Lazy<Sha256Core> = Lazy::new(|| {
    let mut block = [0u8; BLOCK_SIZE];
    block[..DOMAIN_TAG.len()].copy_from_slice(DOMAIN_TAG);
    let mut core = Sha256Core::default();
    core.compress_block(&block);
    core
});

/// ResumeDigest is the opaque 32-byte token identifying a resume point.
///
/// `==` on digests runs in constant time.
#[derive(Clone, Copy)]
pub struct ResumeDigest([u8; RESUME_DIGEST_LEN]);

impl ResumeDigest {
    /// Wraps a digest loaded from storage.
    pub fn from_bytes(bytes: [u8; RESUME_DIGEST_LEN]) -> Self {
        ResumeDigest(bytes)
    }

    /// The raw digest bytes, e.g. for storing.
    pub fn as_bytes(&self) -> &[u8; RESUME_DIGEST_LEN] {
        &self.0
    }
}

impl From<[u8; RESUME_DIGEST_LEN]> for ResumeDigest {
    fn from(bytes: [u8; RESUME_DIGEST_LEN]) -> Self {
        ResumeDigest(bytes)
    }
}

impl AsRef<[u8]> for ResumeDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for ResumeDigest {
    fn eq(&self, other: &Self) -> bool {
        compare::equal(&self.0, &other.0)
    }
}

impl Eq for ResumeDigest {}

impl fmt::Debug for ResumeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResumeDigest(")?;
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// compute hashes a canonical reference and an optional context into a
/// resume digest.
///
/// The frame has the same size for every input, so the amount of work is
/// fixed. `None` and `Some(b"")` are different contexts.
pub fn compute(reference: &CanonicalReference, context: Option<&[u8]>) -> Result<ResumeDigest> {
    let ctx = context.unwrap_or(&[]);
    if ctx.len() > MAX_CONTEXT_LEN {
        log::debug!(
            "rejecting context of {} bytes (maximum {})",
            ctx.len(),
            MAX_CONTEXT_LEN
        );
        return Err(Error::ContextTooLong {
            len: ctx.len(),
            max: MAX_CONTEXT_LEN,
        });
    }

    let mut frame = Zeroizing::new([0u8; FRAME_LEN]);
    BigEndian::write_u16(&mut frame[REF_LEN_AT..REF_AT], reference.len() as u16);
    frame[REF_AT..CTX_FLAG_AT].copy_from_slice(reference.padded());
    frame[CTX_FLAG_AT] = context.is_some() as u8;
    BigEndian::write_u16(&mut frame[CTX_LEN_AT..CTX_AT], ctx.len() as u16);
    frame[CTX_AT..CTX_AT + ctx.len()].copy_from_slice(ctx);

    let mut state = DigestState::from_midstate(DOMAIN_MIDSTATE.clone());
    state.update(&frame[..]);
    Ok(ResumeDigest(state.finalize()))
}

/// resume_hash normalizes a secret reference in constant time and computes
/// its resume digest.
#[cfg(feature = "constant-time")]
pub fn resume_hash(raw: &[u8], context: Option<&[u8]>) -> Result<ResumeDigest> {
    compute(&normalize(raw)?, context)
}

/// resume_hash_vartime is [`resume_hash`] over the fast normalizer.
///
/// **Not constant time.** Only for references that are public anyway.
pub fn resume_hash_vartime(raw: &[u8], context: Option<&[u8]>) -> Result<ResumeDigest> {
    compute(&normalize_vartime(raw)?, context)
}

/// resume_hash_with computes a resume digest using the given normalization.
pub fn resume_hash_with(
    raw: &[u8],
    context: Option<&[u8]>,
    mode: Normalization,
) -> Result<ResumeDigest> {
    compute(&normalize_with(raw, mode)?, context)
}

/// verify checks a presented reference against a stored digest.
///
/// Normalization and comparison are both constant time, so a near miss takes
/// as long as a hit or a wild guess.
#[cfg(feature = "constant-time")]
pub fn verify(raw: &[u8], context: Option<&[u8]>, expected: &ResumeDigest) -> Result<bool> {
    let actual = resume_hash(raw, context)?;
    let ok = compare::equal(actual.as_bytes(), expected.as_bytes());
    log::trace!("resume reference verified: {}", ok);
    Ok(ok)
}

/// hash_once_vartime is the unframed digest: plain SHA-256 over the canonical
/// bytes, with no domain tag and no context.
///
/// Digests stored by earlier deployments were computed this way.
///
/// **Not constant time.** Besides the fast normalizer, the number of bytes
/// hashed is the canonical length, which depends on how much whitespace and
/// how many control bytes the reference contains. Use `resume_hash` for new
/// tokens.
pub fn hash_once_vartime(raw: &[u8]) -> Result<ResumeDigest> {
    let canonical = normalize_vartime(raw)?;
    Ok(ResumeDigest(sha256(canonical.as_bytes())))
}
