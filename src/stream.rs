use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{Normalization, MAX_CONTEXT_LEN, MAX_REFERENCE_LEN};
use crate::error::{Error, Result};
use crate::normalize::normalize_with;
use crate::resume::{compute, ResumeDigest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Finalized,
}

/// ResumeHasher accumulates a raw reference that arrives in pieces and
/// produces the same digest as the one-shot functions.
///
/// Input is kept in a fixed [`MAX_REFERENCE_LEN`] buffer that is zeroized on
/// finalize and on drop. Calling [`update`](Self::update) or
/// [`finalize`](Self::finalize) after a successful or failed finalize is a
/// programming error and panics.
///
/// ```rust
/// use ct_resume_hash::{resume_hash, ResumeHasher};
///
/// let mut h = ResumeHasher::new(Some(b"session-1")).unwrap();
/// h.update(b"Hello").unwrap();
/// h.update(b"\nWorld").unwrap();
/// let streamed = h.finalize().unwrap();
///
/// assert_eq!(streamed, resume_hash(b"hello world", Some(b"session-1")).unwrap());
/// ```
pub struct ResumeHasher {
    buf: [u8; MAX_REFERENCE_LEN],
    len: usize,
    context: [u8; MAX_CONTEXT_LEN],
    context_len: Option<usize>,
    mode: Normalization,
    phase: Phase,
}

impl ResumeHasher {
    /// new returns a hasher bound to `context` using the default
    /// normalization.
    pub fn new(context: Option<&[u8]>) -> Result<Self> {
        Self::with_normalization(context, Normalization::default())
    }

    /// with_normalization returns a hasher bound to `context` using `mode`.
    pub fn with_normalization(context: Option<&[u8]>, mode: Normalization) -> Result<Self> {
        let mut h = ResumeHasher {
            buf: [0; MAX_REFERENCE_LEN],
            len: 0,
            context: [0; MAX_CONTEXT_LEN],
            context_len: None,
            mode,
            phase: Phase::Absorbing,
        };

        if let Some(ctx) = context {
            if ctx.len() > MAX_CONTEXT_LEN {
                return Err(Error::ContextTooLong {
                    len: ctx.len(),
                    max: MAX_CONTEXT_LEN,
                });
            }
            h.context[..ctx.len()].copy_from_slice(ctx);
            h.context_len = Some(ctx.len());
        }

        Ok(h)
    }

    /// update appends `chunk` to the reference.
    ///
    /// A chunk that would take the reference past [`MAX_REFERENCE_LEN`] is
    /// rejected as a whole and the hasher keeps what it had.
    pub fn update(&mut self, chunk: &[u8]) -> Result<()> {
        self.check_absorbing("update after finalize");

        if chunk.len() > MAX_REFERENCE_LEN - self.len {
            log::debug!(
                "rejecting chunk of {} bytes: {} of {} already buffered",
                chunk.len(),
                self.len,
                MAX_REFERENCE_LEN
            );
            return Err(Error::MalformedReference {
                len: self.len + chunk.len(),
                max: MAX_REFERENCE_LEN,
            });
        }

        self.buf[self.len..self.len + chunk.len()].copy_from_slice(chunk);
        self.len += chunk.len();
        Ok(())
    }

    /// finalize normalizes the buffered reference and returns its digest.
    ///
    /// The buffer is wiped before returning, whatever the outcome.
    pub fn finalize(&mut self) -> Result<ResumeDigest> {
        self.check_absorbing("finalize called twice");
        self.phase = Phase::Finalized;

        let canonical = normalize_with(&self.buf[..self.len], self.mode);
        self.buf.zeroize();
        self.len = 0;

        let context = self.context_len.map(|n| &self.context[..n]);
        compute(&canonical?, context)
    }

    fn check_absorbing(&self, what: &'static str) {
        if self.phase != Phase::Absorbing {
            panic!("{}", Error::StateMisuse(what));
        }
    }
}

impl Drop for ResumeHasher {
    fn drop(&mut self) {
        self.buf.zeroize();
        self.len.zeroize();
        self.context.zeroize();
    }
}

impl ZeroizeOnDrop for ResumeHasher {}
