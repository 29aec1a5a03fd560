/// Upper bound, in bytes, on a raw resume reference.
///
/// The canonical form is never longer than the raw input, so this is also the
/// fixed width of [`CanonicalReference`](crate::normalize::CanonicalReference).
pub const MAX_REFERENCE_LEN: usize = 256;

/// Upper bound, in bytes, on the optional context.
pub const MAX_CONTEXT_LEN: usize = 64;

/// The size in bytes of a resume digest.
pub const RESUME_DIGEST_LEN: usize = 32;

/// Domain separation tag. It is zero padded to one SHA-256 block when framed.
pub const DOMAIN_TAG: &[u8] = b"ct-resume-hash/v1/resume-digest";

/// Selects how a raw reference is brought into canonical form.
///
/// Both modes produce byte-identical output. They differ only in whether the
/// work done depends on the reference's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Data-independent time and memory access. Use for secret references.
    #[cfg(feature = "constant-time")]
    ConstantTime,
    /// Ordinary branching. Only for references that are public anyway.
    Vartime,
}

impl Default for Normalization {
    #[cfg(feature = "constant-time")]
    fn default() -> Self {
        Normalization::ConstantTime
    }

    #[cfg(not(feature = "constant-time"))]
    fn default() -> Self {
        Normalization::Vartime
    }
}
