#![warn(missing_docs)]
//! Constant-time hashing of resume references.
//!
//! A resume reference is an identifier or token that lets a client pick up an
//! interrupted transfer, session or checkpoint. This crate turns such a
//! reference into a 32-byte digest, and checks a presented reference against a
//! stored digest, without letting the running time depend on the content of
//! the reference. An attacker timing the check learns nothing about how close
//! a guess was.
//!
//! The pipeline is: [`normalize`](normalize::normalize) the raw reference into
//! a fixed-width [`CanonicalReference`], [`compute`] a SHA-256 digest over a
//! fixed frame carrying a domain tag and an optional context, and compare
//! digests with [`equal`]. SHA-256 itself is implemented in this crate and is
//! also available through the RustCrypto `digest` traits as [`Sha256`].
//!
//! Functions whose name ends in `_vartime`, and [`equal_partial`], are fast
//! paths with **no** timing guarantee. The constant-time names are only
//! available with the `constant-time` feature (on by default), so disabling it
//! turns accidental use into a compile error rather than a silent downgrade.
//!
//! # Example
//! ```
//! use ct_resume_hash::{resume_hash, verify};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!   let stored = resume_hash(b"Upload 9F2C", Some(b"tenant-7"))?;
//!   println!("Stored: {:?}", stored);
//!
//!   assert!(verify(b"  upload 9f2c\n", Some(b"tenant-7"), &stored)?);
//!   assert!(!verify(b"upload 9f2d", Some(b"tenant-7"), &stored)?);
//!
//!   Ok(())
//! }
//! ```
/// `compare` holds the digest comparators.
pub mod compare;
/// `compress` is the SHA-256 compression function.
pub mod compress;
/// `config` holds the length bounds, the domain tag and the normalization selector.
pub mod config;
/// `ct` holds branch-free mask helpers for code touching secret bytes.
pub mod ct;
/// `error` is the error taxonomy of the crate.
pub mod error;
/// `normalize` brings raw references into canonical form.
pub mod normalize;
/// `resume` composes and verifies resume digests.
pub mod resume;
/// `sha256` is the explicit streaming SHA-256 state.
pub mod sha256;
/// `sha256core` adapts the compression function to the `digest` core API.
pub mod sha256core;
/// `stream` accumulates a reference delivered in chunks.
pub mod stream;
#[cfg(all(test, feature = "constant_time_tests"))]
mod timing;

pub use compare::{equal, equal_partial};
pub use config::{Normalization, MAX_CONTEXT_LEN, MAX_REFERENCE_LEN, RESUME_DIGEST_LEN};
pub use error::{Error, Result};
#[cfg(feature = "constant-time")]
pub use normalize::normalize;
pub use normalize::{normalize_vartime, normalize_with, CanonicalReference};
#[cfg(feature = "constant-time")]
pub use resume::{resume_hash, verify};
pub use resume::{compute, hash_once_vartime, resume_hash_vartime, resume_hash_with, ResumeDigest};
pub use sha256::DigestState;
pub use sha256core::{sha256, Sha256, Sha256Core};
pub use stream::ResumeHasher;
