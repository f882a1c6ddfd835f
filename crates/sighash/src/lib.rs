//! BIP-143 (segwit) sighash construction and previous-transaction streaming
//! hashing.
//!
//! Neither [`bip143_sighash`] nor [`PrevTxHasher`] hold any session state of
//! their own: the sign engine owns the accumulators and the phase ordering,
//! and calls into this crate with explicit arguments for each field it has
//! on hand. This mirrors how the wider workspace's transaction types keep
//! sighash construction ("write the preimage to a writer, then finish it")
//! separate from the request/response plumbing that drives it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bip143;
pub mod prevtx;
pub mod script_code;

pub use bip143::{bip143_sighash, Bip143Args, SIGHASH_ALL};
pub use prevtx::PrevTxHasher;
pub use script_code::{p2wpkh_script_code, wrap_varbuff_script_code};
