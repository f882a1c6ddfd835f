//! # btcsign-core
//!
//! Shared serialization and hashing primitives used by every layer of the
//! sign engine: `btcsign-keypath`, `btcsign-sighash`, and `btcsign-engine`.
//!
//! ## Crate Layout
//!
//! ### `ser`
//!
//! A small `ByteFormat`-style trait for writing Bitcoin's little-endian
//! integers and compact-size (varint) length prefixes to any `std::io::Write`.
//! Every accumulator in this workspace is fed through these helpers so that
//! no field is ever serialized relying on host byte order.
//!
//! ### `hash256`
//!
//! An incremental double-SHA256 writer. Bitcoin's TXIDs, sighash digests, and
//! the BIP-143 `hashPrevouts`/`hashSequence`/`hashOutputs` accumulators are
//! all the same primitive: feed bytes in as they arrive, then finish with a
//! second SHA256 pass over the first digest.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod hash256;
pub mod ser;
