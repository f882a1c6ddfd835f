//! Streaming double-SHA256 over a legacy Bitcoin transaction's wire
//! serialization.
//!
//! A previous transaction can arrive input-by-input and output-by-output
//! across many messages; [`PrevTxHasher`] reproduces
//! `version || varint(in_count) || inputs || varint(out_count) || outputs ||
//! locktime` one field at a time so the engine never has to buffer the whole
//! transaction to check it against a claimed prevout hash (invariant I10).
//!
//! Deciding *when* to write the input/output counts (only once, at index 0)
//! and comparing the referenced output's value against the spending input's
//! claimed `prev_out_value` (invariant I9) are session concerns, so they stay
//! with the caller; this type only knows the wire format.

use btcsign_core::{
    hash256::{Digest32, Hash256Writer},
    ser::{write_compact_size, write_u32_le, write_u64_le, write_varbuff, SerResult},
};
use std::io::Write;

/// Incrementally hashes a legacy transaction's serialization.
#[derive(Default)]
pub struct PrevTxHasher {
    ctx: Hash256Writer,
}

impl PrevTxHasher {
    /// Starts a fresh hasher for one previous transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the transaction version.
    pub fn write_version(&mut self, version: u32) -> SerResult<()> {
        write_u32_le(&mut self.ctx, version)
    }

    /// Feeds the input count as a compact-size integer. Call this exactly
    /// once, before the first input.
    pub fn write_input_count(&mut self, count: u64) -> SerResult<()> {
        write_compact_size(&mut self.ctx, count)
    }

    /// Feeds one input: `prev_hash(32) || prev_index(LE32) ||
    /// varint(len(sig_script)) || sig_script || sequence(LE32)`.
    pub fn write_input(
        &mut self,
        prev_out_hash: &[u8; 32],
        prev_out_index: u32,
        sig_script: &[u8],
        sequence: u32,
    ) -> SerResult<()> {
        self.ctx.write_all(prev_out_hash)?;
        write_u32_le(&mut self.ctx, prev_out_index)?;
        write_varbuff(&mut self.ctx, sig_script)?;
        write_u32_le(&mut self.ctx, sequence)
    }

    /// Feeds the output count as a compact-size integer. Call this exactly
    /// once, before the first output.
    pub fn write_output_count(&mut self, count: u64) -> SerResult<()> {
        write_compact_size(&mut self.ctx, count)
    }

    /// Feeds one output: `value(LE64) || varint(len(pk_script)) ||
    /// pk_script`.
    pub fn write_output(&mut self, value: u64, pk_script: &[u8]) -> SerResult<()> {
        write_u64_le(&mut self.ctx, value)?;
        write_varbuff(&mut self.ctx, pk_script)
    }

    /// Feeds the transaction locktime. Call this after the last output.
    pub fn write_locktime(&mut self, locktime: u32) -> SerResult<()> {
        write_u32_le(&mut self.ctx, locktime)
    }

    /// Finalizes the hasher, producing the double-SHA256 of everything
    /// written. Compare this against the referring input's `prev_out_hash`
    /// to satisfy invariant I10.
    pub fn finish(self) -> Digest32 {
        self.ctx.finish()
    }
}
