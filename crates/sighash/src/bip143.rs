//! The BIP-143 sighash preimage, per
//! <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki>.
//!
//! Only `SIGHASH_ALL` is implemented; `ANYONECANPAY` and the other sighash
//! flags are out of scope for this engine.

use btcsign_core::{
    hash256::{Digest32, Hash256Writer},
    ser::{write_u32_le, write_u64_le},
};
use std::io::Write;

/// The only sighash flag this engine supports.
pub const SIGHASH_ALL: u32 = 0x01;

/// The inputs to a single BIP-143 sighash computation.
///
/// `hash_prevouts`, `hash_sequence`, and `hash_outputs` must already be the
/// finalized (double-SHA256'd) digests of the whole transaction's inputs and
/// outputs; `sighash_script` must already carry its own length prefix (see
/// [`crate::script_code`]).
#[derive(Debug, Clone, Copy)]
pub struct Bip143Args<'a> {
    /// The transaction version.
    pub version: u32,
    /// `hashPrevouts`: double-SHA256 of all outpoints being spent.
    pub hash_prevouts: &'a Digest32,
    /// `hashSequence`: double-SHA256 of all input sequence numbers.
    pub hash_sequence: &'a Digest32,
    /// The outpoint (prevout txid) of the input being signed.
    pub outpoint_hash: &'a [u8; 32],
    /// The outpoint (prevout vout) of the input being signed.
    pub outpoint_index: u32,
    /// The scriptCode for this input, already length-prefixed.
    pub sighash_script: &'a [u8],
    /// The value, in satoshis, of the output being spent.
    pub prevout_value: u64,
    /// This input's sequence number.
    pub sequence: u32,
    /// `hashOutputs`: double-SHA256 of all transaction outputs.
    pub hash_outputs: &'a Digest32,
    /// The transaction locktime.
    pub locktime: u32,
}

/// Computes the BIP-143 sighash digest for one input.
///
/// This is a pure function: it holds no state and performs no I/O beyond
/// writing into an in-memory incremental hasher.
pub fn bip143_sighash(args: &Bip143Args<'_>) -> Digest32 {
    let mut w = Hash256Writer::default();
    write_u32_le(&mut w, args.version).expect("hasher writes are infallible");
    w.write_all(args.hash_prevouts).expect("hasher writes are infallible");
    w.write_all(args.hash_sequence).expect("hasher writes are infallible");
    w.write_all(args.outpoint_hash).expect("hasher writes are infallible");
    write_u32_le(&mut w, args.outpoint_index).expect("hasher writes are infallible");
    w.write_all(args.sighash_script).expect("hasher writes are infallible");
    write_u64_le(&mut w, args.prevout_value).expect("hasher writes are infallible");
    write_u32_le(&mut w, args.sequence).expect("hasher writes are infallible");
    w.write_all(args.hash_outputs).expect("hasher writes are infallible");
    write_u32_le(&mut w, args.locktime).expect("hasher writes are infallible");
    write_u32_le(&mut w, SIGHASH_ALL).expect("hasher writes are infallible");
    w.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::script_code::p2wpkh_script_code;

    // Exercises the preimage construction machinery end to end against a
    // hand-assembled (but internally consistent) set of digests and a
    // P2WPKH scriptCode. This does not reproduce the BIP-143 mediawiki
    // worked example verbatim (that requires the full reference
    // transaction bytes); it checks that the writer produces a stable,
    // order-sensitive digest over a realistic field layout.
    #[test]
    fn it_is_deterministic_over_a_bip143_shaped_preimage() {
        let hash_prevouts: Digest32 = [0x96; 32];
        let hash_sequence: Digest32 = [0x52; 32];
        let hash_outputs: Digest32 = [0x86; 32];

        let pubkey_hash160 = [0x79u8; 20];
        let script_code = p2wpkh_script_code(&pubkey_hash160);

        let outpoint_hash = [0x11u8; 32];
        let args = Bip143Args {
            version: 1,
            hash_prevouts: &hash_prevouts,
            hash_sequence: &hash_sequence,
            outpoint_hash: &outpoint_hash,
            outpoint_index: 0,
            sighash_script: &script_code,
            prevout_value: 600_000_000,
            sequence: 0xffff_ffee,
            hash_outputs: &hash_outputs,
            locktime: 1170,
        };

        let first = bip143_sighash(&args);
        let second = bip143_sighash(&args);
        assert_eq!(first, second, "sighash must be deterministic for fixed inputs");
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn changing_any_field_changes_the_sighash() {
        let hash_prevouts = [0u8; 32];
        let hash_sequence = [0u8; 32];
        let hash_outputs = [0u8; 32];
        let outpoint_hash = [0u8; 32];
        let script_code = p2wpkh_script_code(&[0u8; 20]);

        let base = Bip143Args {
            version: 2,
            hash_prevouts: &hash_prevouts,
            hash_sequence: &hash_sequence,
            outpoint_hash: &outpoint_hash,
            outpoint_index: 0,
            sighash_script: &script_code,
            prevout_value: 100_000,
            sequence: 0xffff_ffff,
            hash_outputs: &hash_outputs,
            locktime: 0,
        };
        let base_digest = bip143_sighash(&base);

        let mut changed = base;
        changed.prevout_value = 100_001;
        assert_ne!(base_digest, bip143_sighash(&changed));

        let mut changed = base;
        changed.locktime = 1;
        assert_ne!(base_digest, bip143_sighash(&changed));

        let mut changed = base;
        changed.sequence = 0xffff_fffe;
        assert_ne!(base_digest, bip143_sighash(&changed));
    }
}
