//! `scriptCode` construction for the sighash preimage.
//!
//! BIP-143 signs over a `scriptCode` rather than the spent output's
//! `scriptPubKey` directly, so it can differ for P2WSH (the full redeem
//! script) even though P2WPKH reuses the familiar P2PKH template. Both
//! variants here already carry their own compact-size length prefix, matching
//! [`Bip143Args::sighash_script`](crate::bip143::Bip143Args::sighash_script).

use btcsign_core::ser::write_varbuff;

/// Builds the scriptCode for a native P2WPKH input:
/// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`, length-prefixed.
///
/// This is the same 25-byte template as a legacy P2PKH scriptPubKey; BIP-143
/// reuses it verbatim as the "implicit" scriptCode for a P2WPKH output.
pub fn p2wpkh_script_code(pubkey_hash160: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(0x76); // OP_DUP
    script.push(0xa9); // OP_HASH160
    script.push(0x14); // push 20 bytes
    script.extend_from_slice(pubkey_hash160);
    script.push(0x88); // OP_EQUALVERIFY
    script.push(0xac); // OP_CHECKSIG

    let mut out = Vec::with_capacity(1 + script.len());
    write_varbuff(&mut out, &script).expect("writing to a Vec is infallible");
    out
}

/// Length-prefixes a caller-supplied multisig redeem script for use as a
/// P2WSH scriptCode. The redeem script itself is validated and assembled by
/// the engine's `ScriptConfigValidator` collaborator; this only applies the
/// compact-size wrapper BIP-143 requires.
pub fn wrap_varbuff_script_code(redeem_script: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(9 + redeem_script.len());
    write_varbuff(&mut out, redeem_script).expect("writing to a Vec is infallible");
    out
}
