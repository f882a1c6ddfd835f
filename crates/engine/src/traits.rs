//! The collaborator ports (capability records) the session controller is
//! generic over.
//!
//! None of these traits have a production implementation in this crate: the
//! keystore's key material, the UI's display and input hardware, and the
//! coin-specific script/address formatting all live outside the signing
//! core. Tests substitute deterministic stubs recording their call arguments.

use btcsign_core::hash256::Digest32;
use btcsign_keypath::DerivationPath;

use crate::coin::Coin;
use crate::error::SignError;
use crate::types::{MultisigConfig, OutputType};

/// Holds (or has access to) key material; never touched directly by the
/// session controller beyond these four operations.
pub trait Keystore {
    /// Derives the 20-byte HASH160 of the compressed public key at `keypath`.
    fn pubkey_hash160(&self, keypath: &DerivationPath) -> Result<[u8; 20], SignError>;

    /// Signs `sighash` with the key at `keypath`, using the legacy
    /// (non-anti-klepto) protocol.
    fn sign(
        &self,
        keypath: &DerivationPath,
        sighash: &Digest32,
        nonce_contribution: [u8; 32],
    ) -> Result<[u8; 64], SignError>;

    /// Commits to a signer nonce for `sighash`, binding to the host's
    /// `host_commitment`. Returns the 33-byte signer commitment; the actual
    /// signature follows in a later call to [`Keystore::antiklepto_sign`].
    fn antiklepto_commit(
        &self,
        keypath: &DerivationPath,
        sighash: &Digest32,
        host_commitment: &[u8; 32],
    ) -> Result<[u8; 33], SignError>;

    /// Completes an anti-klepto signature after the host reveals its nonce.
    fn antiklepto_sign(&self, host_nonce: &[u8; 32]) -> Result<[u8; 64], SignError>;
}

/// Blocks on user confirmation and reports session status; the session
/// controller treats every method as a synchronous call from its own
/// single-threaded viewpoint (see the concurrency model).
pub trait Ui {
    /// Shows a recipient address and formatted amount; `false` aborts.
    fn verify_recipient(&self, address: &str, amount: &str) -> bool;

    /// Shows the formatted total spend and fee; `false` aborts.
    fn verify_total(&self, total: &str, fee: &str) -> bool;

    /// Shown once, only when more than one output is classified `ours`;
    /// `false` aborts.
    fn confirm_multiple_change_outputs(&self, num_changes: u16) -> bool;

    /// Shown when a non-zero locktime applies or RBF was signaled; `false`
    /// aborts.
    fn confirm_locktime_rbf(&self, locktime: u32, rbf_flag: crate::types::RbfFlag) -> bool;

    /// Reports terminal session status ("Transaction confirmed" / "Transaction
    /// canceled") to the user. Never blocks and cannot itself abort.
    fn status(&self, message: &str, success: bool);
}

/// Validates a full set of script configs against coin-specific policy at
/// `init` time (account-prefix shape, multisig threshold bounds, and so on).
pub trait ScriptConfigValidator {
    /// Returns `Ok(())` if every config in `configs` is well-formed for `coin`.
    fn validate(&self, coin: Coin, configs: &[crate::types::ScriptConfig]) -> Result<(), SignError>;
}

/// Builds and reads back the script payloads and addresses the output
/// pipeline needs, plus amount formatting.
pub trait OutputCodec {
    /// Formats `value` (in satoshis) under `unit` for display.
    fn format_amount(&self, value: u64, unit: &str) -> String;

    /// Formats a display address from a resolved output payload.
    fn address_from_payload(
        &self,
        coin: Coin,
        output_type: OutputType,
        payload: &[u8],
    ) -> Result<String, SignError>;

    /// Builds the scriptPubKey for a resolved output payload.
    fn pkscript_from_payload(
        &self,
        coin: Coin,
        output_type: OutputType,
        payload: &[u8],
    ) -> Result<Vec<u8>, SignError>;

    /// Builds the full multisig witness script for a given (change,
    /// address_index) pair. Used, wrapped by a length prefix, as the
    /// BIP-143 scriptCode when signing a multisig input — distinct from
    /// [`OutputCodec::payload_from_multisig`], which builds the shorter
    /// output payload (the witness program) rather than the script itself.
    fn pkscript_from_multisig(
        &self,
        cfg: &MultisigConfig,
        change: bool,
        address_index: u32,
    ) -> Result<Vec<u8>, SignError>;

    /// Builds the output payload for a single-sig "ours" output from its
    /// pubkey hash.
    fn payload_from_pubkeyhash(&self, hash160: [u8; 20]) -> Vec<u8>;

    /// Builds the output payload (witness program) for a multisig "ours"
    /// output at a given (change, address_index) pair, passed on to
    /// [`OutputCodec::pkscript_from_payload`] to build the actual
    /// scriptPubKey.
    fn payload_from_multisig(
        &self,
        cfg: &MultisigConfig,
        change: bool,
        address_index: u32,
    ) -> Result<Vec<u8>, SignError>;
}
