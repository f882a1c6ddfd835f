//! Request types and the script-config variant dispatch they carry.

use btcsign_keypath::DerivationPath;

use crate::coin::Coin;

/// A single-sig script variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleType {
    /// Native segwit P2WPKH.
    P2wpkh,
    /// P2WPKH wrapped in a P2SH output.
    P2wpkhP2sh,
}

/// A multisig script variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultisigScriptType {
    /// Native segwit P2WSH.
    P2wsh,
    /// P2WSH wrapped in a P2SH output.
    P2wshP2sh,
}

/// The output-script shape of a concrete output, once the script config
/// variant has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Native segwit P2WPKH.
    P2wpkh,
    /// P2WPKH wrapped in a P2SH output.
    P2wpkhP2sh,
    /// Native segwit P2WSH.
    P2wsh,
    /// P2WSH wrapped in a P2SH output.
    P2wshP2sh,
}

impl OutputType {
    /// Classifies the output type of a single-sig script config.
    pub fn from_simple(simple_type: SimpleType) -> Self {
        match simple_type {
            SimpleType::P2wpkh => OutputType::P2wpkh,
            SimpleType::P2wpkhP2sh => OutputType::P2wpkhP2sh,
        }
    }

    /// Classifies the output type of a multisig script config.
    pub fn from_multisig(script_type: MultisigScriptType) -> Self {
        match script_type {
            MultisigScriptType::P2wsh => OutputType::P2wsh,
            MultisigScriptType::P2wshP2sh => OutputType::P2wshP2sh,
        }
    }
}

/// An account-level multisig descriptor.
#[derive(Debug, Clone)]
pub struct MultisigConfig {
    /// Whether the resulting output is native or P2SH-wrapped.
    pub script_type: MultisigScriptType,
    /// The number of signatures required.
    pub threshold: u32,
    /// The cosigners' extended public keys, in script order.
    pub xpubs: Vec<String>,
    /// This signer's index into `xpubs`.
    pub our_xpub_index: u32,
}

/// The tagged union of script-config variants: `Simple(simple_type) |
/// Multisig(cfg)`.
#[derive(Debug, Clone)]
pub enum ScriptConfigKind {
    /// A single-sig account.
    Simple(SimpleType),
    /// A multisig account.
    Multisig(MultisigConfig),
}

/// An account-level script descriptor: the keypath prefix every input and
/// "ours" output under this account must extend, plus the variant dispatch.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// The BIP-32 path every keypath referencing this account must start with.
    pub keypath_prefix: DerivationPath,
    /// The script variant.
    pub config: ScriptConfigKind,
}

/// `init`'s request: the whole transaction's shape and its account-level
/// script configs.
#[derive(Debug, Clone)]
pub struct SignInit {
    /// The coin this session signs for.
    pub coin: Coin,
    /// The script configs referenced by `script_config_index` on inputs and
    /// outputs.
    pub script_configs: Vec<ScriptConfig>,
    /// The transaction version (1 or 2).
    pub version: u32,
    /// The number of inputs that will be streamed.
    pub num_inputs: u32,
    /// The number of outputs that will be streamed.
    pub num_outputs: u32,
    /// The transaction locktime.
    pub locktime: u32,
}

/// `prevtx_init`'s request: the shape of the previous transaction a
/// referencing input is about to stream.
#[derive(Debug, Clone, Copy)]
pub struct PrevTxInit {
    /// The previous transaction's version.
    pub version: u32,
    /// The previous transaction's input count.
    pub num_inputs: u32,
    /// The previous transaction's output count.
    pub num_outputs: u32,
    /// The previous transaction's locktime.
    pub locktime: u32,
}

/// `prevtx_input`'s request: one input of the streamed previous transaction.
#[derive(Debug, Clone)]
pub struct PrevTxInput {
    /// The 32-byte (internal byte order) previous output hash this input spends.
    pub prev_out_hash: [u8; 32],
    /// The index of the previous output this input spends.
    pub prev_out_index: u32,
    /// This input's signature script.
    pub signature_script: Vec<u8>,
    /// This input's sequence number.
    pub sequence: u32,
}

/// `prevtx_output`'s request: one output of the streamed previous transaction.
#[derive(Debug, Clone)]
pub struct PrevTxOutput {
    /// The output's value, in satoshis.
    pub value: u64,
    /// The output's scriptPubKey.
    pub pubkey_script: Vec<u8>,
}

/// `input_pass1`/`input_pass2`'s request: one input of the transaction being
/// signed. The host resends the same fields for both passes.
#[derive(Debug, Clone)]
pub struct SignInput {
    /// The 32-byte previous output hash this input spends.
    pub prev_out_hash: [u8; 32],
    /// The index of the previous output this input spends.
    pub prev_out_index: u32,
    /// The value, in satoshis, the host claims this input spends.
    pub prev_out_value: u64,
    /// This input's sequence number.
    pub sequence: u32,
    /// This input's full BIP-32 keypath.
    pub keypath: DerivationPath,
    /// The script config this input's keypath belongs to.
    pub script_config_index: u32,
    /// The host's anti-klepto nonce commitment, if this input's signature
    /// should use the commit-reveal protocol.
    pub host_nonce_commitment: Option<[u8; 32]>,
}

/// `output`'s request: one output of the transaction being signed.
#[derive(Debug, Clone)]
pub struct SignOutput {
    /// Whether this output pays back into this wallet (a change output).
    pub ours: bool,
    /// The output's script shape, as claimed by the host. Ignored (and
    /// recomputed) when `ours` is set.
    pub output_type: OutputType,
    /// The output's value, in satoshis.
    pub value: u64,
    /// The output's script payload, as claimed by the host. Ignored (and
    /// rederived from the keystore) when `ours` is set.
    pub payload: Vec<u8>,
    /// The output's keypath. Only meaningful when `ours` is set.
    pub keypath: DerivationPath,
    /// The script config this output's keypath belongs to. Only meaningful
    /// when `ours` is set.
    pub script_config_index: u32,
}

/// `antiklepto`'s request: the host's revealed nonce.
#[derive(Debug, Clone, Copy)]
pub struct AntiKleptoSignatureRequest {
    /// The host's nonce, revealed after receiving the signer's commitment.
    pub host_nonce: [u8; 32],
}

/// The RBF-signaling state of the session, surfaced to the locktime/RBF
/// confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RbfFlag {
    /// No input signaled RBF.
    #[default]
    Off,
    /// At least one input signaled RBF and the coin supports it.
    On,
    /// At least one input's sequence made the locktime apply, but the coin
    /// does not support RBF; shown to the user as a forced override.
    Disabled,
}
