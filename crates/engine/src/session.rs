//! The session controller: the phase-tagged state machine driving a single
//! Bitcoin sign session from `init` through its terminal signature or error.

use std::io::Write as _;

use btcsign_core::{
    hash256::{Digest32, Hash256Writer},
    ser::{write_u32_le, write_u64_le, write_varbuff},
};
use btcsign_keypath::{is_valid_account_keypath, DerivationPath, CHANGE_INDEX};
use btcsign_sighash::{bip143_sighash, p2wpkh_script_code, wrap_varbuff_script_code, Bip143Args, PrevTxHasher};

use crate::coin::{coin_params, Coin, CoinParams};
use crate::error::SignError;
use crate::traits::{Keystore, OutputCodec, ScriptConfigValidator, Ui};
use crate::types::{
    AntiKleptoSignatureRequest, PrevTxInit, PrevTxInput, PrevTxOutput, RbfFlag, ScriptConfig,
    ScriptConfigKind, SignInit, SignInput, SignOutput,
};

/// The tagged phase a session is in. The `u32` payload, where present, names
/// the next input/output index the corresponding operation must be called
/// with; sub-stream position within a prev-tx's inputs/outputs is tracked
/// inside [`PrevTxState`] instead, since it doesn't gate which *operation*
/// is expected next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Awaiting `init`. Also the state after a reset.
    Init,
    /// Awaiting `input_pass1` for input `_0`.
    InputPass1(u32),
    /// Awaiting `prevtx_init` for the previous transaction of input `_0`.
    PrevTxInit(u32),
    /// Awaiting `prevtx_input` messages for the previous transaction of input `_0`.
    PrevTxInput(u32),
    /// Awaiting `prevtx_output` messages for the previous transaction of input `_0`.
    PrevTxOutput(u32),
    /// Awaiting `output` for output `_0`.
    Output(u32),
    /// Awaiting `input_pass2` for input `_0`.
    InputPass2(u32),
    /// Awaiting `antiklepto` for input `_0`.
    Antiklepto(u32),
    /// Terminal: every input has been signed.
    Done,
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Init => "Init",
        Phase::InputPass1(_) => "InputPass1",
        Phase::PrevTxInit(_) => "PrevTxInit",
        Phase::PrevTxInput(_) => "PrevTxInput",
        Phase::PrevTxOutput(_) => "PrevTxOutput",
        Phase::Output(_) => "Output",
        Phase::InputPass2(_) => "InputPass2",
        Phase::Antiklepto(_) => "Antiklepto",
        Phase::Done => "Done",
    }
}

/// The input fields a prev-tx stream must bind against, captured by
/// `input_pass1` and consumed across the following `prevtx_*` calls.
#[derive(Debug, Clone, Copy)]
struct ReferencingInput {
    prev_out_hash: [u8; 32],
    prev_out_index: u32,
    prev_out_value: u64,
}

/// Live only while streaming one input's previous transaction.
struct PrevTxState {
    num_inputs: u32,
    num_outputs: u32,
    locktime: u32,
    hasher: PrevTxHasher,
    referencing_input: ReferencingInput,
    next_input_idx: u32,
    next_output_idx: u32,
}

/// What `input_pass2` produced: either a finished signature, or (when the
/// request carried an anti-klepto host commitment) a signer commitment
/// awaiting the follow-up `antiklepto` call.
#[derive(Debug, Clone, Copy)]
pub enum SignOutcome {
    /// A finished 64-byte compact signature.
    Signature([u8; 64]),
    /// A 33-byte anti-klepto signer commitment; call `antiklepto` next.
    Commitment([u8; 33]),
}

/// The Bitcoin sign session controller.
///
/// Generic over its four collaborators so tests can substitute deterministic
/// stubs; see the `Keystore`, `Ui`, `ScriptConfigValidator`, and
/// `OutputCodec` traits.
pub struct Session<K, U, V, C> {
    keystore: K,
    ui: U,
    validator: V,
    codec: C,

    phase: Phase,

    coin: Option<Coin>,
    coin_params: Option<CoinParams>,
    script_configs: Vec<ScriptConfig>,
    version: u32,
    locktime: u32,
    num_inputs: u32,
    num_outputs: u32,

    rbf_flag: RbfFlag,
    locktime_applies: bool,

    inputs_sum_pass1: u64,
    inputs_sum_pass2: u64,
    outputs_sum_ours: u64,
    outputs_sum_out: u64,
    num_changes: u16,

    hash_prevouts_ctx: Option<Hash256Writer>,
    hash_sequence_ctx: Option<Hash256Writer>,
    hash_outputs_ctx: Option<Hash256Writer>,
    hash_prevouts: Option<Digest32>,
    hash_sequence: Option<Digest32>,
    hash_outputs: Option<Digest32>,

    prevtx: Option<PrevTxState>,
    pending_referencing_input: Option<ReferencingInput>,
    current_input_last: bool,
}

impl<K, U, V, C> Session<K, U, V, C>
where
    K: Keystore,
    U: Ui,
    V: ScriptConfigValidator,
    C: OutputCodec,
{
    /// Builds a new, un-initialized session around the given collaborators.
    pub fn new(keystore: K, ui: U, validator: V, codec: C) -> Self {
        Self {
            keystore,
            ui,
            validator,
            codec,
            phase: Phase::Init,
            coin: None,
            coin_params: None,
            script_configs: Vec::new(),
            version: 0,
            locktime: 0,
            num_inputs: 0,
            num_outputs: 0,
            rbf_flag: RbfFlag::Off,
            locktime_applies: false,
            inputs_sum_pass1: 0,
            inputs_sum_pass2: 0,
            outputs_sum_ours: 0,
            outputs_sum_out: 0,
            num_changes: 0,
            hash_prevouts_ctx: None,
            hash_sequence_ctx: None,
            hash_outputs_ctx: None,
            hash_prevouts: None,
            hash_sequence: None,
            hash_outputs: None,
            prevtx: None,
            pending_referencing_input: None,
            current_input_last: false,
        }
    }

    fn wrong_phase(&self, expected: &'static str) -> SignError {
        tracing::error!(expected, actual = phase_name(self.phase), "operation invoked out of phase");
        SignError::WrongPhase {
            expected,
            actual: phase_name(self.phase),
        }
    }

    fn reset(&mut self) {
        tracing::warn!(phase = phase_name(self.phase), "session reset");
        self.reset_state();
        self.phase = Phase::Init;
    }

    /// Common tail of every public operation: on error, reports a canceled
    /// status if the session was aborted by the user, then resets.
    fn finish<T>(&mut self, result: Result<T, SignError>) -> Result<T, SignError> {
        if let Err(ref e) = result {
            if matches!(e, SignError::UserAbort) {
                self.ui.status("Transaction canceled", false);
            }
            self.reset();
        }
        result
    }

    fn reset_state(&mut self) {
        self.coin = None;
        self.coin_params = None;
        self.script_configs.clear();
        self.version = 0;
        self.locktime = 0;
        self.num_inputs = 0;
        self.num_outputs = 0;
        self.rbf_flag = RbfFlag::Off;
        self.locktime_applies = false;
        self.inputs_sum_pass1 = 0;
        self.inputs_sum_pass2 = 0;
        self.outputs_sum_ours = 0;
        self.outputs_sum_out = 0;
        self.num_changes = 0;
        self.hash_prevouts_ctx = None;
        self.hash_sequence_ctx = None;
        self.hash_outputs_ctx = None;
        self.hash_prevouts = None;
        self.hash_sequence = None;
        self.hash_outputs = None;
        self.prevtx = None;
        self.pending_referencing_input = None;
        self.current_input_last = false;
    }

    /// The session's current phase, for diagnostics and tests.
    fn phase_name(&self) -> &'static str {
        phase_name(self.phase)
    }

    /// Initializes a new session, discarding any in-progress one.
    pub fn init(&mut self, req: SignInit) -> Result<(), SignError> {
        let result = self.try_init(req);
        self.finish(result)
    }

    fn try_init(&mut self, req: SignInit) -> Result<(), SignError> {
        if req.locktime >= 500_000_000 {
            return Err(SignError::LocktimeTooHigh(req.locktime));
        }
        if req.version != 1 && req.version != 2 {
            return Err(SignError::UnsupportedVersion(req.version));
        }
        if req.num_inputs < 1 {
            return Err(SignError::NoInputs);
        }
        if req.num_outputs < 1 {
            return Err(SignError::NoOutputs);
        }
        let coin_params = coin_params(req.coin).ok_or(SignError::UnknownCoin)?;
        self.validator.validate(req.coin, &req.script_configs)?;

        self.reset_state();
        self.coin = Some(req.coin);
        self.coin_params = Some(coin_params);
        self.script_configs = req.script_configs;
        self.version = req.version;
        self.locktime = req.locktime;
        self.num_inputs = req.num_inputs;
        self.num_outputs = req.num_outputs;
        self.phase = Phase::InputPass1(0);
        tracing::debug!(phase = self.phase_name(), "session initialized");
        Ok(())
    }

    fn script_config(&self, index: u32) -> Result<&ScriptConfig, SignError> {
        self.script_configs
            .get(index as usize)
            .ok_or(SignError::ScriptConfigIndexOutOfRange(index))
    }

    fn validate_sign_input(&self, req: &SignInput) -> Result<(), SignError> {
        if req.prev_out_value == 0 {
            return Err(SignError::ZeroValue);
        }
        if req.sequence < 0xFFFF_FFFD {
            return Err(SignError::InvalidSequence(req.sequence));
        }
        let cfg = self.script_config(req.script_config_index)?;
        if !is_valid_account_keypath(&cfg.keypath_prefix, &req.keypath, false) {
            return Err(SignError::KeypathInvalid);
        }
        Ok(())
    }

    /// Updates `rbf_flag`/`locktime_applies` from a validated input's
    /// sequence number. Assumes `validate_sign_input` already rejected any
    /// sequence below the minimum this engine accepts.
    fn apply_sequence(&mut self, sequence: u32) {
        if sequence == 0xFFFF_FFFD {
            let coin_params = self.coin_params.expect("coin set at init");
            if coin_params.rbf_support {
                self.rbf_flag = RbfFlag::On;
            }
        }
        if sequence < 0xFFFF_FFFF {
            self.locktime_applies = true;
        }
    }

    /// Validates and accumulates one input of pass 1.
    pub fn input_pass1(&mut self, req: SignInput, last: bool) -> Result<(), SignError> {
        let result = self.try_input_pass1(req, last);
        self.finish(result)
    }

    fn try_input_pass1(&mut self, req: SignInput, last: bool) -> Result<(), SignError> {
        let expected_idx = match self.phase {
            Phase::InputPass1(idx) => idx,
            _ => return Err(self.wrong_phase("InputPass1")),
        };

        self.validate_sign_input(&req)?;
        self.apply_sequence(req.sequence);
        self.inputs_sum_pass1 = self
            .inputs_sum_pass1
            .checked_add(req.prev_out_value)
            .ok_or(SignError::Overflow)?;

        let mut hp = self.hash_prevouts_ctx.take().unwrap_or_default();
        hp.write_all(&req.prev_out_hash)
            .expect("writing to an in-memory hasher is infallible");
        write_u32_le(&mut hp, req.prev_out_index).expect("writing to an in-memory hasher is infallible");
        self.hash_prevouts_ctx = Some(hp);

        let mut hs = self.hash_sequence_ctx.take().unwrap_or_default();
        write_u32_le(&mut hs, req.sequence).expect("writing to an in-memory hasher is infallible");
        self.hash_sequence_ctx = Some(hs);

        self.pending_referencing_input = Some(ReferencingInput {
            prev_out_hash: req.prev_out_hash,
            prev_out_index: req.prev_out_index,
            prev_out_value: req.prev_out_value,
        });

        if last {
            let hp = self.hash_prevouts_ctx.take().expect("just set above");
            self.hash_prevouts = Some(hp.finish());
            let hs = self.hash_sequence_ctx.take().expect("just set above");
            self.hash_sequence = Some(hs.finish());
        }

        self.phase = Phase::PrevTxInit(expected_idx);
        tracing::debug!(phase = self.phase_name(), input = expected_idx, "input pass 1 accepted");
        Ok(())
    }

    /// Starts streaming the previous transaction of the input just accepted
    /// by `input_pass1`.
    pub fn prevtx_init(&mut self, req: PrevTxInit) -> Result<(), SignError> {
        let result = self.try_prevtx_init(req);
        self.finish(result)
    }

    fn try_prevtx_init(&mut self, req: PrevTxInit) -> Result<(), SignError> {
        let input_idx = match self.phase {
            Phase::PrevTxInit(idx) => idx,
            _ => return Err(self.wrong_phase("PrevTxInit")),
        };
        if req.num_inputs < 1 {
            return Err(SignError::NoInputs);
        }
        if req.num_outputs < 1 {
            return Err(SignError::NoOutputs);
        }

        let referencing_input = self
            .pending_referencing_input
            .take()
            .expect("input_pass1 always runs before PrevTxInit for the same input");

        let mut hasher = PrevTxHasher::new();
        hasher
            .write_version(req.version)
            .expect("writing to an in-memory hasher is infallible");

        self.prevtx = Some(PrevTxState {
            num_inputs: req.num_inputs,
            num_outputs: req.num_outputs,
            locktime: req.locktime,
            hasher,
            referencing_input,
            next_input_idx: 0,
            next_output_idx: 0,
        });

        self.phase = Phase::PrevTxInput(input_idx);
        Ok(())
    }

    /// Feeds one input of the streamed previous transaction.
    pub fn prevtx_input(&mut self, req: PrevTxInput) -> Result<(), SignError> {
        let result = self.try_prevtx_input(req);
        self.finish(result)
    }

    fn try_prevtx_input(&mut self, req: PrevTxInput) -> Result<(), SignError> {
        let input_idx = match self.phase {
            Phase::PrevTxInput(idx) => idx,
            _ => return Err(self.wrong_phase("PrevTxInput")),
        };
        let prevtx = self
            .prevtx
            .as_mut()
            .expect("PrevTxInput phase implies prevtx state");

        if prevtx.next_input_idx == 0 {
            prevtx
                .hasher
                .write_input_count(prevtx.num_inputs as u64)
                .expect("writing to an in-memory hasher is infallible");
        }
        prevtx
            .hasher
            .write_input(&req.prev_out_hash, req.prev_out_index, &req.signature_script, req.sequence)
            .expect("writing to an in-memory hasher is infallible");
        prevtx.next_input_idx += 1;

        if prevtx.next_input_idx == prevtx.num_inputs {
            self.phase = Phase::PrevTxOutput(input_idx);
        }
        Ok(())
    }

    /// Feeds one output of the streamed previous transaction. When this is
    /// the final output, finalizes the hash and checks it against the
    /// referencing input's claimed `prev_out_hash` (I10).
    pub fn prevtx_output(&mut self, req: PrevTxOutput) -> Result<(), SignError> {
        let result = self.try_prevtx_output(req);
        self.finish(result)
    }

    fn try_prevtx_output(&mut self, req: PrevTxOutput) -> Result<(), SignError> {
        let input_idx = match self.phase {
            Phase::PrevTxOutput(idx) => idx,
            _ => return Err(self.wrong_phase("PrevTxOutput")),
        };

        let finished;
        {
            let prevtx = self
                .prevtx
                .as_mut()
                .expect("PrevTxOutput phase implies prevtx state");

            if prevtx.next_output_idx == 0 {
                prevtx
                    .hasher
                    .write_output_count(prevtx.num_outputs as u64)
                    .expect("writing to an in-memory hasher is infallible");
            }
            if prevtx.next_output_idx == prevtx.referencing_input.prev_out_index
                && req.value != prevtx.referencing_input.prev_out_value
            {
                return Err(SignError::PrevOutValueMismatch);
            }
            prevtx
                .hasher
                .write_output(req.value, &req.pubkey_script)
                .expect("writing to an in-memory hasher is infallible");
            prevtx.next_output_idx += 1;

            finished = prevtx.next_output_idx == prevtx.num_outputs;
            if finished {
                prevtx
                    .hasher
                    .write_locktime(prevtx.locktime)
                    .expect("writing to an in-memory hasher is infallible");
            }
        }

        if finished {
            let prevtx = self.prevtx.take().expect("set just above");
            let digest = prevtx.hasher.finish();
            if digest != prevtx.referencing_input.prev_out_hash {
                return Err(SignError::PrevTxHashMismatch);
            }
            self.phase = if input_idx + 1 == self.num_inputs {
                Phase::Output(0)
            } else {
                Phase::InputPass1(input_idx + 1)
            };
        }
        Ok(())
    }

    fn resolve_ours_payload(&self, req: &SignOutput, cfg: &ScriptConfig) -> Result<(Vec<u8>, crate::types::OutputType), SignError> {
        if !is_valid_account_keypath(&cfg.keypath_prefix, &req.keypath, true) {
            return Err(SignError::KeypathInvalid);
        }
        let slice = req.keypath.as_slice();
        let change = slice[slice.len() - 2] == CHANGE_INDEX;
        let address_index = slice[slice.len() - 1];

        match &cfg.config {
            ScriptConfigKind::Simple(simple_type) => {
                let hash160 = self
                    .keystore
                    .pubkey_hash160(&req.keypath)
                    .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
                let payload = self.codec.payload_from_pubkeyhash(hash160);
                Ok((payload, crate::types::OutputType::from_simple(*simple_type)))
            }
            ScriptConfigKind::Multisig(ms) => {
                let payload = self
                    .codec
                    .payload_from_multisig(ms, change, address_index)
                    .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
                Ok((payload, crate::types::OutputType::from_multisig(ms.script_type)))
            }
        }
    }

    /// Validates, classifies, and accounts for one output; on the last
    /// output, runs the final confirmation and fee-disclosure gate.
    pub fn output(&mut self, req: SignOutput, last: bool) -> Result<(), SignError> {
        let result = self.try_output(req, last);
        self.finish(result)
    }

    fn try_output(&mut self, req: SignOutput, last: bool) -> Result<(), SignError> {
        let idx = match self.phase {
            Phase::Output(idx) => idx,
            _ => return Err(self.wrong_phase("Output")),
        };
        if req.value == 0 {
            return Err(SignError::ZeroValue);
        }

        let coin = self.coin.expect("coin set at init");

        let (payload, output_type) = if req.ours {
            let cfg = self.script_config(req.script_config_index)?.clone();
            self.resolve_ours_payload(&req, &cfg)?
        } else {
            (req.payload.clone(), req.output_type)
        };

        if req.ours {
            self.outputs_sum_ours = self
                .outputs_sum_ours
                .checked_add(req.value)
                .ok_or(SignError::Overflow)?;
            self.num_changes = self.num_changes.checked_add(1).ok_or(SignError::Overflow)?;
        } else {
            self.outputs_sum_out = self
                .outputs_sum_out
                .checked_add(req.value)
                .ok_or(SignError::Overflow)?;
            let address = self
                .codec
                .address_from_payload(coin, output_type, &payload)
                .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
            let unit = self.coin_params.expect("coin set at init").unit;
            let amount = self.codec.format_amount(req.value, unit);
            if !self.ui.verify_recipient(&address, &amount) {
                return Err(SignError::UserAbort);
            }
        }

        let pkscript = self
            .codec
            .pkscript_from_payload(coin, output_type, &payload)
            .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;

        let mut ho = self.hash_outputs_ctx.take().unwrap_or_default();
        write_u64_le(&mut ho, req.value).expect("writing to an in-memory hasher is infallible");
        write_varbuff(&mut ho, &pkscript).expect("writing to an in-memory hasher is infallible");
        self.hash_outputs_ctx = Some(ho);

        if last {
            self.finalize_outputs()?;
            self.phase = Phase::InputPass2(0);
        } else {
            self.phase = Phase::Output(idx + 1);
        }
        Ok(())
    }

    fn finalize_outputs(&mut self) -> Result<(), SignError> {
        if self.num_changes > 1 && !self.ui.confirm_multiple_change_outputs(self.num_changes) {
            return Err(SignError::UserAbort);
        }

        if self.locktime > 0 && (self.locktime_applies || self.rbf_flag == RbfFlag::On) {
            let coin_params = self.coin_params.expect("coin set at init");
            if !coin_params.rbf_support {
                self.rbf_flag = RbfFlag::Disabled;
            }
            if !self.ui.confirm_locktime_rbf(self.locktime, self.rbf_flag) {
                return Err(SignError::UserAbort);
            }
        }

        let total_out = self
            .inputs_sum_pass1
            .checked_sub(self.outputs_sum_ours)
            .ok_or(SignError::FeeUnderflow)?;
        let fee = total_out
            .checked_sub(self.outputs_sum_out)
            .ok_or(SignError::FeeUnderflow)?;

        let unit = self.coin_params.expect("coin set at init").unit;
        let total_str = self.codec.format_amount(total_out, unit);
        let fee_str = self.codec.format_amount(fee, unit);
        if !self.ui.verify_total(&total_str, &fee_str) {
            return Err(SignError::UserAbort);
        }
        self.ui.status("Transaction confirmed", true);

        let ho = self
            .hash_outputs_ctx
            .take()
            .expect("output always runs at least once before the terminal call");
        self.hash_outputs = Some(ho.finish());
        Ok(())
    }

    /// Re-validates one input and, once both input passes agree, produces
    /// either a finished signature or (for anti-klepto) a signer commitment.
    pub fn input_pass2(&mut self, req: SignInput, last: bool) -> Result<SignOutcome, SignError> {
        let result = self.try_input_pass2(req, last);
        self.finish(result)
    }

    fn sighash_script_for(&self, cfg: &ScriptConfig, keypath: &DerivationPath, hash160: [u8; 20]) -> Result<Vec<u8>, SignError> {
        match &cfg.config {
            ScriptConfigKind::Simple(_) => Ok(p2wpkh_script_code(&hash160)),
            ScriptConfigKind::Multisig(ms) => {
                let slice = keypath.as_slice();
                let change = slice[slice.len() - 2] == CHANGE_INDEX;
                let address_index = slice[slice.len() - 1];
                let witness_script = self
                    .codec
                    .pkscript_from_multisig(ms, change, address_index)
                    .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
                Ok(wrap_varbuff_script_code(&witness_script))
            }
        }
    }

    fn try_input_pass2(&mut self, req: SignInput, last: bool) -> Result<SignOutcome, SignError> {
        let idx = match self.phase {
            Phase::InputPass2(idx) => idx,
            _ => return Err(self.wrong_phase("InputPass2")),
        };

        self.validate_sign_input(&req)?;
        self.inputs_sum_pass2 = self
            .inputs_sum_pass2
            .checked_add(req.prev_out_value)
            .ok_or(SignError::Overflow)?;
        if self.inputs_sum_pass2 > self.inputs_sum_pass1 {
            return Err(SignError::PassSumMismatch);
        }
        if last && self.inputs_sum_pass2 != self.inputs_sum_pass1 {
            return Err(SignError::PassSumMismatch);
        }

        let cfg = self.script_config(req.script_config_index)?.clone();
        let hash160 = self
            .keystore
            .pubkey_hash160(&req.keypath)
            .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
        let sighash_script = self.sighash_script_for(&cfg, &req.keypath, hash160)?;

        let hash_prevouts = self.hash_prevouts.expect("finalized at the last pass-1 input");
        let hash_sequence = self.hash_sequence.expect("finalized at the last pass-1 input");
        let hash_outputs = self.hash_outputs.expect("finalized at the terminal output call");

        let sighash = bip143_sighash(&Bip143Args {
            version: self.version,
            hash_prevouts: &hash_prevouts,
            hash_sequence: &hash_sequence,
            outpoint_hash: &req.prev_out_hash,
            outpoint_index: req.prev_out_index,
            sighash_script: &sighash_script,
            prevout_value: req.prev_out_value,
            sequence: req.sequence,
            hash_outputs: &hash_outputs,
            locktime: self.locktime,
        });

        self.current_input_last = last;

        if let Some(host_commitment) = req.host_nonce_commitment {
            let commitment = self
                .keystore
                .antiklepto_commit(&req.keypath, &sighash, &host_commitment)
                .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
            self.phase = Phase::Antiklepto(idx);
            Ok(SignOutcome::Commitment(commitment))
        } else {
            let signature = self
                .keystore
                .sign(&req.keypath, &sighash, [0u8; 32])
                .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;
            self.phase = if last { Phase::Done } else { Phase::InputPass2(idx + 1) };
            Ok(SignOutcome::Signature(signature))
        }
    }

    /// Completes an anti-klepto signature after the host reveals its nonce.
    pub fn antiklepto(&mut self, req: AntiKleptoSignatureRequest) -> Result<[u8; 64], SignError> {
        let result = self.try_antiklepto(req);
        self.finish(result)
    }

    fn try_antiklepto(&mut self, req: AntiKleptoSignatureRequest) -> Result<[u8; 64], SignError> {
        let idx = match self.phase {
            Phase::Antiklepto(idx) => idx,
            _ => return Err(self.wrong_phase("Antiklepto")),
        };

        let signature = self
            .keystore
            .antiklepto_sign(&req.host_nonce)
            .map_err(|e| SignError::CollaboratorFailed(e.to_string()))?;

        self.phase = if self.current_input_last {
            Phase::Done
        } else {
            Phase::InputPass2(idx + 1)
        };
        Ok(signature)
    }
}
