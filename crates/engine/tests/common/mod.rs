//! Deterministic collaborator stubs shared by the end-to-end scenario tests.
//!
//! These mirror the stubs in `src/session.rs`'s unit tests, but live here
//! because integration tests compile as a separate crate and can't reach
//! `#[cfg(test)]` items defined inside the library.

use std::cell::{Cell, RefCell};

use btcsign_engine::{
    Coin, DerivationPath, Keystore, MultisigConfig, OutputType, RbfFlag, ScriptConfig, SignError,
    Ui,
};

pub struct StubKeystore {
    pub hash160: [u8; 20],
}

impl Keystore for StubKeystore {
    fn pubkey_hash160(&self, _keypath: &DerivationPath) -> Result<[u8; 20], SignError> {
        Ok(self.hash160)
    }

    fn sign(&self, _keypath: &DerivationPath, sighash: &[u8; 32], _nonce_contribution: [u8; 32]) -> Result<[u8; 64], SignError> {
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(sighash);
        Ok(sig)
    }

    fn antiklepto_commit(&self, _keypath: &DerivationPath, sighash: &[u8; 32], _host_commitment: &[u8; 32]) -> Result<[u8; 33], SignError> {
        let mut commitment = [0u8; 33];
        commitment[1..].copy_from_slice(sighash);
        Ok(commitment)
    }

    fn antiklepto_sign(&self, host_nonce: &[u8; 32]) -> Result<[u8; 64], SignError> {
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(host_nonce);
        Ok(sig)
    }
}

#[derive(Default)]
pub struct StubUi {
    pub allow: Cell<bool>,
    pub verify_recipient_calls: RefCell<Vec<(String, String)>>,
    pub verify_total_calls: RefCell<Vec<(String, String)>>,
    pub locktime_rbf_calls: RefCell<Vec<(u32, RbfFlag)>>,
    pub statuses: RefCell<Vec<(String, bool)>>,
}

impl StubUi {
    pub fn allowing() -> Self {
        let ui = Self::default();
        ui.allow.set(true);
        ui
    }

    pub fn refusing() -> Self {
        let ui = Self::default();
        ui.allow.set(false);
        ui
    }
}

impl Ui for StubUi {
    fn verify_recipient(&self, address: &str, amount: &str) -> bool {
        self.verify_recipient_calls.borrow_mut().push((address.to_string(), amount.to_string()));
        self.allow.get()
    }

    fn verify_total(&self, total: &str, fee: &str) -> bool {
        self.verify_total_calls.borrow_mut().push((total.to_string(), fee.to_string()));
        self.allow.get()
    }

    fn confirm_multiple_change_outputs(&self, _num_changes: u16) -> bool {
        self.allow.get()
    }

    fn confirm_locktime_rbf(&self, locktime: u32, rbf_flag: RbfFlag) -> bool {
        self.locktime_rbf_calls.borrow_mut().push((locktime, rbf_flag));
        self.allow.get()
    }

    fn status(&self, message: &str, success: bool) {
        self.statuses.borrow_mut().push((message.to_string(), success));
    }
}

pub struct StubValidator;

impl btcsign_engine::ScriptConfigValidator for StubValidator {
    fn validate(&self, _coin: Coin, _configs: &[ScriptConfig]) -> Result<(), SignError> {
        Ok(())
    }
}

pub struct StubCodec;

impl btcsign_engine::OutputCodec for StubCodec {
    fn format_amount(&self, value: u64, unit: &str) -> String {
        format!("{}.{:08} {unit}", value / 100_000_000, value % 100_000_000)
    }

    fn address_from_payload(&self, _coin: Coin, _output_type: OutputType, payload: &[u8]) -> Result<String, SignError> {
        Ok(format!("addr:{}", hex::encode(payload)))
    }

    fn pkscript_from_payload(&self, _coin: Coin, output_type: OutputType, payload: &[u8]) -> Result<Vec<u8>, SignError> {
        let tag: u8 = match output_type {
            OutputType::P2wpkh => 0,
            OutputType::P2wpkhP2sh => 1,
            OutputType::P2wsh => 2,
            OutputType::P2wshP2sh => 3,
        };
        let mut out = Vec::with_capacity(1 + payload.len());
        out.push(tag);
        out.extend_from_slice(payload);
        Ok(out)
    }

    fn pkscript_from_multisig(&self, cfg: &MultisigConfig, change: bool, address_index: u32) -> Result<Vec<u8>, SignError> {
        self.payload_from_multisig(cfg, change, address_index)
    }

    fn payload_from_pubkeyhash(&self, hash160: [u8; 20]) -> Vec<u8> {
        hash160.to_vec()
    }

    fn payload_from_multisig(&self, cfg: &MultisigConfig, change: bool, address_index: u32) -> Result<Vec<u8>, SignError> {
        let mut out = vec![cfg.threshold as u8, change as u8, address_index as u8];
        for xpub in &cfg.xpubs {
            out.extend_from_slice(xpub.as_bytes());
        }
        Ok(out)
    }
}
