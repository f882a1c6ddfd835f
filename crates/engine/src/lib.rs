//! The streaming, multi-phase session controller for a hardware-wallet
//! Bitcoin transaction-signing engine.
//!
//! A [`Session`] is driven by eight operations — `init`, `prevtx_init`,
//! `prevtx_input`, `prevtx_output`, `input_pass1`, `output`, `input_pass2`,
//! `antiklepto` — called in the phase order the session itself enforces.
//! Every operation either advances the session or resets it; there is no
//! local recovery from an error.
//!
//! This crate carries no production keystore, UI, or coin-script formatting:
//! those are expressed as the [`Keystore`], [`Ui`], [`ScriptConfigValidator`],
//! and [`OutputCodec`] traits, with no implementation shipped outside tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod coin;
mod error;
mod session;
mod traits;
mod types;

pub use coin::{coin_params, Coin, CoinParams};
pub use error::{ErrorKind, SignError};
pub use session::{Session, SignOutcome};
pub use traits::{Keystore, OutputCodec, ScriptConfigValidator, Ui};
pub use types::{
    AntiKleptoSignatureRequest, MultisigConfig, MultisigScriptType, OutputType, PrevTxInit,
    PrevTxInput, PrevTxOutput, RbfFlag, ScriptConfig, ScriptConfigKind, SignInit, SignInput,
    SignOutput, SimpleType,
};

pub use btcsign_keypath::{is_valid_account_keypath, DerivationPath, CHANGE_INDEX};
