//! The session controller's error type.
//!
//! `SignError` is the rich, diagnosable enum the controller actually raises;
//! [`SignError::kind`] narrows it down to the three kinds the host-facing
//! protocol distinguishes (`INVALID_INPUT`, `USER_ABORT`, `UNKNOWN`), layering
//! a detailed internal enum under a narrow external contract the same way
//! `SerError`/`Bip32Error` do elsewhere in this workspace.

use thiserror::Error;

/// The three caller-visible error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A per-message validation rule or cross-message invariant was violated.
    InvalidInput,
    /// A UI confirmation returned false.
    UserAbort,
    /// An internal collaborator failed in a way not attributable to host input.
    Unknown,
}

/// Everything that can end a sign session early.
#[derive(Debug, Error)]
pub enum SignError {
    /// The operation is not valid in the session's current phase.
    #[error("operation expects phase {expected}, session is in {actual}")]
    WrongPhase {
        /// The phase the invoked operation requires.
        expected: &'static str,
        /// The phase the session was actually in.
        actual: &'static str,
    },
    /// `locktime` was at or above the time-based threshold (out of scope).
    #[error("locktime {0} is at or above the time-based threshold")]
    LocktimeTooHigh(u32),
    /// The transaction version was neither 1 nor 2.
    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(u32),
    /// `init` was called with zero inputs.
    #[error("a transaction needs at least one input")]
    NoInputs,
    /// `init` (or a previous-transaction init) was called with zero outputs.
    #[error("a transaction needs at least one output")]
    NoOutputs,
    /// A 64-bit accumulator would have overflowed.
    #[error("a 64-bit value accumulator overflowed")]
    Overflow,
    /// The streamed previous transaction's double-SHA256 did not match the
    /// referring input's claimed `prev_out_hash`.
    #[error("previous transaction hash does not match the referencing input")]
    PrevTxHashMismatch,
    /// The referenced previous-transaction output's value did not match the
    /// input's claimed `prev_out_value`.
    #[error("previous output value does not match the referencing input")]
    PrevOutValueMismatch,
    /// A keypath did not match its script config's account prefix shape.
    #[error("keypath does not match its script config's account prefix")]
    KeypathInvalid,
    /// `script_config_index` named a config that does not exist.
    #[error("script config index {0} is out of range")]
    ScriptConfigIndexOutOfRange(u32),
    /// An input or output carried a zero value.
    #[error("zero-value input or output")]
    ZeroValue,
    /// A sequence number was below the minimum this engine accepts.
    #[error("sequence number {0:#010x} is not permitted")]
    InvalidSequence(u32),
    /// `init` named a coin with no registered parameters.
    #[error("coin has no registered parameters")]
    UnknownCoin,
    /// Pass-2 input sums exceeded pass-1 input sums, or disagreed with them
    /// at the final input.
    #[error("pass-2 input sum disagrees with pass-1 input sum")]
    PassSumMismatch,
    /// `outputs_sum_ours` or `outputs_sum_out` exceeded `inputs_sum_pass1`.
    #[error("total outputs exceed total inputs")]
    FeeUnderflow,
    /// A UI confirmation call returned false.
    #[error("user aborted the signing session")]
    UserAbort,
    /// A collaborator (keystore, codec) failed in a way not attributable to
    /// host input.
    #[error("collaborator failed: {0}")]
    CollaboratorFailed(String),
}

impl SignError {
    /// Narrows this error to the three kinds the host-facing protocol
    /// distinguishes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignError::UserAbort => ErrorKind::UserAbort,
            SignError::CollaboratorFailed(_) => ErrorKind::Unknown,
            _ => ErrorKind::InvalidInput,
        }
    }
}
