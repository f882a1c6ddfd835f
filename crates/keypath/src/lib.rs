//! A small BIP-32-shaped derivation path type.
//!
//! The sign engine never derives or holds key material — that lives behind
//! the `Keystore` collaborator in `btcsign-engine` — but it does need to
//! compare keypaths against the account prefix named by a script config, and
//! to tell a change address from a receive address. [`DerivationPath`]
//! carries just enough structure for that.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::{
    iter::FromIterator,
    ops::Index,
    slice::Iter,
};

/// A BIP-32 derivation path: a sequence of (possibly hardened) child indices.
///
/// Hardening is represented the conventional way, by setting the top bit of
/// the index (`index + 0x8000_0000`); this type does not interpret that bit,
/// it only compares and slices paths.
#[derive(Default, Debug, Clone, Eq, PartialEq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// `true` if the path has no indices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of indices in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the indices of the path, root to leaf.
    pub fn iter(&self) -> Iter<'_, u32> {
        self.0.iter()
    }

    /// `true` if `prefix` is a prefix of `self`.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns the suffix of `self` remaining after `prefix`, or `None` if
    /// `prefix` is not actually a prefix of `self`.
    pub fn strip_prefix(&self, prefix: &Self) -> Option<DerivationPath> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(self.0[prefix.len()..].to_vec().into())
    }

    /// The raw index slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for DerivationPath {
    fn from(v: Vec<u32>) -> Self {
        Self(v)
    }
}

impl From<&[u32]> for DerivationPath {
    fn from(v: &[u32]) -> Self {
        Self(v.to_vec())
    }
}

impl FromIterator<u32> for DerivationPath {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Vec::from_iter(iter).into()
    }
}

impl Index<usize> for DerivationPath {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.0[index]
    }
}

/// The second-to-last index of a change output's keypath (`.../change/address`).
pub const CHANGE_INDEX: u32 = 1;

/// Validates that `full` is exactly `account_prefix` followed by two more
/// indices, `(change, address)` — invariant **I6** of the sign engine.
///
/// When `must_be_change` is set, the `change` index must additionally equal
/// [`CHANGE_INDEX`] — invariant **I7**, required for every "ours" output.
pub fn is_valid_account_keypath(
    account_prefix: &DerivationPath,
    full: &DerivationPath,
    must_be_change: bool,
) -> bool {
    if account_prefix.len() + 2 != full.len() {
        return false;
    }
    if !full.starts_with(account_prefix) {
        return false;
    }
    let change = full[full.len() - 2];
    if must_be_change && change != CHANGE_INDEX {
        return false;
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    fn path(v: &[u32]) -> DerivationPath {
        v.to_vec().into()
    }

    #[test]
    fn it_accepts_a_well_formed_receive_keypath() {
        let account = path(&[84 + (1 << 31), 0 + (1 << 31), 0 + (1 << 31)]);
        let full = path(&[84 + (1 << 31), 0 + (1 << 31), 0 + (1 << 31), 0, 4]);
        assert!(is_valid_account_keypath(&account, &full, false));
    }

    #[test]
    fn it_requires_the_change_element_for_change_outputs() {
        let account = path(&[84, 0, 0]);
        let receive = path(&[84, 0, 0, 0, 4]);
        let change = path(&[84, 0, 0, 1, 4]);
        assert!(!is_valid_account_keypath(&account, &receive, true));
        assert!(is_valid_account_keypath(&account, &change, true));
    }

    #[test]
    fn it_rejects_a_mismatched_prefix() {
        let account = path(&[84, 0, 0]);
        let full = path(&[84, 0, 1, 0, 4]);
        assert!(!is_valid_account_keypath(&account, &full, false));
    }

    #[test]
    fn it_rejects_the_wrong_number_of_trailing_elements() {
        let account = path(&[84, 0, 0]);
        let too_short = path(&[84, 0, 0, 0]);
        let too_long = path(&[84, 0, 0, 0, 0, 4]);
        assert!(!is_valid_account_keypath(&account, &too_short, false));
        assert!(!is_valid_account_keypath(&account, &too_long, false));
    }

    #[test]
    fn strip_prefix_returns_the_descendant_suffix() {
        let account = path(&[84, 0, 0]);
        let full = path(&[84, 0, 0, 1, 4]);
        assert_eq!(full.strip_prefix(&account), Some(path(&[1, 4])));
        assert_eq!(path(&[1, 2]).strip_prefix(&account), None);
    }
}
