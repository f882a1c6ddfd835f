//! A small, in-memory stand-in for the out-of-scope coin-parameter tables.
//!
//! Production firmware carries a much richer per-network constant table
//! (address version bytes, BIP-44 coin indices for every supported network,
//! feature flags beyond RBF support). That table is an external collaborator
//! here; this registry only carries enough to drive RBF gating and amount
//! formatting in the session controller's own tests.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A supported coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coin {
    /// Bitcoin mainnet.
    Btc,
    /// Bitcoin testnet.
    TBtc,
    /// Litecoin mainnet.
    Ltc,
}

/// The parameters the session controller needs for a given coin.
#[derive(Debug, Clone, Copy)]
pub struct CoinParams {
    /// The unit symbol used when formatting amounts (e.g. `"BTC"`).
    pub unit: &'static str,
    /// The coin's BIP-44 coin type index.
    pub bip44_coin: u32,
    /// Whether this coin's nodes relay and accept RBF-signaled transactions.
    pub rbf_support: bool,
}

static REGISTRY: Lazy<HashMap<Coin, CoinParams>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        Coin::Btc,
        CoinParams {
            unit: "BTC",
            bip44_coin: 0,
            rbf_support: true,
        },
    );
    m.insert(
        Coin::TBtc,
        CoinParams {
            unit: "TBTC",
            bip44_coin: 1,
            rbf_support: true,
        },
    );
    m.insert(
        Coin::Ltc,
        CoinParams {
            unit: "LTC",
            bip44_coin: 2,
            rbf_support: false,
        },
    );
    m
});

/// Looks up the registered parameters for `coin`, or `None` if unregistered.
pub fn coin_params(coin: Coin) -> Option<CoinParams> {
    REGISTRY.get(&coin).copied()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn btc_supports_rbf() {
        assert!(coin_params(Coin::Btc).unwrap().rbf_support);
    }

    #[test]
    fn ltc_does_not_support_rbf_in_this_registry() {
        assert!(!coin_params(Coin::Ltc).unwrap().rbf_support);
    }

    #[test]
    fn every_coin_variant_is_registered() {
        for coin in [Coin::Btc, Coin::TBtc, Coin::Ltc] {
            assert!(coin_params(coin).is_some(), "{coin:?} missing from registry");
        }
    }
}
