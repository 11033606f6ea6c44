//! BIP-39 mnemonic → BIP-32 master key → BIP-44 address derivation.
//!
//! Out-of-process generation is the primary deployment mode (spec.md
//! §4.D), but the derivation is small and deterministic enough to be
//! useful to run in-process too — notably for the "generate and claim"
//! end-to-end scenario in spec.md §8, which names an exact mnemonic and
//! expects reproducible addresses.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use coins_bip32::path::DerivationPath;
use coins_bip32::xkeys::XPriv;
use coins_bip39::{English, Mnemonic};

/// A single derived deposit address, with the path it was derived at so an
/// operator can re-derive the corresponding private key.
#[derive(Debug, Clone)]
pub struct DerivedWallet {
    pub address: Address,
    /// e.g. `"m/44'/60'/0'/0/3"`.
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("invalid mnemonic: {0}")]
    Mnemonic(String),
    #[error("invalid derivation path: {0}")]
    Path(String),
    #[error("key derivation failed: {0}")]
    Derive(String),
}

/// Derive the first `count` standard Ethereum BIP-44 addresses
/// (`m/44'/60'/0'/0/i` for `i` in `0..count`) from a BIP-39 mnemonic.
pub fn derive_addresses(mnemonic_phrase: &str, count: u32) -> Result<Vec<DerivedWallet>, KeygenError> {
    let mnemonic = Mnemonic::<English>::new_from_phrase(mnemonic_phrase)
        .map_err(|e| KeygenError::Mnemonic(e.to_string()))?;
    let seed = mnemonic.to_seed(None).map_err(|e| KeygenError::Mnemonic(e.to_string()))?;
    let master = XPriv::root_from_seed(&seed, None).map_err(|e| KeygenError::Derive(e.to_string()))?;

    let mut out = Vec::with_capacity(count as usize);
    for index in 0..count {
        let path_str = format!("m/44'/60'/0'/0/{index}");
        let path: DerivationPath =
            path_str.parse().map_err(|_| KeygenError::Path(path_str.clone()))?;
        let derived = master.derive_path(&path).map_err(|e| KeygenError::Derive(e.to_string()))?;

        let signing_key: alloy::signers::k256::ecdsa::SigningKey = derived.into();
        let signer = PrivateKeySigner::from_signing_key(signing_key);
        out.push(DerivedWallet { address: signer.address(), path: path_str });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "leader pause fashion picnic green elder rebuild health valley alert cactus latin skull antique arrest skirt health chaos student will north garbage wagon before";

    #[test]
    fn derives_deterministic_addresses() {
        let first = derive_addresses(TEST_MNEMONIC, 5).unwrap();
        let second = derive_addresses(TEST_MNEMONIC, 5).unwrap();
        assert_eq!(first.len(), 5);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.address, b.address);
        }
        // Each derived address is distinct.
        let mut addrs: Vec<_> = first.iter().map(|w| w.address).collect();
        addrs.sort();
        addrs.dedup();
        assert_eq!(addrs.len(), 5);
    }

    #[test]
    fn path_strings_match_bip44_ethereum_convention() {
        let wallets = derive_addresses(TEST_MNEMONIC, 2).unwrap();
        assert_eq!(wallets[0].path, "m/44'/60'/0'/0/0");
        assert_eq!(wallets[1].path, "m/44'/60'/0'/0/1");
    }
}
