use async_trait::async_trait;
use bip39::Mnemonic;
use ed25519_dalek::SigningKey;
use tonforge_boc::TonAddress;
use zeroize::Zeroize;

use crate::WalletSignerError;

/// External collaborator holding recovery phrases.
///
/// Implementations must not log mnemonic words; the signing service never
/// keeps the returned value beyond a single signing call.
#[async_trait]
pub trait MnemonicStore: Send + Sync {
    /// Fails with [`WalletSignerError::NoMnemonic`] when no phrase is
    /// stored for the wallet.
    async fn get_mnemonic(&self, wallet: &TonAddress) -> Result<Mnemonic, WalletSignerError>;
}

/// Derives the wallet's ed25519 keypair from a recovery phrase.
///
/// The PBKDF2 seed and the intermediate key bytes are zeroized before
/// returning; only the [`SigningKey`] itself leaves this function.
pub fn derive_keypair(mnemonic: &Mnemonic) -> SigningKey {
    let mut seed = mnemonic.to_seed("");
    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&seed[..32]);
    let key = SigningKey::from_bytes(&key_bytes);
    key_bytes.zeroize();
    seed.zeroize();
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer as _, Verifier as _};

    pub(crate) const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn derivation_is_deterministic() {
        let mnemonic: Mnemonic = TEST_MNEMONIC.parse().unwrap();
        let a = derive_keypair(&mnemonic);
        let b = derive_keypair(&mnemonic);
        assert_eq!(a.verifying_key(), b.verifying_key());
    }

    #[test]
    fn signatures_verify_against_the_derived_public_key() {
        let mnemonic: Mnemonic = TEST_MNEMONIC.parse().unwrap();
        let key = derive_keypair(&mnemonic);
        let digest = [0x5au8; 32];
        let signature = key.sign(&digest);
        key.verifying_key().verify(&digest, &signature).unwrap();
    }
}
