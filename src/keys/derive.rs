use serde::{Deserialize, Serialize};

use crate::utils::{base58_encode, checksum, sha256_digest};

/// SS58-style address prefix used for all derived test addresses
pub const SS58_PREFIX: u8 = 42;

/// Derivation scheme tag for block-production (aura) and account keys
const SR25519_SCHEME: &str = "sr25519";
/// Derivation scheme tag for finality (grandpa) keys
const ED25519_SCHEME: &str = "ed25519";

/// Addresses for the three roles a single authority seed fills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityKeys {
    /// Block-production authority address (sr25519-style)
    pub aura: String,
    /// Finality-gadget authority address (ed25519-style)
    pub grandpa: String,
    /// On-chain account address for balances (sr25519-style)
    pub account: String,
}

/// Derive the deterministic 32-byte public for a scheme and derivation path.
///
/// The path convention is `"//" + seed`, matching the hard-derivation
/// junction the node binary uses for `key insert --suri`.
pub fn derive_public(scheme: &str, seed: &str) -> Vec<u8> {
    let mut material = Vec::with_capacity(scheme.len() + seed.len() + 2);
    material.extend_from_slice(scheme.as_bytes());
    material.extend_from_slice(b"//");
    material.extend_from_slice(seed.as_bytes());
    sha256_digest(&material)
}

/// Derive the `{aura, grandpa, account}` address triple for a seed.
///
/// Pure and deterministic: equal seeds always yield byte-identical triples,
/// which is what lets `key insert` match the addresses patched into the
/// chain spec. The aura and account addresses coincide because both come
/// from the same sr25519 path, as with the node binary's dev accounts.
pub fn derive_authority_keys(seed: &str) -> AuthorityKeys {
    let sr_public = derive_public(SR25519_SCHEME, seed);
    let ed_public = derive_public(ED25519_SCHEME, seed);

    let aura = encode_address(&sr_public);
    let grandpa = encode_address(&ed_public);
    let account = aura.clone();

    AuthorityKeys {
        aura,
        grandpa,
        account,
    }
}

/// Encode a public key as an SS58-flavored base58 address:
/// prefix byte + public + checksum.
fn encode_address(public: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![SS58_PREFIX];
    payload.extend_from_slice(public);
    let check = checksum(payload.as_slice());
    payload.extend(check);
    base58_encode(payload.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{base58_decode, checksum, CHECK_SUM_LEN};

    #[test]
    fn test_derivation_is_deterministic() {
        let first = derive_authority_keys("Alice");
        let second = derive_authority_keys("Alice");
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_seeds_yield_distinct_keys() {
        let alice = derive_authority_keys("Alice");
        let bob = derive_authority_keys("Bob");
        assert_ne!(alice.aura, bob.aura);
        assert_ne!(alice.grandpa, bob.grandpa);
        assert_ne!(alice.account, bob.account);
    }

    #[test]
    fn test_schemes_yield_distinct_addresses() {
        let keys = derive_authority_keys("Charlie");
        assert_ne!(keys.aura, keys.grandpa);
        // Same scheme and path for aura and account.
        assert_eq!(keys.aura, keys.account);
    }

    #[test]
    fn test_address_structure_is_valid() {
        let keys = derive_authority_keys("Dave");
        let payload = base58_decode(&keys.aura).unwrap();

        // prefix + 32-byte public + checksum
        assert_eq!(payload.len(), 1 + 32 + CHECK_SUM_LEN);
        assert_eq!(payload[0], SS58_PREFIX);

        let body = &payload[..payload.len() - CHECK_SUM_LEN];
        let actual = &payload[payload.len() - CHECK_SUM_LEN..];
        assert_eq!(actual, checksum(body).as_slice());
    }

    #[test]
    fn test_seed_is_case_sensitive() {
        assert_ne!(
            derive_authority_keys("eve").aura,
            derive_authority_keys("Eve").aura
        );
    }
}
