use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};

use crate::error::{HarnessError, Result};

/// Length of the address checksum suffix in bytes
pub const CHECK_SUM_LEN: usize = 4;

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| HarnessError::Key(format!("Invalid base58 encoding: {e}")))
}

pub fn hex_lower(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}

/// First four bytes of a double SHA-256 over the payload
pub fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = sha256_digest(payload);
    let second_sha = sha256_digest(first_sha.as_slice());
    second_sha[0..CHECK_SUM_LEN].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_digest_is_deterministic() {
        let a = sha256_digest(b"hello");
        let b = sha256_digest(b"hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_base58_round_trip() {
        let data = vec![0x00, 0x01, 0x02, 0xff];
        let encoded = base58_encode(&data);
        let decoded = base58_decode(&encoded).unwrap();
        assert_eq!(data, decoded);
    }

    #[test]
    fn test_checksum_length() {
        assert_eq!(checksum(b"payload").len(), CHECK_SUM_LEN);
    }
}
