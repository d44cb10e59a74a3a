use crate::error::{Result, VaultError};
use alloy::primitives::{keccak256, Address};
use bitcoin::secp256k1::PublicKey;

/// Last 20 bytes of Keccak-256 over the uncompressed key without its `0x04` tag.
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}

/// Strict parse used before anything is signed.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// forms carry no checksum; mixed case must match EIP-55.
pub fn parse_address(input: &str) -> std::result::Result<Address, String> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| format!("'{}' is missing the 0x prefix", trimmed))?;

    if hex_part.len() != 40 {
        return Err(format!(
            "'{}' must be 20 bytes (40 hex digits), got {} digits",
            trimmed,
            hex_part.len()
        ));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("'{}' contains non-hex characters", trimmed));
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        let checksummed = format!("0x{}", hex_part);
        return Address::parse_checksummed(&checksummed, None)
            .map_err(|_| format!("'{}' fails the EIP-55 checksum", trimmed));
    }

    let bytes = hex::decode(hex_part.to_ascii_lowercase())
        .map_err(|e| format!("'{}' is not valid hex: {}", trimmed, e))?;
    Ok(Address::from_slice(&bytes))
}

pub fn parse_recipient(input: &str) -> Result<Address> {
    parse_address(input).map_err(VaultError::invalid_recipient)
}

pub fn is_valid_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

pub fn to_checksum(input: &str) -> Result<String> {
    parse_address(input)
        .map(|addr| addr.to_checksum(None))
        .map_err(VaultError::InvalidAddress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_vectors::*;
    use bitcoin::secp256k1::{Secp256k1, SecretKey};

    fn address_for(private_key_hex: &str) -> String {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&hex::decode(private_key_hex).unwrap()).unwrap();
        address_from_public_key(&secret.public_key(&secp)).to_checksum(None)
    }

    #[test]
    fn test_address_from_known_keys() {
        assert_eq!(address_for(JUNK_PRIVATE_KEY_0), JUNK_ADDRESS_0);
        assert_eq!(address_for(JUNK_PRIVATE_KEY_1), JUNK_ADDRESS_1);
    }

    #[test]
    fn test_parse_accepts_checksummed_and_flat_case() {
        assert!(is_valid_address(JUNK_ADDRESS_0));
        assert!(is_valid_address(&JUNK_ADDRESS_0.to_lowercase()));
        assert!(is_valid_address("0xdead000000000000000000000000000000000000"));
        assert_eq!(
            to_checksum(&JUNK_ADDRESS_1.to_lowercase()).unwrap(),
            JUNK_ADDRESS_1
        );
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        // flip the case of one letter in a checksummed address
        let tampered = JUNK_ADDRESS_0.replacen("Fd", "fd", 1);
        assert_ne!(tampered, JUNK_ADDRESS_0);
        assert!(!is_valid_address(&tampered));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(!is_valid_address("0xinvalid"));
        assert!(!is_valid_address("not an address"));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!is_valid_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb9226g"));
        assert!(matches!(
            parse_recipient("0x1234"),
            Err(VaultError::InvalidRecipient(_))
        ));
    }
}
