use crate::error::{Result, VaultError};
use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    function transfer(address to, uint256 amount) external returns (bool);
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
}

pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    transferCall { to, amount }.abi_encode()
}

pub fn encode_balance_of(owner: Address) -> Vec<u8> {
    balanceOfCall { owner }.abi_encode()
}

pub fn encode_decimals() -> Vec<u8> {
    decimalsCall {}.abi_encode()
}

/// First 32-byte return word as an unsigned integer.
pub fn decode_uint_word(data: &[u8]) -> Result<U256> {
    if data.len() < 32 {
        return Err(VaultError::rpc(format!(
            "expected a 32-byte return word, got {} bytes",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..32]))
}

pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    let word = decode_uint_word(data)?;
    u8::try_from(word).map_err(|_| VaultError::rpc(format!("decimals() returned {}", word)))
}
