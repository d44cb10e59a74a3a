//! Ethereum-family address handling, ERC-20 call encoding and signing.

pub mod address;
pub mod erc20;
pub mod signer;

pub use address::{address_from_public_key, is_valid_address, parse_recipient, to_checksum};
pub use signer::{SignedTransaction, TransactionSigner};
