use crate::error::{Result, VaultError};
use crate::evm::address::parse_recipient;
use crate::evm::erc20;
use crate::rpc::RpcClient;
use crate::types::{format_amount, TransactionId};
use crate::wallet::{AssetDescriptor, FeePolicy, NetworkDescriptor, WalletAccount};

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::rpc::types::eth::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use std::fmt;

pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// A locally signed, not yet broadcast transaction.
#[derive(Clone)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: B256,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("hash", &self.hash)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

/// Builds, signs and submits transfers for one network.
///
/// Submission is not retried here. A caller may drop the future before
/// [`TransactionSigner::broadcast`] resolves, but once the node has accepted
/// the payload the transfer cannot be recalled by this process.
pub struct TransactionSigner {
    network: NetworkDescriptor,
    rpc: RpcClient,
    fee_policy: FeePolicy,
}

impl TransactionSigner {
    pub fn new(network: NetworkDescriptor, rpc: RpcClient, fee_policy: FeePolicy) -> Self {
        Self {
            network,
            rpc,
            fee_policy,
        }
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    pub async fn sign_and_send(
        &self,
        account: &WalletAccount,
        recipient: &str,
        amount: U256,
        asset: &AssetDescriptor,
    ) -> Result<TransactionId> {
        let signed = self.prepare(account, recipient, amount, asset).await?;
        self.broadcast(&signed).await
    }

    /// Validate inputs, query chain state and sign. Nothing leaves the
    /// process except read-only RPC calls.
    pub async fn prepare(
        &self,
        account: &WalletAccount,
        recipient: &str,
        amount: U256,
        asset: &AssetDescriptor,
    ) -> Result<SignedTransaction> {
        let recipient = parse_recipient(recipient)?;
        if recipient == Address::ZERO {
            return Err(VaultError::invalid_recipient(
                "refusing to send to the zero address",
            ));
        }
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount("amount must be greater than 0".into()));
        }

        let from = account.address();

        let node_chain_id = self.rpc.chain_id().await?;
        if node_chain_id != self.network.chain_id {
            return Err(VaultError::config(format!(
                "{} expects chain id {}, node reports {}",
                self.network.name, self.network.chain_id, node_chain_id
            )));
        }

        let nonce = self.rpc.pending_nonce(from).await?;
        let gas_price = self.fee_policy.apply(self.rpc.gas_price().await?)?;

        let (to, value, input, gas_limit) = match asset {
            AssetDescriptor::Native => (recipient, amount, Vec::new(), NATIVE_TRANSFER_GAS),
            AssetDescriptor::Token {
                contract,
                symbol,
                decimals,
            } => {
                let token_balance = erc20::decode_uint_word(
                    &self.rpc.call(*contract, &erc20::encode_balance_of(from)).await?,
                )?;
                if token_balance < amount {
                    return Err(VaultError::InsufficientFunds {
                        need: format!("{} {}", format_amount(amount, *decimals), symbol),
                        available: format!(
                            "{} {}",
                            format_amount(token_balance, *decimals),
                            symbol
                        ),
                    });
                }

                let input = erc20::encode_transfer(recipient, amount);
                let gas_limit = self.rpc.estimate_gas(from, *contract, &input).await?;
                (*contract, U256::ZERO, input, gas_limit)
            }
        };

        let need = U256::from(gas_limit)
            .checked_mul(U256::from(gas_price))
            .and_then(|fee| value.checked_add(fee))
            .ok_or_else(|| {
                VaultError::InvalidAmount(format!("{} plus network fee overflows", value))
            })?;
        let available = self.rpc.balance(from).await?;
        if available < need {
            return Err(VaultError::InsufficientFunds {
                need: format!(
                    "{} {}",
                    format_amount(need, self.network.native_decimals),
                    self.network.native_symbol
                ),
                available: format!(
                    "{} {}",
                    format_amount(available, self.network.native_decimals),
                    self.network.native_symbol
                ),
            });
        }

        let signer = PrivateKeySigner::from_slice(account.private_key())
            .map_err(|e| VaultError::internal(format!("Invalid private key: {}", e)))?
            .with_chain_id(Some(self.network.chain_id));
        let wallet = EthereumWallet::from(signer);

        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(value)
            .with_input(Bytes::from(input))
            .with_nonce(nonce)
            .with_chain_id(self.network.chain_id)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price);

        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| VaultError::internal(format!("Signing failed: {}", e)))?;

        let raw = envelope.encoded_2718();
        let hash = keccak256(&raw);

        tracing::debug!(
            "Signed transfer {} on {} (nonce {}, gas {} @ {})",
            hash,
            self.network.name,
            nonce,
            gas_limit,
            gas_price
        );

        Ok(SignedTransaction {
            raw,
            hash,
            from,
            to,
            value,
            nonce,
            gas_limit,
            gas_price,
        })
    }

    /// Submit a signed payload exactly once.
    pub async fn broadcast(&self, signed: &SignedTransaction) -> Result<TransactionId> {
        let reported = self.rpc.send_raw_transaction(&signed.raw).await?;

        if !reported.eq_ignore_ascii_case(&signed.hash.to_string()) {
            tracing::warn!(
                "Node reported hash {} for transaction {}",
                reported,
                signed.hash
            );
        }

        tracing::info!(
            "Broadcast transaction {} from {} on {}",
            signed.hash,
            signed.from,
            self.network.name
        );
        Ok(TransactionId(signed.hash))
    }
}
