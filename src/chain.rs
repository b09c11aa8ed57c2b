//! Chain collaborator seam.
//!
//! Everything the pipelines need from a node goes through [`ChainClient`], so the
//! gate, initializer and resolver can run against an in-memory chain in tests and
//! against an alloy provider in the binaries.

use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::error::ChainError;

/// A submitted, not-yet-final transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
}

/// The parts of a receipt the pipelines act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    pub success: bool,
    pub contract_address: Option<Address>,
}

/// A log entry as returned by `eth_getLogs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLog {
    pub block_number: u64,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ChainError>;

    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Broadcast a contract-creation transaction signed by the configured key.
    async fn deploy(&self, creation_code: Bytes) -> Result<PendingTx, ChainError>;

    async fn send_transaction(&self, to: Address, calldata: Bytes)
        -> Result<PendingTx, ChainError>;

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ChainError>;

    /// Whether the node still knows the transaction (mempool or chain).
    /// `false` for a receipt-less hash means it was dropped or replaced.
    async fn transaction_known(&self, hash: TxHash) -> Result<bool, ChainError>;

    async fn call_view(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError>;

    async fn logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError>;
}

/// Execute a view call and decode its return data.
///
/// Empty or undecodable return data is reported as `NoDecodableData`, distinct
/// from a revert.
pub async fn read_view<C, Ch>(chain: &Ch, to: Address, call: C) -> Result<C::Return, ChainError>
where
    C: SolCall + Send,
    Ch: ChainClient + ?Sized,
{
    let raw = chain.call_view(to, call.abi_encode().into()).await?;
    if raw.is_empty() {
        return Err(ChainError::NoDecodableData(format!(
            "{} at {to:#x} returned 0x",
            C::SIGNATURE
        )));
    }
    C::abi_decode_returns(&raw, true).map_err(|err| {
        ChainError::NoDecodableData(format!("{} at {to:#x}: {err}", C::SIGNATURE))
    })
}
