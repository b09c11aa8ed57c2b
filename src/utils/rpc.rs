use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use std::future::Future;
use std::str::FromStr;
use tokio::time::{timeout, Duration};

use crate::chain::{ChainClient, PendingTx, RawLog, TxReceipt};
use crate::error::{ChainError, DeployError};
use crate::utils::classify::classify_rpc_failure;

const RPC_ERR_MAX_LEN: usize = 260;

pub type HttpProvider = RootProvider<Http<Client>>;

fn compact_rpc_error_message(message: &str) -> String {
    crate::utils::error::compact_error_message(message, RPC_ERR_MAX_LEN)
}

fn rpc_failure(err: impl std::fmt::Display) -> ChainError {
    classify_rpc_failure(&compact_rpc_error_message(&err.to_string()))
}

/// Bound a single request; a slow node surfaces as a transport failure, never a retry.
async fn bounded<T, E, Fut>(limit: Duration, context: &str, fut: Fut) -> Result<T, ChainError>
where
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match timeout(limit, fut).await {
        Ok(result) => result.map_err(rpc_failure),
        Err(_) => Err(ChainError::Transport(format!(
            "{context} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

/// Parse key material into a local signer. The key is expected to be normalised
/// already (`0x` + 64 hex chars); the prefix is stripped before decoding.
pub fn build_signer(private_key: &str) -> Result<PrivateKeySigner, DeployError> {
    let clean_pk = crate::utils::hex::clean_hex(private_key);
    PrivateKeySigner::from_str(clean_pk)
        .map_err(|err| DeployError::Configuration(format!("PRIVATE_KEY is not a valid key: {err}")))
}

/// [`ChainClient`] backed by an alloy HTTP provider.
pub struct RpcChain<P> {
    provider: P,
    call_timeout: Duration,
}

impl<P> RpcChain<P> {
    pub fn new(provider: P, call_timeout: Duration) -> Self {
        Self {
            provider,
            call_timeout,
        }
    }
}

/// Provider without a wallet, for read-only audit runs.
pub fn read_only_chain(
    rpc_url: &str,
    call_timeout: Duration,
) -> anyhow::Result<RpcChain<HttpProvider>> {
    let provider = ProviderBuilder::new().on_http(rpc_url.trim().parse()?);
    Ok(RpcChain::new(provider, call_timeout))
}

/// Provider that fills nonce, gas and chain id and signs with `signer`.
pub fn signing_chain(
    rpc_url: &str,
    signer: PrivateKeySigner,
    call_timeout: Duration,
) -> anyhow::Result<RpcChain<impl Provider<Http<Client>>>> {
    let wallet = EthereumWallet::from(signer);
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(rpc_url.trim().parse()?);
    Ok(RpcChain::new(provider, call_timeout))
}

#[async_trait]
impl<P> ChainClient for RpcChain<P>
where
    P: Provider<Http<Client>> + 'static,
{
    async fn chain_id(&self) -> Result<u64, ChainError> {
        bounded(self.call_timeout, "eth_chainId", async { self.provider.get_chain_id().await }).await
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        bounded(self.call_timeout, "eth_blockNumber", async {
            self.provider.get_block_number().await
        })
        .await
    }

    async fn deploy(&self, creation_code: Bytes) -> Result<PendingTx, ChainError> {
        let tx = TransactionRequest::default().with_deploy_code(creation_code);
        let pending = bounded(self.call_timeout, "eth_sendTransaction(create)", async {
            self.provider.send_transaction(tx).await
        })
        .await?;
        Ok(PendingTx {
            hash: *pending.tx_hash(),
        })
    }

    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> Result<PendingTx, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        let pending = bounded(self.call_timeout, "eth_sendTransaction", async {
            self.provider.send_transaction(tx).await
        })
        .await?;
        Ok(PendingTx {
            hash: *pending.tx_hash(),
        })
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let receipt = bounded(self.call_timeout, "eth_getTransactionReceipt", async {
            self.provider.get_transaction_receipt(hash).await
        })
        .await?;
        let Some(receipt) = receipt else {
            return Ok(None);
        };
        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };
        Ok(Some(TxReceipt {
            hash,
            block_number,
            success: receipt.status(),
            contract_address: receipt.contract_address,
        }))
    }

    async fn transaction_known(&self, hash: TxHash) -> Result<bool, ChainError> {
        let tx = bounded(self.call_timeout, "eth_getTransactionByHash", async {
            self.provider.get_transaction_by_hash(hash).await
        })
        .await?;
        Ok(tx.is_some())
    }

    async fn call_view(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);
        bounded(self.call_timeout, "eth_call", async { self.provider.call(&tx).await }).await
    }

    async fn logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError> {
        let filter = Filter::new()
            .address(address)
            .event_signature(topic0)
            .from_block(from_block)
            .to_block(to_block);
        let logs = bounded(self.call_timeout, "eth_getLogs", async {
            self.provider.get_logs(&filter).await
        })
        .await?;
        Ok(logs
            .into_iter()
            .map(|log| RawLog {
                block_number: log.block_number.unwrap_or(from_block),
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
            })
            .collect())
    }
}
