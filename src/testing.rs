//! In-memory collaborators for exercising the pipelines without a node or explorer.

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::chain::{ChainClient, PendingTx, RawLog, TxReceipt};
use crate::error::ChainError;
use crate::verify::{ServiceRejection, VerificationRequest, VerificationService};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub chain_id: usize,
    pub block_number: usize,
    pub deploy: usize,
    pub send_transaction: usize,
    pub transaction_receipt: usize,
    pub transaction_known: usize,
    pub call_view: usize,
    pub logs: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.chain_id
            + self.block_number
            + self.deploy
            + self.send_transaction
            + self.transaction_receipt
            + self.transaction_known
            + self.call_view
            + self.logs
    }
}

#[derive(Default)]
struct MockChainState {
    head: u64,
    mine_on_poll: bool,
    next_tx: u64,
    deployed_address: Address,
    receipts: HashMap<TxHash, TxReceipt>,
    dropped: HashSet<TxHash>,
    drop_next: bool,
    revert_next_receipt: bool,
    lagging_lookups: u32,
    send_error: Option<ChainError>,
    sent: Vec<(Address, Bytes)>,
    views: HashMap<(Address, [u8; 4]), Result<Bytes, ChainError>>,
    logs: Vec<(Address, RawLog)>,
    log_queries: Vec<(u64, u64)>,
    counts: CallCounts,
}

/// Scripted chain. Every accepted transaction is mined immediately into a new
/// block; with `mine_on_poll`, every `block_number` call also mines an empty block.
pub struct MockChain {
    state: Mutex<MockChainState>,
}

impl MockChain {
    pub fn new(head: u64) -> Self {
        Self {
            state: Mutex::new(MockChainState {
                head,
                deployed_address: Address::repeat_byte(0xd1),
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockChainState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn with_mining(self) -> Self {
        self.lock().mine_on_poll = true;
        self
    }

    pub fn with_deployed_address(self, address: Address) -> Self {
        self.lock().deployed_address = address;
        self
    }

    pub fn drop_next_transaction(&self) {
        self.lock().drop_next = true;
    }

    pub fn revert_next_receipt(&self) {
        self.lock().revert_next_receipt = true;
    }

    /// The next `polls` lookups see neither a receipt nor the transaction,
    /// as a load-balanced node that has not caught up would report.
    pub fn lag_lookups(&self, polls: u32) {
        self.lock().lagging_lookups = polls;
    }

    pub fn fail_sends_with(&self, err: ChainError) {
        self.lock().send_error = Some(err);
    }

    pub fn set_view(&self, to: Address, selector: [u8; 4], result: Result<Bytes, ChainError>) {
        self.lock().views.insert((to, selector), result);
    }

    pub fn set_view_value(&self, to: Address, selector: [u8; 4], encoded: Vec<u8>) {
        self.set_view(to, selector, Ok(Bytes::from(encoded)));
    }

    pub fn push_log(&self, address: Address, log: RawLog) {
        self.lock().logs.push((address, log));
    }

    pub fn head(&self) -> u64 {
        self.lock().head
    }

    pub fn counts(&self) -> CallCounts {
        self.lock().counts
    }

    pub fn sent(&self) -> Vec<(Address, Bytes)> {
        self.lock().sent.clone()
    }

    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.lock().log_queries.clone()
    }

    fn submit(state: &mut MockChainState, contract_address: Option<Address>) -> PendingTx {
        state.next_tx += 1;
        let hash = B256::from(U256::from(state.next_tx));
        if std::mem::take(&mut state.drop_next) {
            state.dropped.insert(hash);
            return PendingTx { hash };
        }
        let success = !std::mem::take(&mut state.revert_next_receipt);
        state.head += 1;
        state.receipts.insert(
            hash,
            TxReceipt {
                hash,
                block_number: state.head,
                success,
                contract_address,
            },
        );
        PendingTx { hash }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.lock().counts.chain_id += 1;
        Ok(31337)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        let mut state = self.lock();
        state.counts.block_number += 1;
        if state.mine_on_poll {
            state.head += 1;
        }
        Ok(state.head)
    }

    async fn deploy(&self, _creation_code: Bytes) -> Result<PendingTx, ChainError> {
        let mut state = self.lock();
        state.counts.deploy += 1;
        if let Some(err) = state.send_error.clone() {
            return Err(err);
        }
        let address = state.deployed_address;
        Ok(Self::submit(&mut state, Some(address)))
    }

    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> Result<PendingTx, ChainError> {
        let mut state = self.lock();
        state.counts.send_transaction += 1;
        if let Some(err) = state.send_error.clone() {
            return Err(err);
        }
        state.sent.push((to, calldata));
        Ok(Self::submit(&mut state, None))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, ChainError> {
        let mut state = self.lock();
        state.counts.transaction_receipt += 1;
        if state.lagging_lookups > 0 {
            return Ok(None);
        }
        let head = state.head;
        Ok(state
            .receipts
            .get(&hash)
            .filter(|receipt| receipt.block_number <= head)
            .copied())
    }

    async fn transaction_known(&self, hash: TxHash) -> Result<bool, ChainError> {
        let mut state = self.lock();
        state.counts.transaction_known += 1;
        if state.lagging_lookups > 0 {
            state.lagging_lookups -= 1;
            return Ok(false);
        }
        Ok(!state.dropped.contains(&hash))
    }

    async fn call_view(&self, to: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let mut state = self.lock();
        state.counts.call_view += 1;
        let mut selector = [0u8; 4];
        if calldata.len() >= 4 {
            selector.copy_from_slice(&calldata[..4]);
        }
        state
            .views
            .get(&(to, selector))
            .cloned()
            .unwrap_or_else(|| Ok(Bytes::new()))
    }

    async fn logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError> {
        let mut state = self.lock();
        state.counts.logs += 1;
        state.log_queries.push((from_block, to_block));
        Ok(state
            .logs
            .iter()
            .filter(|(emitter, log)| {
                *emitter == address
                    && log.topics.first() == Some(&topic0)
                    && (from_block..=to_block).contains(&log.block_number)
            })
            .map(|(_, log)| log.clone())
            .collect())
    }
}

/// Explorer double that replays scripted responses in order and records requests.
#[derive(Default)]
pub struct MockExplorer {
    responses: Mutex<Vec<Result<(), String>>>,
    requests: Mutex<Vec<VerificationRequest>>,
}

impl MockExplorer {
    /// Every submission succeeds.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Responses are consumed front to back; once exhausted, submissions succeed.
    pub fn scripted(responses: Vec<Result<(), String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<VerificationRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl VerificationService for MockExplorer {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ServiceRejection> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        let next = match self.responses.lock() {
            Ok(mut guard) if !guard.is_empty() => guard.remove(0),
            Ok(_) => Ok(()),
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                if guard.is_empty() {
                    Ok(())
                } else {
                    guard.remove(0)
                }
            }
        };
        next.map_err(|message| ServiceRejection { message })
    }
}
