//! Locate the five contracts a token spawned during allocation setup.
//!
//! State reads come first. When the initialized flag cannot be decoded at all
//! (older deployments, or nodes that return `0x` for the getter), the resolver
//! falls back once to a backward scan for the `AllocationsInitialized` event.

pub mod windows;

use alloy::primitives::Address;
use alloy::sol_types::SolEvent;

use crate::chain::{read_view, ChainClient, RawLog};
use crate::contracts::{allocations_initialized_topic, IVMToken};
use crate::core::AllocationAddressSet;
use crate::error::{ChainError, DeployError, Result};

pub use windows::{LogWindow, LogWindows, MAX_LOOKBACK, WINDOW_SIZE};

pub struct AddressResolver<'a, C: ?Sized> {
    chain: &'a C,
    window_size: u64,
    max_lookback: u64,
}

impl<'a, C> AddressResolver<'a, C>
where
    C: ChainClient + ?Sized,
{
    pub fn new(chain: &'a C) -> Self {
        Self {
            chain,
            window_size: WINDOW_SIZE,
            max_lookback: MAX_LOOKBACK,
        }
    }

    pub fn with_scan_bounds(mut self, window_size: u64, max_lookback: u64) -> Self {
        self.window_size = window_size;
        self.max_lookback = max_lookback;
        self
    }

    pub async fn resolve(&self, token: Address) -> Result<AllocationAddressSet> {
        match read_view(self.chain, token, IVMToken::allocationsInitializedCall {}).await {
            Ok(flag) if flag._0 => self.read_state(token).await,
            Ok(_) => Err(DeployError::AllocationsNotInitialized(token)),
            Err(err) if err.is_no_decodable_data() => {
                tracing::warn!(
                    "[RESOLVE] allocationsInitialized() unreadable on {:#x} ({}); scanning AllocationsInitialized logs",
                    token,
                    err
                );
                self.scan_logs(token).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn read_state(&self, token: Address) -> Result<AllocationAddressSet> {
        let chain = self.chain;
        let marketing = read_view(chain, token, IVMToken::marketingVestingCall {}).await?._0;
        let development = read_view(chain, token, IVMToken::devTechVestingCall {}).await?._0;
        let team = read_view(chain, token, IVMToken::teamVestingCall {}).await?._0;
        let reserve = read_view(chain, token, IVMToken::reserveVestingCall {}).await?._0;
        let loyalty = read_view(chain, token, IVMToken::loyaltyVaultCall {}).await?._0;
        AllocationAddressSet::new(marketing, development, team, reserve, loyalty)
    }

    /// Page backward from head; the newest window with a match decides, and
    /// within it the last log wins.
    pub async fn scan_logs(&self, token: Address) -> Result<AllocationAddressSet> {
        let head = self.chain.block_number().await?;
        let topic0 = allocations_initialized_topic();
        let windows = LogWindows::with_bounds(head, self.window_size, self.max_lookback);
        tracing::info!(
            "[RESOLVE] Scanning {:#x} from head {} (window={}, lookback={})",
            token,
            head,
            self.window_size,
            self.max_lookback
        );

        let mut queried = 0usize;
        for window in windows {
            queried += 1;
            let logs = self
                .chain
                .logs(token, topic0, window.from, window.to)
                .await?;
            let Some(latest) = logs.last() else {
                continue;
            };
            tracing::info!(
                "[RESOLVE] AllocationsInitialized found in block {} ({} windows queried)",
                latest.block_number,
                queried
            );
            return decode_allocations(latest);
        }

        Err(DeployError::AllocationsNotFound {
            token,
            lookback: self.max_lookback,
        })
    }
}

fn decode_allocations(log: &RawLog) -> Result<AllocationAddressSet> {
    let event = IVMToken::AllocationsInitialized::decode_raw_log(
        log.topics.iter().copied(),
        &log.data,
        true,
    )
    .map_err(|err| {
        ChainError::NoDecodableData(format!(
            "AllocationsInitialized in block {}: {err}",
            log.block_number
        ))
    })?;
    AllocationAddressSet::new(
        event.marketingVesting,
        event.devTechVesting,
        event.teamVesting,
        event.reserveVesting,
        event.loyaltyVault,
    )
}
