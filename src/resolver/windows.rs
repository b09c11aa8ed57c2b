/// Blocks per `eth_getLogs` request.
pub const WINDOW_SIZE: u64 = 10;
/// How far below head the backward scan may start a window.
pub const MAX_LOOKBACK: u64 = 200_000;

/// Inclusive block range `[from, to]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogWindow {
    pub from: u64,
    pub to: u64,
}

impl LogWindow {
    pub fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }

    pub fn contains(&self, block: u64) -> bool {
        (self.from..=self.to).contains(&block)
    }
}

/// Lazy newest-first pager over `[0, head]`.
///
/// Windows are `window_size` blocks wide except the one that reaches genesis.
/// The sequence ends at genesis or once a window would start `max_lookback` or
/// more blocks below head, so it yields at most `max_lookback / window_size`
/// windows (rounded up). Cloning before iteration gives an independent restart.
#[derive(Clone, Debug)]
pub struct LogWindows {
    head: u64,
    next_to: Option<u64>,
    window_size: u64,
    max_lookback: u64,
}

impl LogWindows {
    pub fn new(head: u64) -> Self {
        Self::with_bounds(head, WINDOW_SIZE, MAX_LOOKBACK)
    }

    pub fn with_bounds(head: u64, window_size: u64, max_lookback: u64) -> Self {
        Self {
            head,
            next_to: Some(head),
            window_size: window_size.max(1),
            max_lookback,
        }
    }
}

impl Iterator for LogWindows {
    type Item = LogWindow;

    fn next(&mut self) -> Option<LogWindow> {
        let to = self.next_to?;
        if self.head - to >= self.max_lookback {
            self.next_to = None;
            return None;
        }
        let from = to.saturating_sub(self.window_size - 1);
        self.next_to = from.checked_sub(1);
        Some(LogWindow { from, to })
    }
}
