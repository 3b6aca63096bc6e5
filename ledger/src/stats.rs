use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
    sync::RwLock,
};

/// Primary statistics type
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum StatType {
    Ledger,
    Rollback,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum DetailType {
    Send,
    Receive,
    Open,
    Change,
    StateBlock,
}

/// Counter sink for block processing and rollback. Increments never fail;
/// the ledger does not depend on any counter value.
#[derive(Default)]
pub struct Stats {
    counters: RwLock<BTreeMap<(StatType, DetailType), AtomicU64>>,
}

impl Stats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn inc(&self, stat_type: StatType, detail: DetailType) {
        let key = (stat_type, detail);
        // two-step to avoid the exclusive lock in the common case
        {
            let counters = self.counters.read().unwrap();
            if let Some(counter) = counters.get(&key) {
                counter.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        let mut counters = self.counters.write().unwrap();
        counters
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, stat_type: StatType, detail: DetailType) -> u64 {
        self.counters
            .read()
            .unwrap()
            .get(&(stat_type, detail))
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or_default()
    }
}
