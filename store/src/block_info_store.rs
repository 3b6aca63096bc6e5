use crate::{Transaction, WriteTransaction};
use rsopal_core::{BlockHash, BlockInfo};

pub trait BlockInfoStore: Send + Sync {
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, info: &BlockInfo);
    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockInfo>;
    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash);
    /// Sampling period: a sidecar entry is kept every this many blocks
    fn block_info_max(&self) -> u64;
}
