use crate::{Transaction, WriteTransaction};
use rsopal_core::{Block, BlockHash};

/// Per-variant block totals
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct BlockCounts {
    pub send: u64,
    pub receive: u64,
    pub open: u64,
    pub change: u64,
    pub state: u64,
}

impl BlockCounts {
    pub fn sum(&self) -> u64 {
        self.send + self.receive + self.open + self.change + self.state
    }
}

pub trait BlockStore: Send + Sync {
    /// Also points the predecessor's successor entry at `hash`
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, block: &Block);
    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Block>;
    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash);
    fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool;
    fn successor(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockHash>;
    fn successor_clear(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash);
    fn count(&self, txn: &dyn Transaction) -> BlockCounts;
}
