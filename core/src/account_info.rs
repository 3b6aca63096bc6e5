use crate::{Amount, BlockHash};

/// Latest information about an account chain
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct AccountInfo {
    /// Hash of the latest block on the chain
    pub head: BlockHash,
    /// Hash of the block that currently designates the representative
    pub rep_block: BlockHash,
    /// Hash of the first block on the chain
    pub open_block: BlockHash,
    pub balance: Amount,
    /// Seconds since epoch of the last update
    pub modified: u64,
    pub block_count: u64,
}
