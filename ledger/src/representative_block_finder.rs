use rsopal_core::{Block, BlockHash};
use rsopal_store::{Store, Transaction};

/// Goes back in the block history until it finds a block carrying
/// representative information
pub(crate) struct RepresentativeBlockFinder<'a> {
    txn: &'a dyn Transaction,
    store: &'a dyn Store,
}

impl<'a> RepresentativeBlockFinder<'a> {
    pub(crate) fn new(txn: &'a dyn Transaction, store: &'a dyn Store) -> Self {
        Self { txn, store }
    }

    pub(crate) fn find_rep_block(&self, hash: BlockHash) -> BlockHash {
        let mut current = hash;
        let mut result = BlockHash::new();
        while result.is_zero() {
            let Some(block) = self.store.block().get(self.txn, &current) else {
                return BlockHash::new();
            };
            (current, result) = match &block {
                Block::Send(_) => (block.previous(), BlockHash::new()),
                Block::Receive(_) => (block.previous(), BlockHash::new()),
                Block::Open(_) => (BlockHash::new(), block.hash()),
                Block::Change(_) => (BlockHash::new(), block.hash()),
                Block::State(_) => (BlockHash::new(), block.hash()),
            };
        }

        result
    }
}
