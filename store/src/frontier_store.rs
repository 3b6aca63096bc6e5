use crate::{Transaction, WriteTransaction};
use rsopal_core::{Account, BlockHash};

/// Maps head block hashes of legacy chains to their owning account
pub trait FrontierStore: Send + Sync {
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, account: &Account);
    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Account>;
    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash);
    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (BlockHash, Account)>>;
}
