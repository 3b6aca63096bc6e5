use crate::{Transaction, WriteTransaction};
use rsopal_core::{Account, PendingInfo, PendingKey};

pub trait PendingStore: Send + Sync {
    fn put(&self, txn: &mut dyn WriteTransaction, key: &PendingKey, pending: &PendingInfo);
    fn get(&self, txn: &dyn Transaction, key: &PendingKey) -> Option<PendingInfo>;
    fn del(&self, txn: &mut dyn WriteTransaction, key: &PendingKey);
    fn exists(&self, txn: &dyn Transaction, key: &PendingKey) -> bool;
    /// All entries receivable by `account`, in key order
    fn iter_account(
        &self,
        txn: &dyn Transaction,
        account: &Account,
    ) -> Box<dyn Iterator<Item = (PendingKey, PendingInfo)>>;
    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (PendingKey, PendingInfo)>>;
}
