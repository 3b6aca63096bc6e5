use crate::{Transaction, WriteTransaction};
use rsopal_core::{Account, AccountInfo};

pub trait AccountStore: Send + Sync {
    fn put(&self, txn: &mut dyn WriteTransaction, account: &Account, info: &AccountInfo);
    fn get(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo>;
    fn del(&self, txn: &mut dyn WriteTransaction, account: &Account);
    fn exists(&self, txn: &dyn Transaction, account: &Account) -> bool;
    fn count(&self, txn: &dyn Transaction) -> u64;
    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (Account, AccountInfo)>>;
}
