use crate::{Transaction, WriteTransaction};
use rsopal_core::Checksum;

/// Single-slot ledger checksum accumulator
pub trait ChecksumStore: Send + Sync {
    fn get(&self, txn: &dyn Transaction) -> Checksum;
    fn put(&self, txn: &mut dyn WriteTransaction, checksum: &Checksum);
}
