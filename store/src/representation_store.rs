use crate::{Transaction, WriteTransaction};
use rsopal_core::{Amount, HashOrAccount};

/// Voting weight per representative identity. Written under rep-block
/// hashes; negative deltas arrive as two's-complement wrapping amounts.
pub trait RepresentationStore: Send + Sync {
    fn add(&self, txn: &mut dyn WriteTransaction, key: &HashOrAccount, delta: Amount);
    fn get(&self, txn: &dyn Transaction, key: &HashOrAccount) -> Amount;
    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (HashOrAccount, Amount)>>;
}
