use crate::{Account, Amount};

/// Sparse sidecar record stored every `block_info_max` blocks on legacy
/// chains. Accelerates resolving the account that owns a block hash.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct BlockInfo {
    pub account: Account,
    pub balance: Amount,
}

impl BlockInfo {
    pub fn new(account: Account, balance: Amount) -> Self {
        Self { account, balance }
    }
}
