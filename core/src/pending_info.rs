use crate::{Account, Amount};

/// Value of the pending table: who sent the funds and how much
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct PendingInfo {
    pub source: Account,
    pub amount: Amount,
}

impl PendingInfo {
    pub fn new(source: Account, amount: Amount) -> Self {
        Self { source, amount }
    }
}
