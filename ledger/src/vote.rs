use rsopal_core::{Account, Block};
use std::{collections::HashMap, sync::Arc};

/// One candidate block per voting representative for a single root
#[derive(Default)]
pub struct Votes {
    pub rep_votes: HashMap<Account, Arc<Block>>,
}

impl Votes {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn vote(&mut self, representative: Account, block: Arc<Block>) {
        self.rep_votes.insert(representative, block);
    }
}
