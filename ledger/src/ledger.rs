use crate::{
    BlockRollbackPerformer, ChangeBlockProcessor, LedgerConstants, OpenBlockProcessor,
    ReceiveBlockProcessor, RepresentativeBlockFinder, SendBlockProcessor, StateBlockProcessor,
    Stats, Votes,
};
use rsopal_core::{
    utils::seconds_since_epoch, Account, AccountInfo, Amount, Block, BlockHash, BlockInfo,
    Checksum, PendingInfo, PendingKey, Root, StateBlock,
};
use rsopal_store::{ReadTransaction, Store, Transaction, WriteTransaction};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};
use tracing::debug;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
#[repr(u8)]
pub enum ProcessResult {
    /// Hasn't been seen before, signed correctly
    #[default]
    Progress,
    /// Signature was bad, forged or transmission error
    BadSignature,
    /// Already seen and was valid
    Old,
    /// Malicious attempt to spend a negative amount
    NegativeSpend,
    /// Malicious fork based on previous
    Fork,
    /// Source block doesn't exist or has already been received
    Unreceivable,
    /// Block marked as previous is unknown
    GapPrevious,
    /// Block marked as source is unknown
    GapSource,
    /// Block attempts to open the burn account
    OpenedBurnAccount,
    /// Balance and amount delta don't match
    BalanceMismatch,
    /// This block cannot follow the previous block
    BlockPosition,
    /// The state block parse canary is not yet present
    StateBlockDisabled,
}

/// Outcome of processing one block
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ProcessReturn {
    pub code: ProcessResult,
    pub account: Account,
    pub amount: Amount,
    pub pending_account: Account,
    pub state_is_send: bool,
}

impl ProcessReturn {
    pub(crate) fn rejection(code: ProcessResult) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }
}

/// Orders tally entries by descending weight, ties broken by hash
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TallyKey {
    pub weight: Amount,
    pub hash: BlockHash,
}

impl Ord for TallyKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for TallyKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Ledger {
    pub store: Arc<dyn Store>,
    pub stats: Arc<Stats>,
    pub constants: LedgerConstants,
    bootstrap_weight_max_blocks: AtomicU64,
    pub check_bootstrap_weights: AtomicBool,
    pub bootstrap_weights: Mutex<HashMap<Account, Amount>>,
}

impl Ledger {
    pub fn new(store: Arc<dyn Store>, constants: LedgerConstants) -> anyhow::Result<Self> {
        Self::with_stats(store, constants, Arc::new(Stats::new()))
    }

    pub fn with_stats(
        store: Arc<dyn Store>,
        constants: LedgerConstants,
        stats: Arc<Stats>,
    ) -> anyhow::Result<Self> {
        let ledger = Self {
            store,
            stats,
            constants,
            bootstrap_weight_max_blocks: AtomicU64::new(1),
            check_bootstrap_weights: AtomicBool::new(true),
            bootstrap_weights: Mutex::new(HashMap::new()),
        };
        ledger.initialize()?;
        Ok(ledger)
    }

    pub fn read_txn(&self) -> Box<dyn ReadTransaction> {
        self.store.tx_begin_read()
    }

    pub fn rw_txn(&self) -> Box<dyn WriteTransaction> {
        self.store.tx_begin_write()
    }

    fn initialize(&self) -> anyhow::Result<()> {
        let is_empty = {
            let txn = self.read_txn();
            self.store.account().count(txn.txn()) == 0
        };
        if is_empty {
            let mut txn = self.rw_txn();
            self.add_genesis_block(txn.as_mut());
            txn.commit();
        }
        Ok(())
    }

    fn add_genesis_block(&self, txn: &mut dyn WriteTransaction) {
        let genesis_hash = self.constants.genesis.hash();
        let genesis_account = self.constants.genesis_account;
        debug!(genesis = %genesis_hash, "initializing empty ledger");
        self.store
            .block()
            .put(txn, &genesis_hash, &self.constants.genesis);
        self.store
            .representation()
            .add(txn, &genesis_hash.into(), self.constants.genesis_amount);
        self.store.frontier().put(txn, &genesis_hash, &genesis_account);
        self.change_latest(
            txn,
            &genesis_account,
            &genesis_hash,
            &genesis_hash,
            self.constants.genesis_amount,
            1,
            false,
        );
    }

    /// Validate `block` and, on progress, apply all of its index updates
    /// within the caller's transaction.
    pub fn process(&self, txn: &mut dyn WriteTransaction, block: &Block) -> ProcessReturn {
        let result = match block {
            Block::Send(send) => SendBlockProcessor::new(self, txn, block, send).process(),
            Block::Receive(receive) => {
                ReceiveBlockProcessor::new(self, txn, block, receive).process()
            }
            Block::Open(open) => OpenBlockProcessor::new(self, txn, block, open).process(),
            Block::Change(change) => ChangeBlockProcessor::new(self, txn, block, change).process(),
            Block::State(state) => StateBlockProcessor::new(self, txn, block, state).process(),
        };
        result.unwrap_or_else(ProcessReturn::rejection)
    }

    /// Roll back blocks until `hash` no longer exists in the ledger.
    /// Returns the rolled back blocks, most recent first per account.
    pub fn rollback(
        &self,
        txn: &mut dyn WriteTransaction,
        hash: &BlockHash,
    ) -> anyhow::Result<Vec<Block>> {
        BlockRollbackPerformer::new(self, txn).roll_back(hash)
    }

    /// Balance of the account containing `hash`, at the time of that block
    pub fn balance(&self, txn: &dyn Transaction, hash: &BlockHash) -> Amount {
        let mut result = Amount::zero();
        let mut current = *hash;
        while !current.is_zero() {
            let Some(block) = self.store.block().get(txn, &current) else {
                break;
            };
            match &block {
                Block::Send(b) => {
                    result += b.balance();
                    current = BlockHash::new();
                }
                Block::State(b) => {
                    result += b.balance();
                    current = BlockHash::new();
                }
                Block::Receive(b) => {
                    result += self.source_amount(txn, &b.source());
                    current = b.previous();
                }
                Block::Open(b) => {
                    result += self.source_amount(txn, &b.source());
                    current = BlockHash::new();
                }
                Block::Change(b) => {
                    current = b.previous();
                }
            }
        }
        result
    }

    fn source_amount(&self, txn: &dyn Transaction, source: &BlockHash) -> Amount {
        if self.store.block().exists(txn, source) {
            self.amount(txn, source).unwrap_or_default()
        } else {
            // only the genesis open claims a source outside the ledger
            self.constants.genesis_amount
        }
    }

    /// Absolute amount decrease or increase for a block
    pub fn amount(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Amount> {
        self.store.block().get(txn, hash).map(|block| {
            let balance = self.balance(txn, hash);
            let previous_balance = self.balance(txn, &block.previous());
            if balance > previous_balance {
                balance - previous_balance
            } else {
                previous_balance - balance
            }
        })
    }

    /// Balance for an account by account number
    pub fn account_balance(&self, txn: &dyn Transaction, account: &Account) -> Amount {
        self.store
            .account()
            .get(txn, account)
            .map(|info| info.balance)
            .unwrap_or_default()
    }

    /// Sum of all amounts sent to `account` that have not been received yet
    pub fn account_pending(&self, txn: &dyn Transaction, account: &Account) -> Amount {
        let mut result = Amount::zero();
        for (_, info) in self.store.pending().iter_account(txn, account) {
            result += info.amount;
        }
        result
    }

    /// Hash of the latest block that set the representative in effect at
    /// `hash`
    pub fn representative(&self, txn: &dyn Transaction, hash: &BlockHash) -> BlockHash {
        let result = self.representative_calculated(txn, hash);
        debug_assert!(result.is_zero() || self.store.block().exists(txn, &result));
        result
    }

    pub fn representative_calculated(&self, txn: &dyn Transaction, hash: &BlockHash) -> BlockHash {
        RepresentativeBlockFinder::new(txn, self.store.as_ref()).find_rep_block(*hash)
    }

    /// Account that owns the block `hash`. Fast path through the block-info
    /// sidecar; otherwise walks towards the head until a state block names
    /// the account or the frontier table does.
    pub fn account(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Account> {
        let mut hash = *hash;
        let mut block = self.store.block().get(txn, &hash)?;
        loop {
            if let Block::State(state) = &block {
                return Some(state.account());
            }
            if let Some(info) = self.store.block_info().get(txn, &hash) {
                return Some(info.account);
            }
            match self.store.block().successor(txn, &hash) {
                Some(successor) => {
                    hash = successor;
                    block = self.store.block().get(txn, &hash)?;
                }
                None => return self.store.frontier().get(txn, &hash),
            }
        }
    }

    /// Latest block for an account
    pub fn latest(&self, txn: &dyn Transaction, account: &Account) -> Option<BlockHash> {
        self.store.account().get(txn, account).map(|info| info.head)
    }

    /// Latest root for an account; the account number if it has no blocks
    pub fn latest_root(&self, txn: &dyn Transaction, account: &Account) -> Root {
        match self.store.account().get(txn, account) {
            Some(info) => info.head.into(),
            None => (*account).into(),
        }
    }

    /// Vote weight of an account. Until the ledger has caught up past
    /// `bootstrap_weight_max_blocks`, a static snapshot of trusted weights
    /// answers instead; the check disables itself once the threshold is
    /// crossed.
    pub fn weight(&self, txn: &dyn Transaction, account: &Account) -> Amount {
        if self.check_bootstrap_weights.load(Ordering::SeqCst) {
            if self.store.block().count(txn).sum() < self.bootstrap_weight_max_blocks() {
                let weights = self.bootstrap_weights.lock().unwrap();
                if let Some(&weight) = weights.get(account) {
                    return weight;
                }
            } else {
                self.check_bootstrap_weights.store(false, Ordering::SeqCst);
            }
        }
        self.store.representation().get(txn, &(*account).into())
    }

    pub fn bootstrap_weight_max_blocks(&self) -> u64 {
        self.bootstrap_weight_max_blocks.load(Ordering::SeqCst)
    }

    pub fn set_bootstrap_weight_max_blocks(&self, max: u64) {
        self.bootstrap_weight_max_blocks.store(max, Ordering::SeqCst)
    }

    /// Sum vote weight per candidate block, in decreasing weight order
    pub fn tally(&self, txn: &dyn Transaction, votes: &Votes) -> BTreeMap<TallyKey, Arc<Block>> {
        let mut totals: HashMap<BlockHash, (Arc<Block>, Amount)> = HashMap::new();
        for (representative, block) in &votes.rep_votes {
            let entry = totals
                .entry(block.hash())
                .or_insert_with(|| (Arc::clone(block), Amount::zero()));
            entry.1 += self.weight(txn, representative);
        }

        let mut result = BTreeMap::new();
        for (hash, (block, weight)) in totals {
            result.insert(TallyKey { weight, hash }, block);
        }
        result
    }

    /// Winning block of a tally with its vote weight
    pub fn winner(&self, txn: &dyn Transaction, votes: &Votes) -> Option<(Amount, Arc<Block>)> {
        let tally = self.tally(txn, votes);
        tally
            .into_iter()
            .next()
            .map(|(key, block)| (key.weight, block))
    }

    /// Block that follows `root`: the open block when the root is an
    /// account, the successor of the block otherwise
    pub fn successor(&self, txn: &dyn Transaction, root: &Root) -> Option<Block> {
        let successor = if self.store.account().exists(txn, &root.to_account()) {
            self.store
                .account()
                .get(txn, &root.to_account())
                .map(|info| info.open_block)
        } else {
            self.store.block().successor(txn, &root.to_block_hash())
        };
        let successor = successor?;
        let result = self.store.block().get(txn, &successor);
        debug_assert!(result.is_some());
        result
    }

    /// Given a block that is not in the ledger, the block currently
    /// occupying its root slot
    pub fn forked_block(&self, txn: &dyn Transaction, block: &Block) -> Option<Block> {
        debug_assert!(!self.store.block().exists(txn, &block.hash()));
        let root = block.root();
        debug_assert!(
            self.store.block().exists(txn, &root.to_block_hash())
                || self.store.account().exists(txn, &root.to_account())
        );
        let successor = self
            .store
            .block()
            .successor(txn, &root.to_block_hash())
            .and_then(|hash| self.store.block().get(txn, &hash));
        match successor {
            Some(block) => Some(block),
            None => {
                let info = self.store.account().get(txn, &root.to_account())?;
                let result = self.store.block().get(txn, &info.open_block);
                debug_assert!(result.is_some());
                result
            }
        }
    }

    /// Integrity probe. The range arguments are accepted for interface
    /// compatibility; a single aggregate covers the whole account space.
    pub fn checksum(&self, txn: &dyn Transaction, _begin: &Account, _end: &Account) -> Checksum {
        self.store.checksum().get(txn)
    }

    pub fn block_exists(&self, hash: &BlockHash) -> bool {
        let txn = self.read_txn();
        self.store.block().exists(txn.txn(), hash)
    }

    pub fn block_text(&self, hash: &BlockHash) -> anyhow::Result<String> {
        let txn = self.read_txn();
        match self.store.block().get(txn.txn(), hash) {
            Some(block) => block.to_json(),
            None => Ok(String::new()),
        }
    }

    pub fn dump_account_chain(&self, account: &Account) {
        let txn = self.read_txn();
        let mut hash = self.latest(txn.txn(), account).unwrap_or_default();
        while !hash.is_zero() {
            let block = self.store.block().get(txn.txn(), &hash);
            debug_assert!(block.is_some());
            debug!(%hash, "account chain entry");
            hash = block.map(|b| b.previous()).unwrap_or_default();
        }
    }

    /// A state block is a send when it lowers the balance of its account
    pub fn is_send(&self, txn: &dyn Transaction, block: &StateBlock) -> bool {
        let previous = block.previous();
        if previous.is_zero() {
            return false;
        }
        block.balance() < self.balance(txn, &previous)
    }

    pub fn block_destination(&self, txn: &dyn Transaction, block: &Block) -> Account {
        match block {
            Block::Send(send) => send.destination(),
            Block::State(state) if self.is_send(txn, state) => state.link().into(),
            _ => *Account::zero(),
        }
    }

    pub fn block_source(&self, txn: &dyn Transaction, block: &Block) -> BlockHash {
        // universal blocks return no source field; a state receive carries
        // it in the link
        match block {
            Block::State(state) if !self.is_send(txn, state) => state.link().into(),
            _ => block.source().unwrap_or_default(),
        }
    }

    pub fn state_block_parsing_enabled(&self, txn: &dyn Transaction) -> bool {
        self.store
            .block()
            .exists(txn, &self.constants.state_block_parse_canary)
    }

    pub fn state_block_generation_enabled(&self, txn: &dyn Transaction) -> bool {
        self.state_block_parsing_enabled(txn)
            && self
                .store
                .block()
                .exists(txn, &self.constants.state_block_generate_canary)
    }

    pub(crate) fn checksum_update(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        let mut value = self.store.checksum().get(txn.txn());
        value.xor(hash);
        self.store.checksum().put(txn, &value);
    }

    /// Move an account to a new head. Maintains the checksum, installs the
    /// open block on first use, samples the block-info sidecar on legacy
    /// chains and deletes the record when `hash` is zero.
    pub(crate) fn change_latest(
        &self,
        txn: &mut dyn WriteTransaction,
        account: &Account,
        hash: &BlockHash,
        rep_block: &BlockHash,
        balance: Amount,
        block_count: u64,
        is_state: bool,
    ) {
        let mut info = match self.store.account().get(txn.txn(), account) {
            Some(info) => {
                self.checksum_update(txn, &info.head);
                info
            }
            None => {
                debug_assert!(self
                    .store
                    .block()
                    .get(txn.txn(), hash)
                    .map(|block| block.previous().is_zero())
                    .unwrap_or(true));
                AccountInfo {
                    open_block: *hash,
                    ..Default::default()
                }
            }
        };
        if !hash.is_zero() {
            info.head = *hash;
            info.rep_block = *rep_block;
            info.balance = balance;
            info.modified = seconds_since_epoch();
            info.block_count = block_count;
            self.store.account().put(txn, account, &info);
            if block_count % self.store.block_info().block_info_max() == 0 && !is_state {
                self.store
                    .block_info()
                    .put(txn, hash, &BlockInfo::new(*account, balance));
            }
            self.checksum_update(txn, hash);
        } else {
            self.store.account().del(txn, account);
        }
    }

    pub fn get_block(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Block> {
        self.store.block().get(txn, hash)
    }

    pub fn get_account_info(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo> {
        self.store.account().get(txn, account)
    }

    pub fn get_frontier(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Account> {
        self.store.frontier().get(txn, hash)
    }

    pub fn get_pending(&self, txn: &dyn Transaction, key: &PendingKey) -> Option<PendingInfo> {
        self.store.pending().get(txn, key)
    }
}
