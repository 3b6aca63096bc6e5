use crate::{
    AccountStore, BlockCounts, BlockInfoStore, BlockStore, ChecksumStore, FrontierStore,
    PendingStore, ReadTransaction, RepresentationStore, Store, Transaction, WriteTransaction,
};
use rsopal_core::{
    Account, AccountInfo, Amount, Block, BlockHash, BlockInfo, Checksum, HashOrAccount,
    PendingInfo, PendingKey,
};
use std::{
    any::Any,
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Default sidecar sampling period
const BLOCK_INFO_MAX: u64 = 128;

#[derive(Clone, Default)]
struct Tables {
    blocks: BTreeMap<BlockHash, Block>,
    successors: BTreeMap<BlockHash, BlockHash>,
    accounts: BTreeMap<Account, AccountInfo>,
    pending: BTreeMap<PendingKey, PendingInfo>,
    frontiers: BTreeMap<BlockHash, Account>,
    representation: BTreeMap<HashOrAccount, Amount>,
    block_info: BTreeMap<BlockHash, BlockInfo>,
    checksum: Checksum,
}

/// In-memory engine behind the store contract. Write transactions work on a
/// private copy of the tables and publish it atomically on `commit`;
/// dropping the transaction discards the copy. Readers snapshot the
/// committed tables when the transaction begins.
pub struct MemStore {
    tables: Arc<Mutex<Tables>>,
    block: MemBlockStore,
    account: MemAccountStore,
    pending: MemPendingStore,
    frontier: MemFrontierStore,
    representation: MemRepresentationStore,
    block_info: MemBlockInfoStore,
    checksum: MemChecksumStore,
}

impl MemStore {
    pub fn new() -> Self {
        Self::with_block_info_max(BLOCK_INFO_MAX)
    }

    pub fn with_block_info_max(block_info_max: u64) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            block: MemBlockStore {},
            account: MemAccountStore {},
            pending: MemPendingStore {},
            frontier: MemFrontierStore {},
            representation: MemRepresentationStore {},
            block_info: MemBlockInfoStore { block_info_max },
            checksum: MemChecksumStore {},
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemStore {
    fn tx_begin_read(&self) -> Box<dyn ReadTransaction> {
        Box::new(MemReadTransaction {
            tables: self.tables.lock().unwrap().clone(),
        })
    }

    fn tx_begin_write(&self) -> Box<dyn WriteTransaction> {
        Box::new(MemWriteTransaction {
            tables: self.tables.lock().unwrap().clone(),
            shared: Arc::clone(&self.tables),
        })
    }

    fn block(&self) -> &dyn BlockStore {
        &self.block
    }

    fn account(&self) -> &dyn AccountStore {
        &self.account
    }

    fn pending(&self) -> &dyn PendingStore {
        &self.pending
    }

    fn frontier(&self) -> &dyn FrontierStore {
        &self.frontier
    }

    fn representation(&self) -> &dyn RepresentationStore {
        &self.representation
    }

    fn block_info(&self) -> &dyn BlockInfoStore {
        &self.block_info
    }

    fn checksum(&self) -> &dyn ChecksumStore {
        &self.checksum
    }
}

struct MemReadTransaction {
    tables: Tables,
}

impl Transaction for MemReadTransaction {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ReadTransaction for MemReadTransaction {
    fn txn(&self) -> &dyn Transaction {
        self
    }
}

struct MemWriteTransaction {
    tables: Tables,
    shared: Arc<Mutex<Tables>>,
}

impl Transaction for MemWriteTransaction {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl WriteTransaction for MemWriteTransaction {
    fn txn(&self) -> &dyn Transaction {
        self
    }

    fn txn_mut(&mut self) -> &mut dyn Transaction {
        self
    }

    fn commit(&mut self) {
        *self.shared.lock().unwrap() = self.tables.clone();
    }
}

fn tables(txn: &dyn Transaction) -> &Tables {
    let any = txn.as_any();
    if let Some(read) = any.downcast_ref::<MemReadTransaction>() {
        return &read.tables;
    }
    if let Some(write) = any.downcast_ref::<MemWriteTransaction>() {
        return &write.tables;
    }
    panic!("transaction does not belong to a memory store");
}

fn tables_mut(txn: &mut dyn WriteTransaction) -> &mut Tables {
    match txn.txn_mut().as_any_mut().downcast_mut::<MemWriteTransaction>() {
        Some(write) => &mut write.tables,
        None => panic!("transaction does not belong to a memory store"),
    }
}

struct MemBlockStore {}

impl BlockStore for MemBlockStore {
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, block: &Block) {
        let tables = tables_mut(txn);
        tables.blocks.insert(*hash, block.clone());
        if !block.previous().is_zero() {
            tables.successors.insert(block.previous(), *hash);
        }
    }

    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Block> {
        tables(txn).blocks.get(hash).cloned()
    }

    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        tables_mut(txn).blocks.remove(hash);
    }

    fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> bool {
        tables(txn).blocks.contains_key(hash)
    }

    fn successor(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockHash> {
        tables(txn).successors.get(hash).copied()
    }

    fn successor_clear(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        tables_mut(txn).successors.remove(hash);
    }

    fn count(&self, txn: &dyn Transaction) -> BlockCounts {
        let mut counts = BlockCounts::default();
        for block in tables(txn).blocks.values() {
            match block {
                Block::Send(_) => counts.send += 1,
                Block::Receive(_) => counts.receive += 1,
                Block::Open(_) => counts.open += 1,
                Block::Change(_) => counts.change += 1,
                Block::State(_) => counts.state += 1,
            }
        }
        counts
    }
}

struct MemAccountStore {}

impl AccountStore for MemAccountStore {
    fn put(&self, txn: &mut dyn WriteTransaction, account: &Account, info: &AccountInfo) {
        tables_mut(txn).accounts.insert(*account, info.clone());
    }

    fn get(&self, txn: &dyn Transaction, account: &Account) -> Option<AccountInfo> {
        tables(txn).accounts.get(account).cloned()
    }

    fn del(&self, txn: &mut dyn WriteTransaction, account: &Account) {
        tables_mut(txn).accounts.remove(account);
    }

    fn exists(&self, txn: &dyn Transaction, account: &Account) -> bool {
        tables(txn).accounts.contains_key(account)
    }

    fn count(&self, txn: &dyn Transaction) -> u64 {
        tables(txn).accounts.len() as u64
    }

    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (Account, AccountInfo)>> {
        let entries: Vec<_> = tables(txn)
            .accounts
            .iter()
            .map(|(account, info)| (*account, info.clone()))
            .collect();
        Box::new(entries.into_iter())
    }
}

struct MemPendingStore {}

impl PendingStore for MemPendingStore {
    fn put(&self, txn: &mut dyn WriteTransaction, key: &PendingKey, pending: &PendingInfo) {
        tables_mut(txn).pending.insert(*key, *pending);
    }

    fn get(&self, txn: &dyn Transaction, key: &PendingKey) -> Option<PendingInfo> {
        tables(txn).pending.get(key).copied()
    }

    fn del(&self, txn: &mut dyn WriteTransaction, key: &PendingKey) {
        tables_mut(txn).pending.remove(key);
    }

    fn exists(&self, txn: &dyn Transaction, key: &PendingKey) -> bool {
        tables(txn).pending.contains_key(key)
    }

    fn iter_account(
        &self,
        txn: &dyn Transaction,
        account: &Account,
    ) -> Box<dyn Iterator<Item = (PendingKey, PendingInfo)>> {
        let start = PendingKey::new(*account, BlockHash::new());
        let account = *account;
        let entries: Vec<_> = tables(txn)
            .pending
            .range(start..)
            .take_while(|(key, _)| key.account == account)
            .map(|(key, info)| (*key, *info))
            .collect();
        Box::new(entries.into_iter())
    }

    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (PendingKey, PendingInfo)>> {
        let entries: Vec<_> = tables(txn)
            .pending
            .iter()
            .map(|(key, info)| (*key, *info))
            .collect();
        Box::new(entries.into_iter())
    }
}

struct MemFrontierStore {}

impl FrontierStore for MemFrontierStore {
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, account: &Account) {
        tables_mut(txn).frontiers.insert(*hash, *account);
    }

    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<Account> {
        tables(txn).frontiers.get(hash).copied()
    }

    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        tables_mut(txn).frontiers.remove(hash);
    }

    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (BlockHash, Account)>> {
        let entries: Vec<_> = tables(txn)
            .frontiers
            .iter()
            .map(|(hash, account)| (*hash, *account))
            .collect();
        Box::new(entries.into_iter())
    }
}

struct MemRepresentationStore {}

impl RepresentationStore for MemRepresentationStore {
    fn add(&self, txn: &mut dyn WriteTransaction, key: &HashOrAccount, delta: Amount) {
        let tables = tables_mut(txn);
        let weight = tables.representation.entry(*key).or_default();
        *weight = weight.wrapping_add(delta);
    }

    fn get(&self, txn: &dyn Transaction, key: &HashOrAccount) -> Amount {
        tables(txn)
            .representation
            .get(key)
            .copied()
            .unwrap_or_default()
    }

    fn iter(&self, txn: &dyn Transaction) -> Box<dyn Iterator<Item = (HashOrAccount, Amount)>> {
        let entries: Vec<_> = tables(txn)
            .representation
            .iter()
            .map(|(key, weight)| (*key, *weight))
            .collect();
        Box::new(entries.into_iter())
    }
}

struct MemBlockInfoStore {
    block_info_max: u64,
}

impl BlockInfoStore for MemBlockInfoStore {
    fn put(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash, info: &BlockInfo) {
        tables_mut(txn).block_info.insert(*hash, *info);
    }

    fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> Option<BlockInfo> {
        tables(txn).block_info.get(hash).copied()
    }

    fn del(&self, txn: &mut dyn WriteTransaction, hash: &BlockHash) {
        tables_mut(txn).block_info.remove(hash);
    }

    fn block_info_max(&self) -> u64 {
        self.block_info_max
    }
}

struct MemChecksumStore {}

impl ChecksumStore for MemChecksumStore {
    fn get(&self, txn: &dyn Transaction) -> Checksum {
        tables(txn).checksum
    }

    fn put(&self, txn: &mut dyn WriteTransaction, checksum: &Checksum) {
        tables_mut(txn).checksum = *checksum;
    }
}
