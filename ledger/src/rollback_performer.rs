use crate::{DetailType, Ledger, StatType};
use rsopal_core::{
    Account, Amount, Block, BlockHash, ChangeBlock, OpenBlock, PendingInfo, PendingKey,
    ReceiveBlock, SendBlock, StateBlock,
};
use rsopal_store::WriteTransaction;
use tracing::debug;

/// Undoes blocks from an account's head until a target hash is gone
pub(crate) struct BlockRollbackPerformer<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    rolled_back: Vec<Block>,
}

impl<'a> BlockRollbackPerformer<'a> {
    pub(crate) fn new(ledger: &'a Ledger, txn: &'a mut dyn WriteTransaction) -> Self {
        Self {
            ledger,
            txn,
            rolled_back: Vec::new(),
        }
    }

    pub(crate) fn roll_back(mut self, hash: &BlockHash) -> anyhow::Result<Vec<Block>> {
        debug_assert!(self.ledger.store.block().exists(self.txn.txn(), hash));
        let account = self
            .ledger
            .account(self.txn.txn(), hash)
            .ok_or_else(|| anyhow!("no account found for block {}", hash))?;
        while self.ledger.store.block().exists(self.txn.txn(), hash) {
            let info = self
                .ledger
                .get_account_info(self.txn.txn(), &account)
                .ok_or_else(|| anyhow!("account record disappeared during rollback"))?;
            let head = self
                .ledger
                .get_block(self.txn.txn(), &info.head)
                .ok_or_else(|| anyhow!("head block missing during rollback"))?;
            debug!(block = %head.hash(), "rolling back block");
            self.roll_back_block(&head)?;
            self.rolled_back.push(head);
        }
        Ok(self.rolled_back)
    }

    fn roll_back_block(&mut self, block: &Block) -> anyhow::Result<()> {
        match block {
            Block::Send(send) => self.roll_back_send(send),
            Block::Receive(receive) => self.roll_back_receive(receive),
            Block::Open(open) => self.roll_back_open(open),
            Block::Change(change) => self.roll_back_change(change),
            Block::State(state) => self.roll_back_state(state),
        }
    }

    fn roll_back_send(&mut self, block: &SendBlock) -> anyhow::Result<()> {
        let hash = block.hash();
        let key = PendingKey::new(block.destination(), hash);
        // the destination may have received the funds already; unwind its
        // chain until the pending entry reappears
        while !self.ledger.store.pending().exists(self.txn.txn(), &key) {
            let latest = self.latest_block_for_account(&block.destination())?;
            self.recurse_roll_back(&latest)?;
        }
        let pending = self
            .ledger
            .get_pending(self.txn.txn(), &key)
            .ok_or_else(|| anyhow!("pending entry missing after dependency rollback"))?;
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), &pending.source)
            .ok_or_else(|| anyhow!("sender account record missing"))?;
        let representative = self.ledger.representative(self.txn.txn(), &hash);
        let previous_balance = self.ledger.balance(self.txn.txn(), &block.previous());

        self.ledger.store.pending().del(self.txn, &key);
        self.ledger
            .store
            .representation()
            .add(self.txn, &representative.into(), pending.amount);
        self.ledger.change_latest(
            self.txn,
            &pending.source,
            &block.previous(),
            &info.rep_block,
            previous_balance,
            info.block_count - 1,
            false,
        );
        self.ledger.store.block().del(self.txn, &hash);
        self.ledger.store.frontier().del(self.txn, &hash);
        self.ledger
            .store
            .frontier()
            .put(self.txn, &block.previous(), &pending.source);
        self.ledger
            .store
            .block()
            .successor_clear(self.txn, &block.previous());
        self.delete_sampled_block_info(info.block_count, &hash);
        self.ledger.stats.inc(StatType::Rollback, DetailType::Send);
        Ok(())
    }

    fn roll_back_receive(&mut self, block: &ReceiveBlock) -> anyhow::Result<()> {
        let hash = block.hash();
        let representative = self.ledger.representative(self.txn.txn(), &block.previous());
        let amount = self
            .ledger
            .amount(self.txn.txn(), &block.source())
            .ok_or_else(|| anyhow!("source block missing during receive rollback"))?;
        let destination_account = self
            .ledger
            .account(self.txn.txn(), &hash)
            .ok_or_else(|| anyhow!("no account found for receive block"))?;
        // can be zero if the source chain was removed, without affecting
        // correct ledger processing
        let source_account = self
            .ledger
            .account(self.txn.txn(), &block.source())
            .unwrap_or_default();
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), &destination_account)
            .ok_or_else(|| anyhow!("receiver account record missing"))?;
        let current_representative = self.ledger.representative(self.txn.txn(), &hash);
        let previous_balance = self.ledger.balance(self.txn.txn(), &block.previous());

        self.ledger.store.representation().add(
            self.txn,
            &current_representative.into(),
            Amount::zero().wrapping_sub(amount),
        );
        self.ledger.change_latest(
            self.txn,
            &destination_account,
            &block.previous(),
            &representative,
            previous_balance,
            info.block_count - 1,
            false,
        );
        self.ledger.store.block().del(self.txn, &hash);
        self.ledger.store.pending().put(
            self.txn,
            &PendingKey::new(destination_account, block.source()),
            &PendingInfo::new(source_account, amount),
        );
        self.ledger.store.frontier().del(self.txn, &hash);
        self.ledger
            .store
            .frontier()
            .put(self.txn, &block.previous(), &destination_account);
        self.ledger
            .store
            .block()
            .successor_clear(self.txn, &block.previous());
        self.delete_sampled_block_info(info.block_count, &hash);
        self.ledger
            .stats
            .inc(StatType::Rollback, DetailType::Receive);
        Ok(())
    }

    fn roll_back_open(&mut self, block: &OpenBlock) -> anyhow::Result<()> {
        let hash = block.hash();
        let amount = self
            .ledger
            .amount(self.txn.txn(), &block.source())
            .ok_or_else(|| anyhow!("source block missing during open rollback"))?;
        let destination_account = self
            .ledger
            .account(self.txn.txn(), &hash)
            .ok_or_else(|| anyhow!("no account found for open block"))?;
        let source_account = self
            .ledger
            .account(self.txn.txn(), &block.source())
            .unwrap_or_default();
        let representative = self.ledger.representative(self.txn.txn(), &hash);

        self.ledger.store.representation().add(
            self.txn,
            &representative.into(),
            Amount::zero().wrapping_sub(amount),
        );
        self.ledger.change_latest(
            self.txn,
            &destination_account,
            &BlockHash::new(),
            &BlockHash::new(),
            Amount::zero(),
            0,
            false,
        );
        self.ledger.store.block().del(self.txn, &hash);
        self.ledger.store.pending().put(
            self.txn,
            &PendingKey::new(destination_account, block.source()),
            &PendingInfo::new(source_account, amount),
        );
        self.ledger.store.frontier().del(self.txn, &hash);
        self.ledger.stats.inc(StatType::Rollback, DetailType::Open);
        Ok(())
    }

    fn roll_back_change(&mut self, block: &ChangeBlock) -> anyhow::Result<()> {
        let hash = block.hash();
        let representative = self.ledger.representative(self.txn.txn(), &block.previous());
        let account = self
            .ledger
            .account(self.txn.txn(), &block.previous())
            .ok_or_else(|| anyhow!("no account found for change block"))?;
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), &account)
            .ok_or_else(|| anyhow!("account record missing during change rollback"))?;
        let balance = self.ledger.balance(self.txn.txn(), &block.previous());

        self.ledger
            .store
            .representation()
            .add(self.txn, &representative.into(), balance);
        self.ledger.store.representation().add(
            self.txn,
            &hash.into(),
            Amount::zero().wrapping_sub(balance),
        );
        self.ledger.store.block().del(self.txn, &hash);
        self.ledger.change_latest(
            self.txn,
            &account,
            &block.previous(),
            &representative,
            info.balance,
            info.block_count - 1,
            false,
        );
        self.ledger.store.frontier().del(self.txn, &hash);
        self.ledger
            .store
            .frontier()
            .put(self.txn, &block.previous(), &account);
        self.ledger
            .store
            .block()
            .successor_clear(self.txn, &block.previous());
        self.delete_sampled_block_info(info.block_count, &hash);
        self.ledger.stats.inc(StatType::Rollback, DetailType::Change);
        Ok(())
    }

    fn roll_back_state(&mut self, block: &StateBlock) -> anyhow::Result<()> {
        let hash = block.hash();
        let representative = if block.previous().is_zero() {
            BlockHash::new()
        } else {
            self.ledger.representative(self.txn.txn(), &block.previous())
        };
        let balance = self.ledger.balance(self.txn.txn(), &block.previous());
        let is_send = block.balance() < balance;

        // take back the amount delta
        self.ledger.store.representation().add(
            self.txn,
            &hash.into(),
            Amount::zero().wrapping_sub(block.balance()),
        );
        if !representative.is_zero() {
            // move the existing representation back
            self.ledger
                .store
                .representation()
                .add(self.txn, &representative.into(), balance);
        }

        if is_send {
            let key = PendingKey::new(block.link().into(), hash);
            while !self.ledger.store.pending().exists(self.txn.txn(), &key) {
                let latest = self.latest_block_for_account(&block.link().into())?;
                self.recurse_roll_back(&latest)?;
            }
            self.ledger.store.pending().del(self.txn, &key);
            self.ledger.stats.inc(StatType::Rollback, DetailType::Send);
        } else if !block.link().is_zero() {
            let source_account = self
                .ledger
                .account(self.txn.txn(), &block.link().into())
                .unwrap_or_default();
            self.ledger.store.pending().put(
                self.txn,
                &PendingKey::new(block.account(), block.link().into()),
                &PendingInfo::new(source_account, block.balance() - balance),
            );
            self.ledger
                .stats
                .inc(StatType::Rollback, DetailType::Receive);
        }

        let info = self
            .ledger
            .get_account_info(self.txn.txn(), &block.account())
            .ok_or_else(|| anyhow!("account record missing during state rollback"))?;
        self.ledger.change_latest(
            self.txn,
            &block.account(),
            &block.previous(),
            &representative,
            balance,
            info.block_count - 1,
            false,
        );

        match self.ledger.get_block(self.txn.txn(), &block.previous()) {
            Some(previous) => {
                self.ledger
                    .store
                    .block()
                    .successor_clear(self.txn, &block.previous());
                if previous.is_legacy() {
                    self.ledger
                        .store
                        .frontier()
                        .put(self.txn, &block.previous(), &block.account());
                }
            }
            None => self.ledger.stats.inc(StatType::Rollback, DetailType::Open),
        }
        self.ledger.store.block().del(self.txn, &hash);
        Ok(())
    }

    fn recurse_roll_back(&mut self, hash: &BlockHash) -> anyhow::Result<()> {
        let mut rolled_back = self.ledger.rollback(self.txn, hash)?;
        self.rolled_back.append(&mut rolled_back);
        Ok(())
    }

    fn latest_block_for_account(&self, account: &Account) -> anyhow::Result<BlockHash> {
        self.ledger
            .latest(self.txn.txn(), account)
            .ok_or_else(|| anyhow!("no latest block found for account"))
    }

    fn delete_sampled_block_info(&mut self, block_count: u64, hash: &BlockHash) {
        if block_count % self.ledger.store.block_info().block_info_max() == 0 {
            self.ledger.store.block_info().del(self.txn, hash);
        }
    }
}
