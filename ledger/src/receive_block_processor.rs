use crate::{DetailType, Ledger, ProcessResult, ProcessReturn, StatType};
use rsopal_core::{
    validate_message, Account, AccountInfo, Block, PendingInfo, PendingKey, ReceiveBlock,
};
use rsopal_store::WriteTransaction;

/// Processes a single receive block
pub(crate) struct ReceiveBlockProcessor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    block: &'a Block,
    receive: &'a ReceiveBlock,
}

impl<'a> ReceiveBlockProcessor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut dyn WriteTransaction,
        block: &'a Block,
        receive: &'a ReceiveBlock,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            receive,
        }
    }

    pub(crate) fn process(&mut self) -> Result<ProcessReturn, ProcessResult> {
        self.ensure_block_does_not_exist_yet()?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_valid_predecessor(&previous)?;
        self.ensure_source_block_exists()?;
        let account = self.frontier_account()?;
        self.ensure_valid_signature(&account)?;
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), &account)
            .unwrap_or_default();
        self.ensure_previous_is_account_head(&info)?;
        let pending = self.ensure_source_not_received_yet(&account)?;
        Ok(self.apply(account, &info, &pending))
    }

    fn apply(&mut self, account: Account, info: &AccountInfo, pending: &PendingInfo) -> ProcessReturn {
        let hash = self.receive.hash();
        let new_balance = info.balance + pending.amount;
        debug_assert!(self
            .ledger
            .store
            .account()
            .exists(self.txn.txn(), &pending.source));
        self.ledger
            .store
            .pending()
            .del(self.txn, &PendingKey::new(account, self.receive.source()));
        self.ledger.store.block().put(self.txn, &hash, self.block);
        self.ledger.change_latest(
            self.txn,
            &account,
            &hash,
            &info.rep_block,
            new_balance,
            info.block_count + 1,
            false,
        );
        self.ledger
            .store
            .representation()
            .add(self.txn, &info.rep_block.into(), pending.amount);
        self.ledger
            .store
            .frontier()
            .del(self.txn, &self.receive.previous());
        self.ledger.store.frontier().put(self.txn, &hash, &account);
        self.ledger.stats.inc(StatType::Ledger, DetailType::Receive);

        ProcessReturn {
            code: ProcessResult::Progress,
            account,
            amount: pending.amount,
            pending_account: *Account::zero(),
            state_is_send: false,
        }
    }

    fn ensure_block_does_not_exist_yet(&self) -> Result<(), ProcessResult> {
        if self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.receive.hash())
        {
            Err(ProcessResult::Old)
        } else {
            Ok(())
        }
    }

    fn ensure_previous_block_exists(&self) -> Result<Block, ProcessResult> {
        self.ledger
            .get_block(self.txn.txn(), &self.receive.previous())
            .ok_or(ProcessResult::GapPrevious)
    }

    fn ensure_valid_predecessor(&self, previous: &Block) -> Result<(), ProcessResult> {
        if !self.block.valid_predecessor(previous.block_type()) {
            Err(ProcessResult::BlockPosition)
        } else {
            Ok(())
        }
    }

    fn ensure_source_block_exists(&self) -> Result<(), ProcessResult> {
        if !self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.receive.source())
        {
            Err(ProcessResult::GapSource)
        } else {
            Ok(())
        }
    }

    /// A missing frontier entry on a known previous block means another
    /// block already extends it: a signed fork
    fn frontier_account(&self) -> Result<Account, ProcessResult> {
        match self
            .ledger
            .get_frontier(self.txn.txn(), &self.receive.previous())
        {
            Some(account) => Ok(account),
            None => {
                if self
                    .ledger
                    .store
                    .block()
                    .exists(self.txn.txn(), &self.receive.previous())
                {
                    Err(ProcessResult::Fork)
                } else {
                    Err(ProcessResult::GapPrevious)
                }
            }
        }
    }

    fn ensure_valid_signature(&self, account: &Account) -> Result<(), ProcessResult> {
        validate_message(
            &account.public_key(),
            self.receive.hash().as_bytes(),
            self.receive.signature(),
        )
        .map_err(|_| ProcessResult::BadSignature)
    }

    fn ensure_previous_is_account_head(&self, info: &AccountInfo) -> Result<(), ProcessResult> {
        // block doesn't immediately follow the latest block (harmless)
        if info.head != self.receive.previous() {
            Err(ProcessResult::GapPrevious)
        } else {
            Ok(())
        }
    }

    fn ensure_source_not_received_yet(
        &self,
        account: &Account,
    ) -> Result<PendingInfo, ProcessResult> {
        self.ledger
            .get_pending(
                self.txn.txn(),
                &PendingKey::new(*account, self.receive.source()),
            )
            .ok_or(ProcessResult::Unreceivable)
    }
}
