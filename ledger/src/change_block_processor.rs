use crate::{DetailType, Ledger, ProcessResult, ProcessReturn, StatType};
use rsopal_core::{validate_message, Account, AccountInfo, Amount, Block, ChangeBlock};
use rsopal_store::WriteTransaction;

/// Processes a single change block
pub(crate) struct ChangeBlockProcessor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    block: &'a Block,
    change: &'a ChangeBlock,
}

impl<'a> ChangeBlockProcessor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut dyn WriteTransaction,
        block: &'a Block,
        change: &'a ChangeBlock,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            change,
        }
    }

    pub(crate) fn process(&mut self) -> Result<ProcessReturn, ProcessResult> {
        self.ensure_block_does_not_exist_yet()?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_valid_predecessor(&previous)?;
        let account = self.ensure_frontier()?;
        let info = self.account_info(&account);
        self.ensure_valid_signature(&account)?;
        Ok(self.apply(account, &info))
    }

    fn apply(&mut self, account: Account, info: &AccountInfo) -> ProcessReturn {
        let hash = self.change.hash();
        self.ledger.store.block().put(self.txn, &hash, self.block);
        let balance = self.ledger.balance(self.txn.txn(), &self.change.previous());
        // the change block itself becomes the new representative identity
        self.ledger
            .store
            .representation()
            .add(self.txn, &hash.into(), balance);
        self.ledger.store.representation().add(
            self.txn,
            &info.rep_block.into(),
            Amount::zero().wrapping_sub(balance),
        );
        self.ledger.change_latest(
            self.txn,
            &account,
            &hash,
            &hash,
            info.balance,
            info.block_count + 1,
            false,
        );
        self.ledger
            .store
            .frontier()
            .del(self.txn, &self.change.previous());
        self.ledger.store.frontier().put(self.txn, &hash, &account);
        self.ledger.stats.inc(StatType::Ledger, DetailType::Change);

        ProcessReturn {
            code: ProcessResult::Progress,
            account,
            amount: Amount::zero(),
            pending_account: *Account::zero(),
            state_is_send: false,
        }
    }

    fn ensure_block_does_not_exist_yet(&self) -> Result<(), ProcessResult> {
        if self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.change.hash())
        {
            Err(ProcessResult::Old)
        } else {
            Ok(())
        }
    }

    fn ensure_previous_block_exists(&self) -> Result<Block, ProcessResult> {
        self.ledger
            .get_block(self.txn.txn(), &self.change.previous())
            .ok_or(ProcessResult::GapPrevious)
    }

    fn ensure_valid_predecessor(&self, previous: &Block) -> Result<(), ProcessResult> {
        if !self.block.valid_predecessor(previous.block_type()) {
            Err(ProcessResult::BlockPosition)
        } else {
            Ok(())
        }
    }

    fn ensure_frontier(&self) -> Result<Account, ProcessResult> {
        self.ledger
            .get_frontier(self.txn.txn(), &self.change.previous())
            .ok_or(ProcessResult::Fork)
    }

    fn account_info(&self, account: &Account) -> AccountInfo {
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), account)
            .unwrap_or_default();
        debug_assert!(info.head == self.change.previous());
        info
    }

    fn ensure_valid_signature(&self, account: &Account) -> Result<(), ProcessResult> {
        validate_message(
            &account.public_key(),
            self.change.hash().as_bytes(),
            self.change.signature(),
        )
        .map_err(|_| ProcessResult::BadSignature)
    }
}
