use crate::{DetailType, Ledger, ProcessResult, ProcessReturn, StatType};
use rsopal_core::{validate_message, Account, Block, OpenBlock, PendingInfo, PendingKey};
use rsopal_store::WriteTransaction;

/// Processes a single open block
pub(crate) struct OpenBlockProcessor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    block: &'a Block,
    open: &'a OpenBlock,
}

impl<'a> OpenBlockProcessor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut dyn WriteTransaction,
        block: &'a Block,
        open: &'a OpenBlock,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            open,
        }
    }

    pub(crate) fn process(&mut self) -> Result<ProcessReturn, ProcessResult> {
        self.ensure_block_does_not_exist_yet()?;
        self.ensure_source_block_exists()?;
        self.ensure_valid_signature()?;
        self.ensure_account_not_opened_yet()?;
        let pending = self.ensure_source_not_received_yet()?;
        self.ensure_not_burn_account()?;
        Ok(self.apply(&pending))
    }

    fn apply(&mut self, pending: &PendingInfo) -> ProcessReturn {
        let hash = self.open.hash();
        let account = self.open.account();
        debug_assert!(self
            .ledger
            .store
            .account()
            .exists(self.txn.txn(), &pending.source));
        self.ledger
            .store
            .pending()
            .del(self.txn, &PendingKey::new(account, self.open.source()));
        self.ledger.store.block().put(self.txn, &hash, self.block);
        self.ledger
            .change_latest(self.txn, &account, &hash, &hash, pending.amount, 1, false);
        self.ledger
            .store
            .representation()
            .add(self.txn, &hash.into(), pending.amount);
        self.ledger.store.frontier().put(self.txn, &hash, &account);
        self.ledger.stats.inc(StatType::Ledger, DetailType::Open);

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
            .exists(self.txn.txn(), &self.open.hash())
        {
            Err(ProcessResult::Old)
        } else {
            Ok(())
        }
    }

    fn ensure_source_block_exists(&self) -> Result<(), ProcessResult> {
        if !self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.open.source())
        {
            Err(ProcessResult::GapSource)
        } else {
            Ok(())
        }
    }

    fn ensure_valid_signature(&self) -> Result<(), ProcessResult> {
        validate_message(
            &self.open.account().public_key(),
            self.open.hash().as_bytes(),
            self.open.signature(),
        )
        .map_err(|_| ProcessResult::BadSignature)
    }

    fn ensure_account_not_opened_yet(&self) -> Result<(), ProcessResult> {
        if self
            .ledger
            .store
            .account()
            .exists(self.txn.txn(), &self.open.account())
        {
            Err(ProcessResult::Fork)
        } else {
            Ok(())
        }
    }

    fn ensure_source_not_received_yet(&self) -> Result<PendingInfo, ProcessResult> {
        self.ledger
            .get_pending(
                self.txn.txn(),
                &PendingKey::new(self.open.account(), self.open.source()),
            )
            .ok_or(ProcessResult::Unreceivable)
    }

    fn ensure_not_burn_account(&self) -> Result<(), ProcessResult> {
        if self.open.account() == self.ledger.constants.burn_account {
            Err(ProcessResult::OpenedBurnAccount)
        } else {
            Ok(())
        }
    }
}
