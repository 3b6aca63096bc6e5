use crate::{DetailType, Ledger, ProcessResult, ProcessReturn, StatType};
use rsopal_core::{
    validate_message, Account, AccountInfo, Amount, Block, PendingInfo, PendingKey, SendBlock,
};
use rsopal_store::WriteTransaction;

/// Processes a single send block
pub(crate) struct SendBlockProcessor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    block: &'a Block,
    send: &'a SendBlock,
}

impl<'a> SendBlockProcessor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut dyn WriteTransaction,
        block: &'a Block,
        send: &'a SendBlock,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            send,
        }
    }

    pub(crate) fn process(&mut self) -> Result<ProcessReturn, ProcessResult> {
        self.ensure_block_does_not_exist_yet()?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_valid_predecessor(&previous)?;
        let account = self.ensure_frontier()?;
        self.ensure_valid_signature(&account)?;
        let info = self.account_info(&account);
        self.ensure_no_negative_spend(&info)?;
        Ok(self.apply(account, &info))
    }

    fn apply(&mut self, account: Account, info: &AccountInfo) -> ProcessReturn {
        let hash = self.send.hash();
        let amount = info.balance - self.send.balance();
        self.ledger.store.representation().add(
            self.txn,
            &info.rep_block.into(),
            Amount::zero().wrapping_sub(amount),
        );
        self.ledger.store.block().put(self.txn, &hash, self.block);
        self.ledger.change_latest(
            self.txn,
            &account,
            &hash,
            &info.rep_block,
            self.send.balance(),
            info.block_count + 1,
            false,
        );
        self.ledger.store.pending().put(
            self.txn,
            &PendingKey::new(self.send.destination(), hash),
            &PendingInfo::new(account, amount),
        );
        self.ledger
            .store
            .frontier()
            .del(self.txn, &self.send.previous());
        self.ledger.store.frontier().put(self.txn, &hash, &account);
        self.ledger.stats.inc(StatType::Ledger, DetailType::Send);

        ProcessReturn {
            code: ProcessResult::Progress,
            account,
            amount,
            pending_account: self.send.destination(),
            state_is_send: false,
        }
    }

    fn ensure_block_does_not_exist_yet(&self) -> Result<(), ProcessResult> {
        if self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.send.hash())
        {
            Err(ProcessResult::Old)
        } else {
            Ok(())
        }
    }

    fn ensure_previous_block_exists(&self) -> Result<Block, ProcessResult> {
        self.ledger
            .get_block(self.txn.txn(), &self.send.previous())
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
            .get_frontier(self.txn.txn(), &self.send.previous())
            .ok_or(ProcessResult::Fork)
    }

    fn ensure_valid_signature(&self, account: &Account) -> Result<(), ProcessResult> {
        validate_message(
            &account.public_key(),
            self.send.hash().as_bytes(),
            self.send.signature(),
        )
        .map_err(|_| ProcessResult::BadSignature)
    }

    fn account_info(&self, account: &Account) -> AccountInfo {
        let info = self
            .ledger
            .get_account_info(self.txn.txn(), account)
            .unwrap_or_default();
        debug_assert!(info.head == self.send.previous());
        info
    }

    fn ensure_no_negative_spend(&self, info: &AccountInfo) -> Result<(), ProcessResult> {
        if info.balance < self.send.balance() {
            Err(ProcessResult::NegativeSpend)
        } else {
            Ok(())
        }
    }
}
