use crate::{DetailType, Ledger, ProcessResult, ProcessReturn, StatType};
use rsopal_core::{
    validate_message, Account, AccountInfo, Amount, Block, PendingInfo, PendingKey, StateBlock,
};
use rsopal_store::WriteTransaction;

/// Processes a single state block. The direction of the operation is keyed
/// off the balance delta: a lower balance is a send, a higher one a receive
/// and an unchanged balance with a zero link a representative change.
pub(crate) struct StateBlockProcessor<'a> {
    ledger: &'a Ledger,
    txn: &'a mut dyn WriteTransaction,
    block: &'a Block,
    state: &'a StateBlock,
    old_account_info: Option<AccountInfo>,
}

impl<'a> StateBlockProcessor<'a> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut dyn WriteTransaction,
        block: &'a Block,
        state: &'a StateBlock,
    ) -> Self {
        Self {
            ledger,
            txn,
            block,
            state,
            old_account_info: None,
        }
    }

    pub(crate) fn process(&mut self) -> Result<ProcessReturn, ProcessResult> {
        self.ensure_state_block_parsing_enabled()?;
        self.ensure_block_does_not_exist_yet()?;
        self.ensure_valid_signature()?;
        self.ensure_block_is_not_for_burn_account()?;

        self.old_account_info = self
            .ledger
            .get_account_info(self.txn.txn(), &self.state.account());

        self.ensure_no_double_account_open()?;
        self.ensure_previous_block_exists()?;
        self.ensure_previous_block_is_account_head()?;
        self.ensure_new_account_has_link()?;
        self.ensure_source_block_exists_for_receive()?;
        self.ensure_receive_matches_pending_amount()?;
        self.ensure_no_balance_change_without_link()?;

        Ok(self.apply())
    }

    fn account_exists(&self) -> bool {
        self.old_account_info.is_some()
    }

    fn is_send(&self) -> bool {
        match &self.old_account_info {
            Some(info) => self.state.balance() < info.balance,
            None => false,
        }
    }

    fn is_receive(&self) -> bool {
        !self.is_send() && !self.state.link().is_zero()
    }

    fn amount(&self) -> Amount {
        match &self.old_account_info {
            Some(info) => {
                if self.is_send() {
                    info.balance - self.state.balance()
                } else {
                    self.state.balance() - info.balance
                }
            }
            None => self.state.balance(),
        }
    }

    fn apply(&mut self) -> ProcessReturn {
        let hash = self.state.hash();
        let account = self.state.account();
        let is_send = self.is_send();
        let amount = self.amount();
        let info = self.old_account_info.clone().unwrap_or_default();

        if !self.account_exists() {
            self.ledger.stats.inc(StatType::Ledger, DetailType::Open);
        }
        self.ledger
            .stats
            .inc(StatType::Ledger, DetailType::StateBlock);

        self.ledger.store.block().put(self.txn, &hash, self.block);

        if !info.rep_block.is_zero() {
            // move existing representation
            self.ledger.store.representation().add(
                self.txn,
                &info.rep_block.into(),
                Amount::zero().wrapping_sub(info.balance),
            );
        }
        // add in amount delta
        self.ledger
            .store
            .representation()
            .add(self.txn, &hash.into(), self.state.balance());

        if is_send {
            self.ledger.store.pending().put(
                self.txn,
                &PendingKey::new(self.state.link().into(), hash),
                &PendingInfo::new(account, amount),
            );
            self.ledger.stats.inc(StatType::Ledger, DetailType::Send);
        } else if !self.state.link().is_zero() {
            self.ledger.store.pending().del(
                self.txn,
                &PendingKey::new(account, self.state.link().into()),
            );
            self.ledger.stats.inc(StatType::Ledger, DetailType::Receive);
        }

        self.ledger.change_latest(
            self.txn,
            &account,
            &hash,
            &hash,
            self.state.balance(),
            info.block_count + 1,
            true,
        );

        // state chains keep no frontier entries, which also keeps legacy
        // blocks from being appended after a state block
        if self
            .ledger
            .get_frontier(self.txn.txn(), &info.head)
            .is_some()
        {
            self.ledger.store.frontier().del(self.txn, &info.head);
        }

        ProcessReturn {
            code: ProcessResult::Progress,
            account,
            amount,
            pending_account: *Account::zero(),
            state_is_send: is_send,
        }
    }

    fn ensure_state_block_parsing_enabled(&self) -> Result<(), ProcessResult> {
        if !self.ledger.state_block_parsing_enabled(self.txn.txn()) {
            Err(ProcessResult::StateBlockDisabled)
        } else {
            Ok(())
        }
    }

    fn ensure_block_does_not_exist_yet(&self) -> Result<(), ProcessResult> {
        if self
            .ledger
            .store
            .block()
            .exists(self.txn.txn(), &self.state.hash())
        {
            Err(ProcessResult::Old)
        } else {
            Ok(())
        }
    }

    fn ensure_valid_signature(&self) -> Result<(), ProcessResult> {
        validate_message(
            &self.state.account().public_key(),
            self.state.hash().as_bytes(),
            self.state.signature(),
        )
        .map_err(|_| ProcessResult::BadSignature)
    }

    fn ensure_block_is_not_for_burn_account(&self) -> Result<(), ProcessResult> {
        if self.state.account() == self.ledger.constants.burn_account {
            Err(ProcessResult::OpenedBurnAccount)
        } else {
            Ok(())
        }
    }

    fn ensure_no_double_account_open(&self) -> Result<(), ProcessResult> {
        if self.account_exists() && self.state.previous().is_zero() {
            Err(ProcessResult::Fork)
        } else {
            Ok(())
        }
    }

    fn ensure_previous_block_exists(&self) -> Result<(), ProcessResult> {
        if self.account_exists()
            && !self
                .ledger
                .store
                .block()
                .exists(self.txn.txn(), &self.state.previous())
        {
            return Err(ProcessResult::GapPrevious);
        }
        if !self.account_exists() && !self.state.previous().is_zero() {
            return Err(ProcessResult::GapPrevious);
        }
        Ok(())
    }

    fn ensure_previous_block_is_account_head(&self) -> Result<(), ProcessResult> {
        if let Some(info) = &self.old_account_info {
            if self.state.previous() != info.head {
                return Err(ProcessResult::Fork);
            }
        }
        Ok(())
    }

    /// A new account must open by receiving funds
    fn ensure_new_account_has_link(&self) -> Result<(), ProcessResult> {
        if !self.account_exists() && self.state.link().is_zero() {
            Err(ProcessResult::GapSource)
        } else {
            Ok(())
        }
    }

    fn ensure_source_block_exists_for_receive(&self) -> Result<(), ProcessResult> {
        if self.is_receive()
            && !self
                .ledger
                .store
                .block()
                .exists(self.txn.txn(), &self.state.link().into())
        {
            Err(ProcessResult::GapSource)
        } else {
            Ok(())
        }
    }

    fn ensure_receive_matches_pending_amount(&self) -> Result<(), ProcessResult> {
        if self.is_receive() {
            let key = PendingKey::new(self.state.account(), self.state.link().into());
            match self.ledger.get_pending(self.txn.txn(), &key) {
                Some(pending) => {
                    if self.amount() != pending.amount {
                        return Err(ProcessResult::BalanceMismatch);
                    }
                }
                None => return Err(ProcessResult::Unreceivable),
            }
        }
        Ok(())
    }

    /// With no link, only the representative may change
    fn ensure_no_balance_change_without_link(&self) -> Result<(), ProcessResult> {
        if !self.is_send() && self.state.link().is_zero() && !self.amount().is_zero() {
            Err(ProcessResult::BalanceMismatch)
        } else {
            Ok(())
        }
    }
}
