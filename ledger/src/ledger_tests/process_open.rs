use super::{setup_open_block, setup_send_block, AccountBlockFactory, LedgerContext};
use crate::{ProcessResult, DEV_GENESIS_ACCOUNT};
use rsopal_core::{Account, Amount, BlockHash, KeyPair, PendingKey};

#[test]
fn opens_the_account() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &open.key.account())
        .unwrap();
    assert_eq!(info.head, open.open_block.hash());
    assert_eq!(info.open_block, open.open_block.hash());
    assert_eq!(info.rep_block, open.open_block.hash());
    assert_eq!(info.balance, open.amount);
    assert_eq!(info.block_count, 1);
}

#[test]
fn consumes_the_pending_entry() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    assert_eq!(
        ctx.ledger.get_pending(
            txn.txn(),
            &PendingKey::new(open.key.account(), open.send_block.hash())
        ),
        None
    );
}

#[test]
fn installs_the_frontier_and_representation() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &open.open_block.hash()),
        Some(open.key.account())
    );
    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &open.open_block.hash().into()),
        open.amount
    );
}

#[test]
fn reports_the_processed_open() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, send.destination.clone());

    let open = receiver.open(send.send_block.hash(), receiver.account());
    let result = ctx.process(txn.as_mut(), &open);

    assert_eq!(result.account, receiver.account());
    assert_eq!(result.amount, send.amount_sent);
}

#[test]
fn fail_gap_source() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let receiver = ctx.block_factory();

    let open = receiver.open(BlockHash::from(1), receiver.account());
    let result = ctx.ledger.process(txn.as_mut(), &open);
    assert_eq!(result.code, ProcessResult::GapSource);
}

#[test]
fn fail_fork_on_second_open() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, open.key);

    // same account, different representative, so a different hash
    let fork = receiver.open(open.send_block.hash(), *DEV_GENESIS_ACCOUNT);
    let result = ctx.ledger.process(txn.as_mut(), &fork);
    assert_eq!(result.code, ProcessResult::Fork);
}

#[test]
fn fail_unreceivable() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    // a send to somebody else
    let send = setup_send_block(&ctx, txn.as_mut());
    let other = ctx.block_factory();

    let open = other.open(send.send_block.hash(), other.account());
    let result = ctx.ledger.process(txn.as_mut(), &open);
    assert_eq!(result.code, ProcessResult::Unreceivable);
}

#[test]
fn fail_old() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    let result = ctx.ledger.process(txn.as_mut(), &open.open_block);
    assert_eq!(result.code, ProcessResult::Old);
}

#[test]
fn account_pending_sums_unreceived_sends() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();
    let destination = KeyPair::new();

    let first = genesis.send(txn.txn(), destination.account(), Amount::raw(50));
    ctx.process(txn.as_mut(), &first);
    let second = genesis.send(txn.txn(), destination.account(), Amount::raw(25));
    ctx.process(txn.as_mut(), &second);

    assert_eq!(
        ctx.ledger.account_pending(txn.txn(), &destination.account()),
        Amount::raw(75)
    );
    assert_eq!(
        ctx.ledger.account_pending(txn.txn(), &Account::from(999)),
        Amount::zero()
    );
}
