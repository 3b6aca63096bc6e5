use super::{setup_open_block, LedgerContext};
use crate::DEV_GENESIS_ACCOUNT;
use rsopal_core::{Amount, PendingKey};

#[test]
fn deletes_the_account_record() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &open.open_block.hash())
        .unwrap();

    assert_eq!(
        ctx.ledger.get_account_info(txn.txn(), &open.key.account()),
        None
    );
    assert!(!ctx
        .ledger
        .store
        .block()
        .exists(txn.txn(), &open.open_block.hash()));
    assert_eq!(ctx.ledger.store.account().count(txn.txn()), 1);
}

#[test]
fn recreates_the_pending_entry() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &open.open_block.hash())
        .unwrap();

    let pending = ctx
        .ledger
        .get_pending(
            txn.txn(),
            &PendingKey::new(open.key.account(), open.send_block.hash()),
        )
        .unwrap();
    assert_eq!(pending.source, *DEV_GENESIS_ACCOUNT);
    assert_eq!(pending.amount, open.amount);
}

#[test]
fn clears_the_frontier_and_representation() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &open.open_block.hash())
        .unwrap();

    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &open.open_block.hash()),
        None
    );
    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &open.open_block.hash().into()),
        Amount::zero()
    );
}
