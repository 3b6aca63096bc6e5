use super::{setup_open_block, setup_send_block, LedgerContext};
use crate::{DEV_CONSTANTS, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH};
use rsopal_core::PendingKey;

#[test]
fn restores_the_sender_account() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &send.send_block.hash())
        .unwrap();

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &DEV_GENESIS_ACCOUNT)
        .unwrap();
    assert_eq!(info.head, *DEV_GENESIS_HASH);
    assert_eq!(info.balance, DEV_CONSTANTS.genesis_amount);
    assert_eq!(info.block_count, 1);
    assert!(!ctx
        .ledger
        .store
        .block()
        .exists(txn.txn(), &send.send_block.hash()));
}

#[test]
fn deletes_the_pending_entry() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &send.send_block.hash())
        .unwrap();

    assert_eq!(
        ctx.ledger.get_pending(
            txn.txn(),
            &PendingKey::new(send.destination.account(), send.send_block.hash())
        ),
        None
    );
}

#[test]
fn restores_the_frontier_and_successor() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &send.send_block.hash())
        .unwrap();

    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &DEV_GENESIS_HASH),
        Some(*DEV_GENESIS_ACCOUNT)
    );
    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &send.send_block.hash()),
        None
    );
    assert_eq!(
        ctx.ledger.store.block().successor(txn.txn(), &DEV_GENESIS_HASH),
        None
    );
}

#[test]
fn restores_the_representation() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());

    ctx.ledger
        .rollback(txn.as_mut(), &send.send_block.hash())
        .unwrap();

    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &(*DEV_GENESIS_HASH).into()),
        DEV_CONSTANTS.genesis_amount
    );
}

#[test]
fn returns_the_rolled_back_blocks() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let send = setup_send_block(&ctx, txn.as_mut());

    let rolled_back = ctx
        .ledger
        .rollback(txn.as_mut(), &send.send_block.hash())
        .unwrap();

    assert_eq!(rolled_back, vec![send.send_block]);
}

// a send whose funds were already received drags the receiving chain with it
#[test]
fn rolls_back_the_destination_account_first() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());

    let rolled_back = ctx
        .ledger
        .rollback(txn.as_mut(), &open.send_block.hash())
        .unwrap();

    assert_eq!(rolled_back.len(), 2);
    assert_eq!(
        ctx.ledger.get_account_info(txn.txn(), &open.key.account()),
        None
    );
    assert!(!ctx
        .ledger
        .store
        .block()
        .exists(txn.txn(), &open.open_block.hash()));
    assert!(!ctx
        .ledger
        .store
        .block()
        .exists(txn.txn(), &open.send_block.hash()));
    assert_eq!(
        ctx.ledger.account_balance(txn.txn(), &DEV_GENESIS_ACCOUNT),
        DEV_CONSTANTS.genesis_amount
    );
}
