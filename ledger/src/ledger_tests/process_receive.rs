use super::{setup_open_block, setup_receive_block, AccountBlockFactory, LedgerContext};
use crate::ProcessResult;
use rsopal_core::{Amount, Block, BlockHash, PendingKey, ReceiveBlockArgs};

#[test]
fn updates_the_receiver_account() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &receive.key.account())
        .unwrap();
    assert_eq!(info.head, receive.receive_block.hash());
    assert_eq!(info.block_count, 2);
    assert_eq!(info.balance, Amount::raw(80));
    assert_eq!(info.open_block, receive.open_block.hash());
}

#[test]
fn consumes_the_pending_entry() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());

    assert_eq!(
        ctx.ledger.get_pending(
            txn.txn(),
            &PendingKey::new(receive.key.account(), receive.send_block.hash())
        ),
        None
    );
}

#[test]
fn raises_the_representation_of_the_receiver_rep() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());

    // the receiver delegates to its open block identity
    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &receive.open_block.hash().into()),
        Amount::raw(80)
    );
}

#[test]
fn migrates_the_frontier() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());

    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &receive.open_block.hash()),
        None
    );
    assert_eq!(
        ctx.ledger
            .get_frontier(txn.txn(), &receive.receive_block.hash()),
        Some(receive.key.account())
    );
}

#[test]
fn fail_gap_source() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, open.key);

    let receive: Block = ReceiveBlockArgs {
        key: &receiver.key,
        previous: open.open_block.hash(),
        source: BlockHash::from(12345),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &receive);
    assert_eq!(result.code, ProcessResult::GapSource);
}

#[test]
fn fail_unreceivable() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, open.key);

    // the send was already claimed by the open block
    let receive = receiver.receive(txn.txn(), open.send_block.hash());
    let result = ctx.ledger.process(txn.as_mut(), &receive);
    assert_eq!(result.code, ProcessResult::Unreceivable);
}

#[test]
fn fail_gap_previous() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, open.key);

    let receive: Block = ReceiveBlockArgs {
        key: &receiver.key,
        previous: BlockHash::from(1),
        source: open.send_block.hash(),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &receive);
    assert_eq!(result.code, ProcessResult::GapPrevious);
}

#[test]
fn fail_fork_on_non_head_previous() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());
    let genesis = ctx.genesis_block_factory();
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, receive.key);

    // another send the account could receive
    let send = genesis.send(txn.txn(), receiver.account(), Amount::raw(10));
    ctx.process(txn.as_mut(), &send);

    // built on the open block, which is no longer the account's head
    let fork: Block = ReceiveBlockArgs {
        key: &receiver.key,
        previous: receive.open_block.hash(),
        source: send.hash(),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &fork);
    assert_eq!(result.code, ProcessResult::Fork);
}

#[test]
fn fail_bad_signature() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let open = setup_open_block(&ctx, txn.as_mut());
    let genesis = ctx.genesis_block_factory();
    let receiver = AccountBlockFactory::with_key(&ctx.ledger, open.key);

    let send = genesis.send(txn.txn(), receiver.account(), Amount::raw(10));
    ctx.process(txn.as_mut(), &send);

    // signed by a key that does not own the previous block
    let forged: Block = ReceiveBlockArgs {
        key: &genesis.key,
        previous: open.open_block.hash(),
        source: send.hash(),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &forged);
    assert_eq!(result.code, ProcessResult::BadSignature);
}

#[test]
fn fail_old() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let receive = setup_receive_block(&ctx, txn.as_mut());

    let result = ctx.ledger.process(txn.as_mut(), &receive.receive_block);
    assert_eq!(result.code, ProcessResult::Old);
}
