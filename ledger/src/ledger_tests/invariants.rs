use super::{AccountBlockFactory, LedgerContext};
use crate::{Ledger, DEV_CONSTANTS, DEV_GENESIS_ACCOUNT};
use rsopal_core::{
    Account, Amount, BlockHash, Checksum, HashOrAccount, KeyPair, PendingInfo, PendingKey,
};
use rsopal_store::Transaction;

/// Everything the ledger derives from the block set, except the `modified`
/// timestamps
#[derive(PartialEq, Eq, Debug)]
struct LedgerSnapshot {
    accounts: Vec<(Account, BlockHash, BlockHash, BlockHash, Amount, u64)>,
    pending: Vec<(PendingKey, PendingInfo)>,
    representation: Vec<(HashOrAccount, Amount)>,
    frontiers: Vec<(BlockHash, Account)>,
    checksum: Checksum,
}

fn snapshot(ledger: &Ledger, txn: &dyn Transaction) -> LedgerSnapshot {
    LedgerSnapshot {
        accounts: ledger
            .store
            .account()
            .iter(txn)
            .map(|(account, info)| {
                (
                    account,
                    info.head,
                    info.rep_block,
                    info.open_block,
                    info.balance,
                    info.block_count,
                )
            })
            .collect(),
        pending: ledger.store.pending().iter(txn).collect(),
        representation: ledger
            .store
            .representation()
            .iter(txn)
            .filter(|(_, weight)| !weight.is_zero())
            .collect(),
        frontiers: ledger.store.frontier().iter(txn).collect(),
        checksum: ledger.store.checksum().get(txn),
    }
}

#[test]
fn apply_rollback_identity_for_a_send() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let before = snapshot(&ctx.ledger, txn.txn());
    let send = genesis.send(txn.txn(), Account::from(7), Amount::raw(50));
    ctx.process(txn.as_mut(), &send);
    ctx.ledger.rollback(txn.as_mut(), &send.hash()).unwrap();

    assert_eq!(snapshot(&ctx.ledger, txn.txn()), before);
}

#[test]
fn apply_rollback_identity_for_a_change() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let before = snapshot(&ctx.ledger, txn.txn());
    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);
    ctx.ledger.rollback(txn.as_mut(), &change.hash()).unwrap();

    assert_eq!(snapshot(&ctx.ledger, txn.txn()), before);
}

#[test]
fn apply_rollback_identity_for_a_state_send() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let before = snapshot(&ctx.ledger, txn.txn());
    let send = genesis.state_send(txn.txn(), Account::from(7), Amount::raw(50));
    ctx.process(txn.as_mut(), &send);
    ctx.ledger.rollback(txn.as_mut(), &send.hash()).unwrap();

    assert_eq!(snapshot(&ctx.ledger, txn.txn()), before);
}

#[test]
fn apply_rollback_identity_across_accounts() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();
    let receiver = ctx.block_factory();

    let before = snapshot(&ctx.ledger, txn.txn());
    let send = genesis.send(txn.txn(), receiver.account(), Amount::raw(50));
    ctx.process(txn.as_mut(), &send);
    let open = receiver.open(send.hash(), receiver.account());
    ctx.process(txn.as_mut(), &open);

    // rolling back the send unwinds the receiving account as well
    ctx.ledger.rollback(txn.as_mut(), &send.hash()).unwrap();

    assert_eq!(snapshot(&ctx.ledger, txn.txn()), before);
}

#[test]
fn representation_equals_account_balances() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();
    let receiver = ctx.block_factory();

    let send = genesis.send(txn.txn(), receiver.account(), Amount::raw(50));
    ctx.process(txn.as_mut(), &send);
    let open = receiver.open(send.hash(), receiver.account());
    ctx.process(txn.as_mut(), &open);
    let change = genesis.change(txn.txn(), receiver.account());
    ctx.process(txn.as_mut(), &change);

    let rep_total = ctx
        .ledger
        .store
        .representation()
        .iter(txn.txn())
        .fold(Amount::zero(), |sum, (_, weight)| sum + weight);
    let balance_total = ctx
        .ledger
        .store
        .account()
        .iter(txn.txn())
        .fold(Amount::zero(), |sum, (_, info)| sum + info.balance);
    assert_eq!(rep_total, balance_total);
}

#[test]
fn pending_plus_balances_equals_the_supply() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();
    let receiver = ctx.block_factory();

    // one received send, one still pending
    let first = genesis.send(txn.txn(), receiver.account(), Amount::raw(50));
    ctx.process(txn.as_mut(), &first);
    let open = receiver.open(first.hash(), receiver.account());
    ctx.process(txn.as_mut(), &open);
    let second = genesis.send(txn.txn(), receiver.account(), Amount::raw(30));
    ctx.process(txn.as_mut(), &second);

    let pending_total = ctx
        .ledger
        .store
        .pending()
        .iter(txn.txn())
        .fold(Amount::zero(), |sum, (_, info)| sum + info.amount);
    let balance_total = ctx
        .ledger
        .store
        .account()
        .iter(txn.txn())
        .fold(Amount::zero(), |sum, (_, info)| sum + info.balance);
    assert_eq!(
        pending_total + balance_total,
        DEV_CONSTANTS.genesis_amount
    );
}

#[test]
fn chains_stay_continuous() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    for destination in 1..4u64 {
        let send = genesis.send(txn.txn(), Account::from(destination), Amount::raw(1));
        ctx.process(txn.as_mut(), &send);
    }

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &DEV_GENESIS_ACCOUNT)
        .unwrap();
    let mut hash = info.head;
    let mut count = 0;
    while !hash.is_zero() {
        let block = ctx.ledger.get_block(txn.txn(), &hash).unwrap();
        count += 1;
        hash = block.previous();
    }
    assert_eq!(count, info.block_count);
    assert_eq!(
        {
            let mut tail = info.head;
            loop {
                let block = ctx.ledger.get_block(txn.txn(), &tail).unwrap();
                if block.previous().is_zero() {
                    break tail;
                }
                tail = block.previous();
            }
        },
        info.open_block
    );
}

#[test]
fn checksum_is_the_xor_of_all_heads() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();
    let receiver = ctx.block_factory();

    let send = genesis.send(txn.txn(), receiver.account(), Amount::raw(50));
    ctx.process(txn.as_mut(), &send);
    let open = receiver.open(send.hash(), receiver.account());
    ctx.process(txn.as_mut(), &open);

    let mut expected = Checksum::new();
    for (_, info) in ctx.ledger.store.account().iter(txn.txn()) {
        expected.xor(&info.head);
    }
    assert_eq!(
        ctx.ledger
            .checksum(txn.txn(), Account::zero(), Account::zero()),
        expected
    );
}

/// Replaying the same block set in a different dependency-compatible order
/// produces an identical ledger
#[test]
fn deterministic_replay() {
    let build = || LedgerContext::empty();
    let first_ctx = build();
    let second_ctx = build();

    let key_x = KeyPair::new();
    let key_y = KeyPair::new();

    let blocks = {
        let ctx = build();
        let mut txn = ctx.ledger.rw_txn();
        let genesis = ctx.genesis_block_factory();
        let send_x = genesis.send(txn.txn(), key_x.account(), Amount::raw(10));
        ctx.process(txn.as_mut(), &send_x);
        let send_y = genesis.send(txn.txn(), key_y.account(), Amount::raw(20));
        ctx.process(txn.as_mut(), &send_y);
        let open_x =
            AccountBlockFactory::with_key(&ctx.ledger, key_x.clone()).open(send_x.hash(), key_x.account());
        ctx.process(txn.as_mut(), &open_x);
        let open_y =
            AccountBlockFactory::with_key(&ctx.ledger, key_y.clone()).open(send_y.hash(), key_y.account());
        ctx.process(txn.as_mut(), &open_y);
        [send_x, send_y, open_x, open_y]
    };
    let [send_x, send_y, open_x, open_y] = blocks;

    {
        let mut txn = first_ctx.ledger.rw_txn();
        for block in [&send_x, &send_y, &open_x, &open_y] {
            first_ctx.process(txn.as_mut(), block);
        }
        txn.commit();
    }
    {
        let mut txn = second_ctx.ledger.rw_txn();
        for block in [&send_x, &send_y, &open_y, &open_x] {
            second_ctx.process(txn.as_mut(), block);
        }
        txn.commit();
    }

    let first_txn = first_ctx.ledger.read_txn();
    let second_txn = second_ctx.ledger.read_txn();
    assert_eq!(
        snapshot(&first_ctx.ledger, first_txn.txn()),
        snapshot(&second_ctx.ledger, second_txn.txn())
    );
}
