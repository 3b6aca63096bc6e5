use super::LedgerContext;
use crate::{ProcessResult, DEV_CONSTANTS, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH, DEV_GENESIS_KEY};
use rsopal_core::{Account, Amount, BlockHash, ChangeBlockArgs, KeyPair};

#[test]
fn updates_the_account_rep_block() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &DEV_GENESIS_ACCOUNT)
        .unwrap();
    assert_eq!(info.rep_block, change.hash());
    assert_eq!(info.balance, DEV_CONSTANTS.genesis_amount);
    assert_eq!(info.block_count, 2);
}

#[test]
fn moves_the_full_weight_to_the_change_block() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);

    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &change.hash().into()),
        DEV_CONSTANTS.genesis_amount
    );
    assert_eq!(
        ctx.ledger
            .store
            .representation()
            .get(txn.txn(), &(*DEV_GENESIS_HASH).into()),
        Amount::zero()
    );
}

#[test]
fn migrates_the_frontier() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);

    assert_eq!(ctx.ledger.get_frontier(txn.txn(), &DEV_GENESIS_HASH), None);
    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &change.hash()),
        Some(*DEV_GENESIS_ACCOUNT)
    );
}

#[test]
fn fail_gap_previous() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();

    let change = ChangeBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: BlockHash::from(1),
        representative: Account::from(1000),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &change);
    assert_eq!(result.code, ProcessResult::GapPrevious);
}

#[test]
fn fail_fork() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);

    let fork = ChangeBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: *DEV_GENESIS_HASH,
        representative: Account::from(2000),
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

    let wrong_keys = KeyPair::new();
    let change = ChangeBlockArgs {
        key: &wrong_keys,
        previous: *DEV_GENESIS_HASH,
        representative: Account::from(1000),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &change);
    assert_eq!(result.code, ProcessResult::BadSignature);
}

#[test]
fn fail_old() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let change = genesis.change(txn.txn(), Account::from(1000));
    ctx.process(txn.as_mut(), &change);

    let result = ctx.ledger.process(txn.as_mut(), &change);
    assert_eq!(result.code, ProcessResult::Old);
}

#[test]
fn fail_block_position_after_state_block() {
    let ctx = LedgerContext::empty();
    let mut txn = ctx.ledger.rw_txn();
    let genesis = ctx.genesis_block_factory();

    let state_change = genesis.state_change(txn.txn(), *DEV_GENESIS_ACCOUNT);
    ctx.process(txn.as_mut(), &state_change);

    let change = ChangeBlockArgs {
        key: &DEV_GENESIS_KEY,
        previous: state_change.hash(),
        representative: Account::from(1000),
        work: 0,
    }
    .into();
    let result = ctx.ledger.process(txn.as_mut(), &change);
    assert_eq!(result.code, ProcessResult::BlockPosition);
}
