use super::LedgerContext;
use crate::{DEV_CONSTANTS, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH};
use rsopal_core::{Account, Checksum};

#[test]
fn genesis_account_is_installed() {
    let ctx = LedgerContext::empty();
    let txn = ctx.ledger.read_txn();

    let info = ctx
        .ledger
        .get_account_info(txn.txn(), &DEV_GENESIS_ACCOUNT)
        .unwrap();
    assert_eq!(info.head, *DEV_GENESIS_HASH);
    assert_eq!(info.open_block, *DEV_GENESIS_HASH);
    assert_eq!(info.rep_block, *DEV_GENESIS_HASH);
    assert_eq!(info.balance, DEV_CONSTANTS.genesis_amount);
    assert_eq!(info.block_count, 1);
    assert_eq!(ctx.ledger.store.account().count(txn.txn()), 1);
}

#[test]
fn genesis_block_is_stored() {
    let ctx = LedgerContext::empty();
    let txn = ctx.ledger.read_txn();

    let genesis = ctx.ledger.get_block(txn.txn(), &DEV_GENESIS_HASH).unwrap();
    assert_eq!(genesis, DEV_CONSTANTS.genesis);
    assert_eq!(
        ctx.ledger.get_frontier(txn.txn(), &DEV_GENESIS_HASH),
        Some(*DEV_GENESIS_ACCOUNT)
    );
}

#[test]
fn genesis_holds_entire_supply() {
    let ctx = LedgerContext::empty();
    let txn = ctx.ledger.read_txn();

    assert_eq!(
        ctx.ledger.account_balance(txn.txn(), &DEV_GENESIS_ACCOUNT),
        DEV_CONSTANTS.genesis_amount
    );
    assert_eq!(
        ctx.ledger
            .balance(txn.txn(), &DEV_GENESIS_HASH),
        DEV_CONSTANTS.genesis_amount
    );
    // voting weight sits under the genesis open block identity
    assert_eq!(
        ctx.ledger.store.representation().get(
            txn.txn(),
            &(*DEV_GENESIS_HASH).into()
        ),
        DEV_CONSTANTS.genesis_amount
    );
}

#[test]
fn checksum_covers_the_genesis_head() {
    let ctx = LedgerContext::empty();
    let txn = ctx.ledger.read_txn();

    let mut expected = Checksum::new();
    expected.xor(&DEV_GENESIS_HASH);
    assert_eq!(
        ctx.ledger
            .checksum(txn.txn(), Account::zero(), Account::zero()),
        expected
    );
}

#[test]
fn state_blocks_are_enabled_on_the_dev_network() {
    let ctx = LedgerContext::empty();
    let txn = ctx.ledger.read_txn();
    assert!(ctx.ledger.state_block_parsing_enabled(txn.txn()));
    assert!(ctx.ledger.state_block_generation_enabled(txn.txn()));
}
