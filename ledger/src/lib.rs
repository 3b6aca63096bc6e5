#[macro_use]
extern crate anyhow;

mod ledger_constants;
pub use ledger_constants::{
    LedgerConstants, DEV_CONSTANTS, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH, DEV_GENESIS_KEY,
};

mod stats;
pub use stats::{DetailType, StatType, Stats};

mod vote;
pub use vote::Votes;

mod ledger;
pub use ledger::{Ledger, ProcessResult, ProcessReturn, TallyKey};

mod representative_block_finder;
pub(crate) use representative_block_finder::RepresentativeBlockFinder;

mod send_block_processor;
pub(crate) use send_block_processor::SendBlockProcessor;

mod receive_block_processor;
pub(crate) use receive_block_processor::ReceiveBlockProcessor;

mod open_block_processor;
pub(crate) use open_block_processor::OpenBlockProcessor;

mod change_block_processor;
pub(crate) use change_block_processor::ChangeBlockProcessor;

mod state_block_processor;
pub(crate) use state_block_processor::StateBlockProcessor;

mod rollback_performer;
pub(crate) use rollback_performer::BlockRollbackPerformer;
