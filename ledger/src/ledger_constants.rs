use once_cell::sync::Lazy;
use rsopal_core::{Account, Amount, Block, BlockHash, KeyPair, OpenBlockArgs};

static DEV_PRIVATE_KEY_DATA: &str =
    "34F0A37AAD20F4A260F0A5B3CB3D7FB50673212263E58A380BC10474BB039CE4";

pub static DEV_GENESIS_KEY: Lazy<KeyPair> =
    Lazy::new(|| KeyPair::from_priv_key_hex(DEV_PRIVATE_KEY_DATA).unwrap());

pub static DEV_CONSTANTS: Lazy<LedgerConstants> = Lazy::new(LedgerConstants::dev);

pub static DEV_GENESIS_ACCOUNT: Lazy<Account> = Lazy::new(|| DEV_CONSTANTS.genesis_account);
pub static DEV_GENESIS_HASH: Lazy<BlockHash> = Lazy::new(|| DEV_CONSTANTS.genesis.hash());

#[derive(Clone)]
pub struct LedgerConstants {
    pub genesis: Block,
    pub genesis_account: Account,
    pub genesis_amount: Amount,
    pub burn_account: Account,
    /// State blocks are accepted once the block with this hash is present
    pub state_block_parse_canary: BlockHash,
    /// State blocks are produced once the block with this hash is present
    pub state_block_generate_canary: BlockHash,
}

impl LedgerConstants {
    /// Development network: the genesis key is public and the state block
    /// canaries point at the genesis block, so state blocks are live from
    /// the start.
    pub fn dev() -> Self {
        let genesis = genesis_block(&DEV_GENESIS_KEY);
        let genesis_hash = genesis.hash();
        Self {
            genesis_account: DEV_GENESIS_KEY.account(),
            genesis_amount: Amount::MAX,
            burn_account: *Account::zero(),
            state_block_parse_canary: genesis_hash,
            state_block_generate_canary: genesis_hash,
            genesis,
        }
    }
}

/// The genesis block opens the genesis account with the entire supply. Its
/// source is the genesis public key itself; no send block precedes it.
fn genesis_block(key: &KeyPair) -> Block {
    OpenBlockArgs {
        key,
        source: BlockHash::from_bytes(key.account().to_bytes()),
        representative: key.account(),
        work: 0,
    }
    .into()
}
