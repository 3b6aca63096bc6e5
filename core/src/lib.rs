#[macro_use]
extern crate anyhow;

mod account;
pub use account::{Account, PublicKey};

mod block_hash;
pub use block_hash::{BlockHash, BlockHashBuilder};

mod amount;
pub use amount::Amount;

mod hash_or_account;
pub use hash_or_account::{HashOrAccount, Link, Root};

mod signature;
pub use signature::Signature;

mod key_pair;
pub use key_pair::{sign_message, validate_message, KeyPair, RawKey};

mod account_info;
pub use account_info::AccountInfo;

mod pending_key;
pub use pending_key::PendingKey;

mod pending_info;
pub use pending_info::PendingInfo;

mod block_info;
pub use block_info::BlockInfo;

mod checksum;
pub use checksum::Checksum;

mod blocks;
pub use blocks::{
    deserialize_block_json, valid_change_block_predecessor, valid_receive_block_predecessor,
    valid_send_block_predecessor, valid_state_block_predecessor, Block, BlockType, ChangeBlock,
    ChangeBlockArgs, JsonBlock, OpenBlock, OpenBlockArgs, ReceiveBlock, ReceiveBlockArgs,
    SendBlock, SendBlockArgs, StateBlock, StateBlockArgs, WorkNonce,
};

pub mod utils;
