mod send_block;
use send_block::JsonSendBlock;
pub use send_block::{valid_send_block_predecessor, SendBlock, SendBlockArgs, SendHashables};

mod receive_block;
use receive_block::JsonReceiveBlock;
pub use receive_block::{
    valid_receive_block_predecessor, ReceiveBlock, ReceiveBlockArgs, ReceiveHashables,
};

mod open_block;
use open_block::JsonOpenBlock;
pub use open_block::{OpenBlock, OpenBlockArgs, OpenHashables};

mod change_block;
use change_block::JsonChangeBlock;
pub use change_block::{
    valid_change_block_predecessor, ChangeBlock, ChangeBlockArgs, ChangeHashables,
};

mod state_block;
use state_block::JsonStateBlock;
pub use state_block::{valid_state_block_predecessor, StateBlock, StateBlockArgs, StateHashables};

use crate::{Account, Amount, BlockHash, Link, Root, Signature};
use serde::de::{Unexpected, Visitor};

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub enum BlockType {
    Invalid = 0,
    NotABlock = 1,
    Send = 2,
    Receive = 3,
    Open = 4,
    Change = 5,
    State = 6,
}

/// Sum type over the five block variants. Validation and rollback dispatch
/// by exhaustive match; the variants only know their own fields and hash.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Block {
    Send(SendBlock),
    Receive(ReceiveBlock),
    Open(OpenBlock),
    Change(ChangeBlock),
    State(StateBlock),
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::Send(_) => BlockType::Send,
            Block::Receive(_) => BlockType::Receive,
            Block::Open(_) => BlockType::Open,
            Block::Change(_) => BlockType::Change,
            Block::State(_) => BlockType::State,
        }
    }

    pub fn hash(&self) -> BlockHash {
        match self {
            Block::Send(b) => b.hash(),
            Block::Receive(b) => b.hash(),
            Block::Open(b) => b.hash(),
            Block::Change(b) => b.hash(),
            Block::State(b) => b.hash(),
        }
    }

    /// Zero for an open block
    pub fn previous(&self) -> BlockHash {
        match self {
            Block::Send(b) => b.previous(),
            Block::Receive(b) => b.previous(),
            Block::Open(_) => BlockHash::new(),
            Block::Change(b) => b.previous(),
            Block::State(b) => b.previous(),
        }
    }

    /// Previous hash if non-zero, the account otherwise
    pub fn root(&self) -> Root {
        match self {
            Block::Open(b) => b.account().into(),
            Block::State(b) => {
                if b.previous().is_zero() {
                    b.account().into()
                } else {
                    b.previous().into()
                }
            }
            _ => self.previous().into(),
        }
    }

    /// Non-zero only for receive and open blocks
    pub fn source(&self) -> Option<BlockHash> {
        match self {
            Block::Receive(b) => Some(b.source()),
            Block::Open(b) => Some(b.source()),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<Link> {
        match self {
            Block::State(b) => Some(b.link()),
            _ => None,
        }
    }

    pub fn account_field(&self) -> Option<Account> {
        match self {
            Block::Open(b) => Some(b.account()),
            Block::State(b) => Some(b.account()),
            _ => None,
        }
    }

    pub fn destination_field(&self) -> Option<Account> {
        match self {
            Block::Send(b) => Some(b.destination()),
            _ => None,
        }
    }

    pub fn representative_field(&self) -> Option<Account> {
        match self {
            Block::Open(b) => Some(b.representative()),
            Block::Change(b) => Some(b.representative()),
            Block::State(b) => Some(b.representative()),
            _ => None,
        }
    }

    pub fn balance_field(&self) -> Option<Amount> {
        match self {
            Block::Send(b) => Some(b.balance()),
            Block::State(b) => Some(b.balance()),
            _ => None,
        }
    }

    pub fn signature(&self) -> &Signature {
        match self {
            Block::Send(b) => b.signature(),
            Block::Receive(b) => b.signature(),
            Block::Open(b) => b.signature(),
            Block::Change(b) => b.signature(),
            Block::State(b) => b.signature(),
        }
    }

    pub fn work(&self) -> u64 {
        match self {
            Block::Send(b) => b.work(),
            Block::Receive(b) => b.work(),
            Block::Open(b) => b.work(),
            Block::Change(b) => b.work(),
            Block::State(b) => b.work(),
        }
    }

    /// May a block of this variant directly follow `predecessor`?
    pub fn valid_predecessor(&self, predecessor: BlockType) -> bool {
        match self {
            Block::Send(_) => valid_send_block_predecessor(predecessor),
            Block::Receive(_) => valid_receive_block_predecessor(predecessor),
            Block::Open(_) => false,
            Block::Change(_) => valid_change_block_predecessor(predecessor),
            Block::State(_) => valid_state_block_predecessor(predecessor),
        }
    }

    pub fn is_legacy(&self) -> bool {
        !matches!(self, Block::State(_))
    }

    pub fn json_representation(&self) -> JsonBlock {
        match self {
            Block::Send(b) => JsonBlock::Send(b.json_representation()),
            Block::Receive(b) => JsonBlock::Receive(b.json_representation()),
            Block::Open(b) => JsonBlock::Open(b.json_representation()),
            Block::Change(b) => JsonBlock::Change(b.json_representation()),
            Block::State(b) => JsonBlock::State(b.json_representation()),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self.json_representation())?)
    }
}

impl From<JsonBlock> for Block {
    fn from(value: JsonBlock) -> Self {
        match value {
            JsonBlock::Send(json) => Block::Send(json.into()),
            JsonBlock::Receive(json) => Block::Receive(json.into()),
            JsonBlock::Open(json) => Block::Open(json.into()),
            JsonBlock::Change(json) => Block::Change(json.into()),
            JsonBlock::State(json) => Block::State(json.into()),
        }
    }
}

pub fn deserialize_block_json(json: &str) -> anyhow::Result<Block> {
    let json_block: JsonBlock = serde_json::from_str(json)?;
    Ok(json_block.into())
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonBlock {
    Send(JsonSendBlock),
    Receive(JsonReceiveBlock),
    Open(JsonOpenBlock),
    Change(JsonChangeBlock),
    State(JsonStateBlock),
}

/// Proof-of-work nonce. Carried on every block, validated outside the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct WorkNonce(u64);

impl From<u64> for WorkNonce {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<WorkNonce> for u64 {
    fn from(value: WorkNonce) -> Self {
        value.0
    }
}

impl serde::Serialize for WorkNonce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016X}", self.0))
    }
}

impl<'de> serde::Deserialize<'de> for WorkNonce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(WorkNonceVisitor {})
    }
}

struct WorkNonceVisitor {}

impl<'de> Visitor<'de> for WorkNonceVisitor {
    type Value = WorkNonce;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a 16 digit hex work nonce")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::from_str_radix(v, 16)
            .map(WorkNonce)
            .map_err(|_| serde::de::Error::invalid_value(Unexpected::Str(v), &"a hex work nonce"))
    }
}
