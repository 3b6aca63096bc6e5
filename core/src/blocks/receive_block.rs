use super::{BlockType, WorkNonce};
use crate::{Block, BlockHash, BlockHashBuilder, KeyPair, Signature};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReceiveBlock {
    work: u64,
    signature: Signature,
    hashables: ReceiveHashables,
    hash: BlockHash,
}

impl ReceiveBlock {
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    /// Hash of the send block being claimed
    pub fn source(&self) -> BlockHash {
        self.hashables.source
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn work(&self) -> u64 {
        self.work
    }

    pub(crate) fn json_representation(&self) -> JsonReceiveBlock {
        JsonReceiveBlock {
            previous: self.hashables.previous,
            source: self.hashables.source,
            signature: self.signature.clone(),
            work: self.work.into(),
        }
    }
}

pub fn valid_receive_block_predecessor(predecessor: BlockType) -> bool {
    matches!(
        predecessor,
        BlockType::Send | BlockType::Receive | BlockType::Open | BlockType::Change
    )
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReceiveHashables {
    pub previous: BlockHash,
    pub source: BlockHash,
}

impl ReceiveHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.source.as_bytes())
            .build()
    }
}

pub struct ReceiveBlockArgs<'a> {
    pub key: &'a KeyPair,
    pub previous: BlockHash,
    pub source: BlockHash,
    pub work: u64,
}

impl<'a> From<ReceiveBlockArgs<'a>> for ReceiveBlock {
    fn from(value: ReceiveBlockArgs<'a>) -> Self {
        let hashables = ReceiveHashables {
            previous: value.previous,
            source: value.source,
        };
        let hash = hashables.hash();
        let signature = value.key.sign(hash.as_bytes());
        Self {
            work: value.work,
            signature,
            hashables,
            hash,
        }
    }
}

impl<'a> From<ReceiveBlockArgs<'a>> for Block {
    fn from(value: ReceiveBlockArgs<'a>) -> Self {
        Block::Receive(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonReceiveBlock {
    pub previous: BlockHash,
    pub source: BlockHash,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonReceiveBlock> for ReceiveBlock {
    fn from(value: JsonReceiveBlock) -> Self {
        let hashables = ReceiveHashables {
            previous: value.previous,
            source: value.source,
        };
        let hash = hashables.hash();
        Self {
            work: value.work.into(),
            signature: value.signature,
            hashables,
            hash,
        }
    }
}
