use super::{BlockType, WorkNonce};
use crate::{Account, Block, BlockHash, BlockHashBuilder, KeyPair, Signature};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChangeBlock {
    work: u64,
    signature: Signature,
    hashables: ChangeHashables,
    hash: BlockHash,
}

impl ChangeBlock {
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    pub fn representative(&self) -> Account {
        self.hashables.representative
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn work(&self) -> u64 {
        self.work
    }

    pub(crate) fn json_representation(&self) -> JsonChangeBlock {
        JsonChangeBlock {
            previous: self.hashables.previous,
            representative: self.hashables.representative,
            signature: self.signature.clone(),
            work: self.work.into(),
        }
    }
}

pub fn valid_change_block_predecessor(predecessor: BlockType) -> bool {
    matches!(
        predecessor,
        BlockType::Send | BlockType::Receive | BlockType::Open | BlockType::Change
    )
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChangeHashables {
    pub previous: BlockHash,
    pub representative: Account,
}

impl ChangeHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.representative.as_bytes())
            .build()
    }
}

pub struct ChangeBlockArgs<'a> {
    pub key: &'a KeyPair,
    pub previous: BlockHash,
    pub representative: Account,
    pub work: u64,
}

impl<'a> From<ChangeBlockArgs<'a>> for ChangeBlock {
    fn from(value: ChangeBlockArgs<'a>) -> Self {
        let hashables = ChangeHashables {
            previous: value.previous,
            representative: value.representative,
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

impl<'a> From<ChangeBlockArgs<'a>> for Block {
    fn from(value: ChangeBlockArgs<'a>) -> Self {
        Block::Change(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonChangeBlock {
    pub previous: BlockHash,
    pub representative: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonChangeBlock> for ChangeBlock {
    fn from(value: JsonChangeBlock) -> Self {
        let hashables = ChangeHashables {
            previous: value.previous,
            representative: value.representative,
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
