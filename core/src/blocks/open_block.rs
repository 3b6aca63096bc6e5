use super::WorkNonce;
use crate::{Account, Block, BlockHash, BlockHashBuilder, KeyPair, Signature};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OpenBlock {
    work: u64,
    signature: Signature,
    hashables: OpenHashables,
    hash: BlockHash,
}

impl OpenBlock {
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }

    /// Hash of the send block being claimed by this first block
    pub fn source(&self) -> BlockHash {
        self.hashables.source
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

    pub(crate) fn json_representation(&self) -> JsonOpenBlock {
        JsonOpenBlock {
            source: self.hashables.source,
            representative: self.hashables.representative,
            account: self.hashables.account,
            signature: self.signature.clone(),
            work: self.work.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OpenHashables {
    /// Block with the first send transaction to this account
    pub source: BlockHash,
    pub representative: Account,
    pub account: Account,
}

impl OpenHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update(self.source.as_bytes())
            .update(self.representative.as_bytes())
            .update(self.account.as_bytes())
            .build()
    }
}

pub struct OpenBlockArgs<'a> {
    pub key: &'a KeyPair,
    pub source: BlockHash,
    pub representative: Account,
    pub work: u64,
}

impl<'a> From<OpenBlockArgs<'a>> for OpenBlock {
    fn from(value: OpenBlockArgs<'a>) -> Self {
        let hashables = OpenHashables {
            source: value.source,
            representative: value.representative,
            account: value.key.account(),
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

impl<'a> From<OpenBlockArgs<'a>> for Block {
    fn from(value: OpenBlockArgs<'a>) -> Self {
        Block::Open(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonOpenBlock {
    pub account: Account,
    pub source: BlockHash,
    pub representative: Account,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonOpenBlock> for OpenBlock {
    fn from(value: JsonOpenBlock) -> Self {
        let hashables = OpenHashables {
            source: value.source,
            representative: value.representative,
            account: value.account,
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
