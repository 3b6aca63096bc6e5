use super::{BlockType, WorkNonce};
use crate::{Account, Amount, Block, BlockHash, BlockHashBuilder, KeyPair, Signature};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SendBlock {
    work: u64,
    signature: Signature,
    hashables: SendHashables,
    hash: BlockHash,
}

impl SendBlock {
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    pub fn destination(&self) -> Account {
        self.hashables.destination
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn work(&self) -> u64 {
        self.work
    }

    pub(crate) fn json_representation(&self) -> JsonSendBlock {
        JsonSendBlock {
            previous: self.hashables.previous,
            destination: self.hashables.destination,
            balance: self.hashables.balance,
            signature: self.signature.clone(),
            work: self.work.into(),
        }
    }
}

pub fn valid_send_block_predecessor(predecessor: BlockType) -> bool {
    matches!(
        predecessor,
        BlockType::Send | BlockType::Receive | BlockType::Open | BlockType::Change
    )
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SendHashables {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
}

impl SendHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update(self.previous.as_bytes())
            .update(self.destination.as_bytes())
            .update(self.balance.to_be_bytes())
            .build()
    }
}

pub struct SendBlockArgs<'a> {
    pub key: &'a KeyPair,
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
    pub work: u64,
}

impl<'a> From<SendBlockArgs<'a>> for SendBlock {
    fn from(value: SendBlockArgs<'a>) -> Self {
        let hashables = SendHashables {
            previous: value.previous,
            destination: value.destination,
            balance: value.balance,
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

impl<'a> From<SendBlockArgs<'a>> for Block {
    fn from(value: SendBlockArgs<'a>) -> Self {
        Block::Send(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonSendBlock {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonSendBlock> for SendBlock {
    fn from(value: JsonSendBlock) -> Self {
        let hashables = SendHashables {
            previous: value.previous,
            destination: value.destination,
            balance: value.balance,
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
