use super::{BlockType, WorkNonce};
use crate::{Account, Amount, Block, BlockHash, BlockHashBuilder, KeyPair, Link, Signature};

/// Distinguishes the state block hash preamble from legacy block hashes
fn state_block_preamble() -> [u8; 32] {
    let mut preamble = [0u8; 32];
    preamble[31] = BlockType::State as u8;
    preamble
}

/// Unified block encoding any operation through balance delta and link
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateBlock {
    work: u64,
    signature: Signature,
    hashables: StateHashables,
    hash: BlockHash,
}

impl StateBlock {
    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn account(&self) -> Account {
        self.hashables.account
    }

    pub fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    pub fn representative(&self) -> Account {
        self.hashables.representative
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    /// Destination for a send, source hash for a receive, zero for a
    /// representative-only change
    pub fn link(&self) -> Link {
        self.hashables.link
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn work(&self) -> u64 {
        self.work
    }

    pub(crate) fn json_representation(&self) -> JsonStateBlock {
        JsonStateBlock {
            account: self.hashables.account,
            previous: self.hashables.previous,
            representative: self.hashables.representative,
            balance: self.hashables.balance,
            link: self.hashables.link.to_block_hash(),
            signature: self.signature.clone(),
            work: self.work.into(),
        }
    }
}

pub fn valid_state_block_predecessor(predecessor: BlockType) -> bool {
    !matches!(predecessor, BlockType::Invalid | BlockType::NotABlock)
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateHashables {
    pub account: Account,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: Link,
}

impl StateHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update(state_block_preamble())
            .update(self.account.as_bytes())
            .update(self.previous.as_bytes())
            .update(self.representative.as_bytes())
            .update(self.balance.to_be_bytes())
            .update(self.link.as_bytes())
            .build()
    }
}

pub struct StateBlockArgs<'a> {
    pub key: &'a KeyPair,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: Link,
    pub work: u64,
}

impl<'a> From<StateBlockArgs<'a>> for StateBlock {
    fn from(value: StateBlockArgs<'a>) -> Self {
        let hashables = StateHashables {
            account: value.key.account(),
            previous: value.previous,
            representative: value.representative,
            balance: value.balance,
            link: value.link,
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

impl<'a> From<StateBlockArgs<'a>> for Block {
    fn from(value: StateBlockArgs<'a>) -> Self {
        Block::State(value.into())
    }
}

#[derive(PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonStateBlock {
    pub account: Account,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: BlockHash,
    pub signature: Signature,
    pub work: WorkNonce,
}

impl From<JsonStateBlock> for StateBlock {
    fn from(value: JsonStateBlock) -> Self {
        let hashables = StateHashables {
            account: value.account,
            previous: value.previous,
            representative: value.representative,
            balance: value.balance,
            link: value.link.into(),
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
