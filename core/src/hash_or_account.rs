use crate::{Account, BlockHash};
use std::{
    fmt::{Display, Write},
    ops::Deref,
};

/// A 32-byte value that is either a block hash or an account, depending on
/// context. Used for link fields, roots and the representation table key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Hash)]
pub struct HashOrAccount {
    bytes: [u8; 32],
}

impl HashOrAccount {
    pub fn new() -> Self {
        Self { bytes: [0u8; 32] }
    }

    pub fn is_zero(&self) -> bool {
        self.bytes == [0u8; 32]
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.bytes
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_account(self) -> Account {
        Account::from_bytes(self.bytes)
    }

    pub fn to_block_hash(self) -> BlockHash {
        BlockHash::from_bytes(self.bytes)
    }

    pub fn encode_hex(&self) -> String {
        let mut result = String::with_capacity(64);
        for byte in self.bytes {
            write!(&mut result, "{:02X}", byte).unwrap();
        }
        result
    }
}

impl From<Account> for HashOrAccount {
    fn from(account: Account) -> Self {
        Self {
            bytes: account.to_bytes(),
        }
    }
}

impl From<BlockHash> for HashOrAccount {
    fn from(hash: BlockHash) -> Self {
        Self {
            bytes: hash.to_bytes(),
        }
    }
}

impl From<u64> for HashOrAccount {
    fn from(value: u64) -> Self {
        let mut result = Self::new();
        result.bytes[24..].copy_from_slice(&value.to_be_bytes());
        result
    }
}

impl Display for HashOrAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode_hex())
    }
}

/// Link field of a state block: destination account for sends, source block
/// hash for receives, zero for a pure representative change
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
pub struct Link {
    inner: HashOrAccount,
}

impl Link {
    pub fn new() -> Self {
        Self {
            inner: HashOrAccount::new(),
        }
    }

    pub fn zero() -> Self {
        Self::new()
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            inner: HashOrAccount::from_bytes(bytes),
        }
    }
}

impl Deref for Link {
    type Target = HashOrAccount;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Account> for Link {
    fn from(account: Account) -> Self {
        Self {
            inner: account.into(),
        }
    }
}

impl From<BlockHash> for Link {
    fn from(hash: BlockHash) -> Self {
        Self { inner: hash.into() }
    }
}

impl From<u64> for Link {
    fn from(value: u64) -> Self {
        Self {
            inner: HashOrAccount::from(value),
        }
    }
}

impl From<Link> for Account {
    fn from(link: Link) -> Self {
        link.inner.to_account()
    }
}

impl From<Link> for BlockHash {
    fn from(link: Link) -> Self {
        link.inner.to_block_hash()
    }
}

/// Root of a block: its previous hash, or the account for a first block
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
pub struct Root {
    inner: HashOrAccount,
}

impl Root {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            inner: HashOrAccount::from_bytes(bytes),
        }
    }
}

impl Deref for Root {
    type Target = HashOrAccount;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<Account> for Root {
    fn from(account: Account) -> Self {
        Self {
            inner: account.into(),
        }
    }
}

impl From<BlockHash> for Root {
    fn from(hash: BlockHash) -> Self {
        Self { inner: hash.into() }
    }
}
