use blake2::digest::{Update, VariableOutput};
use rand::Rng;
use serde::de::{Unexpected, Visitor};
use std::fmt::{Display, Write};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Hash)]
pub struct BlockHash {
    value: [u8; 32], // big endian
}

const ZERO_BLOCK_HASH: BlockHash = BlockHash { value: [0; 32] };

impl BlockHash {
    pub fn new() -> Self {
        Self { value: [0; 32] }
    }

    pub fn zero() -> &'static Self {
        &ZERO_BLOCK_HASH
    }

    pub fn is_zero(&self) -> bool {
        self.value == [0u8; 32]
    }

    pub fn random() -> Self {
        let mut value = [0u8; 32];
        rand::thread_rng().fill(&mut value);
        Self { value }
    }

    pub fn from_bytes(value: [u8; 32]) -> Self {
        Self { value }
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 32 {
            return None;
        }
        let mut value = [0u8; 32];
        value.copy_from_slice(bytes);
        Some(Self { value })
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.value
    }

    pub fn as_bytes(&'_ self) -> &'_ [u8; 32] {
        &self.value
    }

    pub fn encode_hex(&self) -> String {
        let mut result = String::with_capacity(64);
        for &byte in self.value.iter() {
            write!(&mut result, "{:02X}", byte).unwrap();
        }
        result
    }

    pub fn decode_hex(s: impl AsRef<str>) -> anyhow::Result<BlockHash> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.as_ref(), &mut bytes)?;
        Ok(BlockHash::from_bytes(bytes))
    }
}

impl From<u64> for BlockHash {
    fn from(value: u64) -> Self {
        let mut result = Self { value: [0; 32] };
        result.value[24..].copy_from_slice(&value.to_be_bytes());
        result
    }
}

impl Display for BlockHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode_hex())
    }
}

impl serde::Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encode_hex())
    }
}

impl<'de> serde::Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(BlockHashVisitor {})
    }
}

struct BlockHashVisitor {}

impl<'de> Visitor<'de> for BlockHashVisitor {
    type Value = BlockHash;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a 64 digit hex block hash")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        BlockHash::decode_hex(v)
            .map_err(|_| serde::de::Error::invalid_value(Unexpected::Str(v), &"a hex block hash"))
    }
}

/// Incremental Blake2b-256 over the canonical hashable fields of a block
pub struct BlockHashBuilder {
    blake: blake2::VarBlake2b,
}

impl Default for BlockHashBuilder {
    fn default() -> Self {
        Self {
            blake: blake2::VarBlake2b::new_keyed(&[], 32),
        }
    }
}

impl BlockHashBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update(mut self, data: impl AsRef<[u8]>) -> Self {
        self.blake.update(data);
        self
    }

    pub fn build(self) -> BlockHash {
        let mut hash_bytes = [0u8; 32];
        self.blake.finalize_variable(|result| {
            hash_bytes.copy_from_slice(result);
        });
        BlockHash::from_bytes(hash_bytes)
    }
}
