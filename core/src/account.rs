use blake2::digest::{Update, VariableOutput};
use primitive_types::U512;
use serde::de::{Unexpected, Visitor};
use std::fmt::{Display, Write};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Hash)]
pub struct PublicKey {
    value: [u8; 32], // big endian
}

impl PublicKey {
    pub fn new() -> Self {
        Self { value: [0; 32] }
    }

    pub fn is_zero(&self) -> bool {
        self.value == [0; 32]
    }

    pub fn from_bytes(value: [u8; 32]) -> Self {
        Self { value }
    }

    pub fn as_bytes(&'_ self) -> &'_ [u8; 32] {
        &self.value
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        self.value
    }
}

/// 32-byte public key identifying an account chain
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug, Hash)]
pub struct Account {
    public_key: PublicKey,
}

const ZERO_ACCOUNT: Account = Account {
    public_key: PublicKey { value: [0; 32] },
};

impl Account {
    pub fn new() -> Self {
        Self {
            public_key: PublicKey::new(),
        }
    }

    pub fn zero() -> &'static Account {
        &ZERO_ACCOUNT
    }

    pub fn is_zero(&self) -> bool {
        self.public_key.is_zero()
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Account {
        Self {
            public_key: PublicKey::from_bytes(bytes),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Account> {
        if bytes.len() != 32 {
            return None;
        }
        let mut value = [0u8; 32];
        value.copy_from_slice(bytes);
        Some(Account::from_bytes(value))
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.public_key.to_be_bytes()
    }

    pub fn as_bytes(&'_ self) -> &'_ [u8; 32] {
        self.public_key.as_bytes()
    }

    pub fn encode_account(&self) -> String {
        let mut number = U512::from_big_endian(self.public_key.as_bytes());
        let check = U512::from_little_endian(&self.account_checksum());
        number <<= 40;
        number = number | check;

        let mut result = String::with_capacity(65);
        for _ in 0..60 {
            let r = number.byte(0) & 0x1f_u8;
            number >>= 5;
            result.push(account_encode(r));
        }
        result.push_str("_lapo"); // opal_
        result.chars().rev().collect()
    }

    fn account_checksum(&self) -> [u8; 5] {
        let mut check = [0u8; 5];
        let mut blake = blake2::VarBlake2b::new_keyed(&[], check.len());
        blake.update(self.public_key.as_bytes());
        blake.finalize_variable(|bytes| {
            check.copy_from_slice(bytes);
        });
        check
    }

    pub fn decode_account(source: impl AsRef<str>) -> anyhow::Result<Account> {
        EncodedAccountStr(source.as_ref()).to_u512()?.to_account()
    }

    pub fn encode_hex(&self) -> String {
        let mut result = String::with_capacity(64);
        for byte in self.public_key.as_bytes() {
            write!(&mut result, "{:02X}", byte).unwrap();
        }
        result
    }

    pub fn decode_hex(s: impl AsRef<str>) -> anyhow::Result<Self> {
        let s = s.as_ref();
        if s.is_empty() || s.len() > 64 {
            bail!("invalid length");
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Account::from_bytes(bytes))
    }
}

impl From<PublicKey> for Account {
    fn from(public_key: PublicKey) -> Self {
        Account { public_key }
    }
}

impl From<u64> for Account {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Account::from_bytes(bytes)
    }
}

impl Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode_account())
    }
}

impl serde::Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encode_account())
    }
}

impl<'de> serde::Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AccountVisitor {})
    }
}

struct AccountVisitor {}

impl<'de> Visitor<'de> for AccountVisitor {
    type Value = Account;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an opal_ encoded account")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Account::decode_account(v)
            .map_err(|_| serde::de::Error::invalid_value(Unexpected::Str(v), &"an encoded account"))
    }
}

struct EncodedAccountU512(U512);

impl EncodedAccountU512 {
    fn account_bytes(&self) -> [u8; 32] {
        let mut bytes_512 = [0u8; 64];
        (self.0 >> 40).to_big_endian(&mut bytes_512);
        let mut bytes_256 = [0u8; 32];
        bytes_256.copy_from_slice(&bytes_512[32..]);
        bytes_256
    }

    fn checksum_bytes(&self) -> [u8; 5] {
        [
            self.0.byte(0),
            self.0.byte(1),
            self.0.byte(2),
            self.0.byte(3),
            self.0.byte(4),
        ]
    }

    fn to_account(&self) -> anyhow::Result<Account> {
        let account = Account::from_bytes(self.account_bytes());
        if account.account_checksum() == self.checksum_bytes() {
            Ok(account)
        } else {
            Err(anyhow!("invalid checksum"))
        }
    }
}

struct EncodedAccountStr<'a>(&'a str);

impl<'a> EncodedAccountStr<'a> {
    fn is_valid(&self) -> bool {
        self.0.starts_with("opal_")
            && self.0.chars().count() == 65
            && matches!(self.0.chars().nth(5), Some('1') | Some('3'))
    }

    fn to_u512(&self) -> anyhow::Result<EncodedAccountU512> {
        if !self.is_valid() {
            bail!("invalid account string");
        }

        let mut number = U512::default();
        for character in self.0.chars().skip(5) {
            match decode_byte(character) {
                Some(byte) => {
                    number <<= 5;
                    number = number + byte;
                }
                None => bail!("invalid account digit"),
            }
        }
        Ok(EncodedAccountU512(number))
    }
}

fn decode_byte(character: char) -> Option<u8> {
    if character.is_ascii() {
        let character = character as u8;
        if (0x30..0x80).contains(&character) {
            let byte: u8 = account_decode(character);
            if byte != b'~' {
                return Some(byte);
            }
        }
    }
    None
}

const ACCOUNT_LOOKUP: &[char] = &[
    '1', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'w', 'x', 'y', 'z',
];

const ACCOUNT_REVERSE: &[char] = &[
    '~', '0', '~', '1', '2', '3', '4', '5', '6', '7', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~',
    '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '~', '8', '9', ':', ';', '<', '=', '>', '?',
    '@', 'A', 'B', '~', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', '~', 'L', 'M', 'N', 'O', '~',
    '~', '~', '~', '~',
];

fn account_encode(value: u8) -> char {
    ACCOUNT_LOOKUP[value as usize]
}

fn account_decode(value: u8) -> u8 {
    let mut result = ACCOUNT_REVERSE[(value - 0x30) as usize] as u8;
    if result != b'~' {
        result -= 0x30;
    }
    result
}
