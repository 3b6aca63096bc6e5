use serde::de::{Unexpected, Visitor};
use std::fmt::Debug;

/// Native currency amount, 128-bit raw units
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount {
    raw: u128, // native endian!
}

impl Amount {
    pub const MAX: Amount = Amount::raw(u128::MAX);

    pub const fn raw(value: u128) -> Self {
        Self { raw: value }
    }

    pub fn zero() -> Self {
        Self::raw(0)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn number(&self) -> u128 {
        self.raw
    }

    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self {
            raw: u128::from_be_bytes(bytes),
        }
    }

    pub fn to_be_bytes(self) -> [u8; 16] {
        self.raw.to_be_bytes()
    }

    pub fn encode_hex(&self) -> String {
        format!("{:032X}", self.raw)
    }

    pub fn decode_hex(s: impl AsRef<str>) -> anyhow::Result<Self> {
        let value = u128::from_str_radix(s.as_ref(), 16)?;
        Ok(Amount::raw(value))
    }

    pub fn decode_dec(s: impl AsRef<str>) -> anyhow::Result<Self> {
        Ok(Self::raw(s.as_ref().parse::<u128>()?))
    }

    pub fn to_string_dec(self) -> String {
        self.raw.to_string()
    }

    pub fn wrapping_add(&self, other: Amount) -> Amount {
        self.raw.wrapping_add(other.raw).into()
    }

    pub fn wrapping_sub(&self, other: Amount) -> Amount {
        self.raw.wrapping_sub(other.raw).into()
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount::raw(value)
    }
}

impl Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.raw, f)
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::raw(self.raw + rhs.raw)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::raw(self.raw - rhs.raw)
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string_dec())
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(AmountVisitor {})
    }
}

struct AmountVisitor {}

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an 128 bit amount in decimal")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let value = v.parse::<u128>().map_err(|_| {
            serde::de::Error::invalid_value(Unexpected::Str(v), &"a 128bit decimal string")
        })?;
        Ok(Amount::from(value))
    }
}
