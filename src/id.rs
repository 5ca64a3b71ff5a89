use std::{cmp, fmt, str};

use fstr::FStr;

use crate::layout::{LSB_VARIANT_WIDE, VERSION};
use crate::{Error, V1, V3, V4, V5};

/// Represents a Universally Unique IDentifier, tagged with the version its bits declare.
///
/// The tag is derived from the version nibble when the value is built and never stored apart
/// from the bits, so the two cannot disagree. Version-specific capabilities live on the payload
/// types: only a [`V1`] has a timestamp, for example.
///
/// # Examples
///
/// ```rust
/// use rfc4122::Uuid;
///
/// let x: Uuid = "6ba7b810-9dad-11d1-80b4-00c04fd430c8".parse()?;
/// assert_eq!(x, Uuid::NAMESPACE_DNS);
/// if let Uuid::V1(v1) = x {
///     assert_eq!(v1.node_id(), 0x00c0_4fd4_30c8);
/// }
/// # Ok::<(), rfc4122::Error>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Uuid {
    /// The nil UUID (00000000-0000-0000-0000-000000000000).
    #[default]
    Nil,
    /// Time-based UUID.
    V1(V1),
    /// DCE security UUID. Decoded only; never generated.
    V2(V2),
    /// Name-based UUID hashed with MD5.
    V3(V3),
    /// Random UUID.
    V4(V4),
    /// Name-based UUID hashed with SHA-1.
    V5(V5),
    /// A version outside 1 to 5, or a non-nil value with version 0.
    UnknownVersion(UnknownVersion),
}

/// DCE security UUID, with embedded POSIX UIDs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct V2 {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

/// A UUID whose version this crate does not know.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UnknownVersion {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

impl V2 {
    /// Returns the most significant 64 bits.
    pub const fn msb(&self) -> u64 {
        self.msb
    }

    /// Returns the least significant 64 bits.
    pub const fn lsb(&self) -> u64 {
        self.lsb
    }
}

impl UnknownVersion {
    /// Returns the most significant 64 bits.
    pub const fn msb(&self) -> u64 {
        self.msb
    }

    /// Returns the least significant 64 bits.
    pub const fn lsb(&self) -> u64 {
        self.lsb
    }
}

/// Layout family declared by the most significant bits of octet 8.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Variant {
    /// `0xx`: reserved for NCS backward compatibility (includes the nil UUID).
    Var0,
    /// `10x`: the RFC 4122 variant.
    Var10,
    /// `110`: reserved for Microsoft backward compatibility.
    Var110,
    /// `111`: reserved for future definition.
    VarReserved,
}

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self::Nil;

    /// Name space for fully-qualified domain names (6ba7b810-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_DNS: Self = Self::V1(V1 {
        msb: 0x6ba7_b810_9dad_11d1,
        lsb: 0x80b4_00c0_4fd4_30c8,
    });

    /// Name space for URLs (6ba7b811-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_URL: Self = Self::V1(V1 {
        msb: 0x6ba7_b811_9dad_11d1,
        lsb: 0x80b4_00c0_4fd4_30c8,
    });

    /// Name space for ISO OIDs (6ba7b812-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_OID: Self = Self::V1(V1 {
        msb: 0x6ba7_b812_9dad_11d1,
        lsb: 0x80b4_00c0_4fd4_30c8,
    });

    /// Name space for X.500 DNs (6ba7b814-9dad-11d1-80b4-00c04fd430c8)
    pub const NAMESPACE_X500: Self = Self::V1(V1 {
        msb: 0x6ba7_b814_9dad_11d1,
        lsb: 0x80b4_00c0_4fd4_30c8,
    });

    /// Creates a UUID from its most and least significant 64 bits, tagging it with the version
    /// found in the bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::Uuid;
    ///
    /// assert!(Uuid::from_words(0, 0).is_nil());
    /// assert!(matches!(Uuid::from_words(0, 1), Uuid::UnknownVersion(_)));
    /// assert!(Uuid::from_words(0x4000, 0x8000_0000_0000_0000).is_v4());
    /// ```
    pub const fn from_words(msb: u64, lsb: u64) -> Self {
        match VERSION.read(msb) {
            0 if msb == 0 && lsb == 0 => Self::Nil,
            1 => Self::V1(V1 { msb, lsb }),
            2 => Self::V2(V2 { msb, lsb }),
            3 => Self::V3(V3 { msb, lsb }),
            4 => Self::V4(V4 { msb, lsb }),
            5 => Self::V5(V5 { msb, lsb }),
            _ => Self::UnknownVersion(UnknownVersion { msb, lsb }),
        }
    }

    /// Returns the most significant 64 bits.
    pub const fn msb(&self) -> u64 {
        match self {
            Self::Nil => 0,
            Self::V1(e) => e.msb,
            Self::V2(e) => e.msb,
            Self::V3(e) => e.msb,
            Self::V4(e) => e.msb,
            Self::V5(e) => e.msb,
            Self::UnknownVersion(e) => e.msb,
        }
    }

    /// Returns the least significant 64 bits.
    pub const fn lsb(&self) -> u64 {
        match self {
            Self::Nil => 0,
            Self::V1(e) => e.lsb,
            Self::V2(e) => e.lsb,
            Self::V3(e) => e.lsb,
            Self::V4(e) => e.lsb,
            Self::V5(e) => e.lsb,
            Self::UnknownVersion(e) => e.lsb,
        }
    }

    /// Returns the most and least significant 64 bits.
    pub const fn as_words(&self) -> (u64, u64) {
        (self.msb(), self.lsb())
    }

    /// Returns the 16-byte big-endian representation.
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.to_u128().to_be_bytes()
    }

    const fn to_u128(&self) -> u128 {
        ((self.msb() as u128) << 64) | self.lsb() as u128
    }

    /// Reports the version number from bits 48 through 51 of the UUID.
    pub const fn version(&self) -> u8 {
        VERSION.read(self.msb()) as u8
    }

    /// Reports the variant field value of the UUID.
    pub const fn variant(&self) -> Variant {
        match LSB_VARIANT_WIDE.read(self.lsb()) {
            0b000..=0b011 => Variant::Var0,
            0b100 | 0b101 => Variant::Var10,
            0b110 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns true if this is the nil UUID.
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns true if this is a time-based UUID.
    pub const fn is_v1(&self) -> bool {
        matches!(self, Self::V1(_))
    }

    /// Returns true if this is a DCE security UUID.
    pub const fn is_v2(&self) -> bool {
        matches!(self, Self::V2(_))
    }

    /// Returns true if this is an MD5 name-based UUID.
    pub const fn is_v3(&self) -> bool {
        matches!(self, Self::V3(_))
    }

    /// Returns true if this is a random UUID.
    pub const fn is_v4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    /// Returns true if this is a SHA-1 name-based UUID.
    pub const fn is_v5(&self) -> bool {
        matches!(self, Self::V5(_))
    }

    /// Returns the [`V1`] payload, if this is a time-based UUID.
    pub const fn as_v1(&self) -> Option<&V1> {
        match self {
            Self::V1(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the [`V2`] payload, if this is a DCE security UUID.
    pub const fn as_v2(&self) -> Option<&V2> {
        match self {
            Self::V2(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the [`V3`] payload, if this is an MD5 name-based UUID.
    pub const fn as_v3(&self) -> Option<&V3> {
        match self {
            Self::V3(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the [`V4`] payload, if this is a random UUID.
    pub const fn as_v4(&self) -> Option<&V4> {
        match self {
            Self::V4(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the [`V5`] payload, if this is a SHA-1 name-based UUID.
    pub const fn as_v5(&self) -> Option<&V5> {
        match self {
            Self::V5(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the 8-4-4-4-12 lowercase hexadecimal string representation stored in a
    /// stack-allocated string type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::Uuid;
    ///
    /// let x = "6BA7B811-9DAD-11D1-80B4-00C04FD430C8".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "6ba7b811-9dad-11d1-80b4-00c04fd430c8");
    /// assert_eq!(format!("{}", y), "6ba7b811-9dad-11d1-80b4-00c04fd430c8");
    /// # Ok::<(), rfc4122::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut pos = 0;
        for (i, e) in self.to_bytes().into_iter().enumerate() {
            buffer[pos] = DIGITS[(e >> 4) as usize];
            buffer[pos + 1] = DIGITS[(e & 15) as usize];
            pos += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[pos] = b'-';
                pos += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: `buffer` holds ASCII digits and hyphens only.
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }
}

/// Orders UUIDs by version first. Within version 1, UUIDs are ordered by their 60-bit timestamp
/// and then by the least significant 64 bits; within any other version, by the most and then
/// the least significant 64 bits.
///
/// # Examples
///
/// ```rust
/// use rfc4122::{Uuid, V3, V4};
///
/// let v3 = Uuid::from(V3::from_name(&Uuid::NAMESPACE_DNS, "example.com"));
/// let v4 = Uuid::from(V4::from_words(0, 0));
/// assert!(v3 < v4);
/// ```
impl Ord for Uuid {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.version()
            .cmp(&other.version())
            .then_with(|| match (self, other) {
                (Self::V1(a), Self::V1(b)) => a.cmp(b),
                _ => self.as_words().cmp(&other.as_words()),
            })
    }
}

impl PartialOrd for Uuid {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation. Braces, URN
    /// prefixes and the unhyphenated form are rejected.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let err = || Error::InvalidFormat(src.to_owned());
        let bytes = src.as_bytes();
        if bytes.len() != 36 {
            return Err(err());
        }

        let mut value = 0u128;
        for (i, e) in bytes.iter().enumerate() {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                if *e != b'-' {
                    return Err(err());
                }
            } else {
                let digit = char::from(*e).to_digit(16).ok_or_else(err)?;
                value = (value << 4) | digit as u128;
            }
        }
        Ok(Self::from(value))
    }
}

impl From<V1> for Uuid {
    fn from(src: V1) -> Self {
        Self::V1(src)
    }
}

impl From<V2> for Uuid {
    fn from(src: V2) -> Self {
        Self::V2(src)
    }
}

impl From<V3> for Uuid {
    fn from(src: V3) -> Self {
        Self::V3(src)
    }
}

impl From<V4> for Uuid {
    fn from(src: V4) -> Self {
        Self::V4(src)
    }
}

impl From<V5> for Uuid {
    fn from(src: V5) -> Self {
        Self::V5(src)
    }
}

impl From<UnknownVersion> for Uuid {
    fn from(src: UnknownVersion) -> Self {
        Self::UnknownVersion(src)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self::from(u128::from_be_bytes(src))
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        src.to_u128()
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self::from_words((src >> 64) as u64, src as u64)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<&str> for Uuid {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_u128(src.into())
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from(src.as_u128())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(UuidVisitor)
            } else {
                deserializer.deserialize_bytes(UuidVisitor)
            }
        }
    }

    struct UuidVisitor;

    impl<'de> de::Visitor<'de> for UuidVisitor {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a canonical UUID string or 16 bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
