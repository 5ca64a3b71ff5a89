//! Name-based UUIDs.

use std::fmt;

use md5::Md5;
use sha1::{Digest, Sha1};

use crate::layout::{LSB_VARIANT, RFC_4122_VARIANT, VERSION};
use crate::Uuid;

/// Version 3 UUID: the MD5 hash of a name space and a name.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct V3 {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

/// Version 5 UUID: the SHA-1 hash of a name space and a name.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct V5 {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

impl V3 {
    /// Creates the UUID for `name` within `namespace`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::{Uuid, V3};
    ///
    /// let e = V3::from_name(&Uuid::NAMESPACE_DNS, "python.org");
    /// assert_eq!(e.to_string(), "6fa459ea-ee8a-3ca4-894e-db77e160355e");
    /// ```
    pub fn from_name(namespace: &Uuid, name: impl AsRef<[u8]>) -> Self {
        let (msb, lsb) = hash_words::<Md5>(namespace, name.as_ref(), 3);
        Self { msb, lsb }
    }

    /// Returns the most significant 64 bits.
    pub const fn msb(&self) -> u64 {
        self.msb
    }

    /// Returns the least significant 64 bits.
    pub const fn lsb(&self) -> u64 {
        self.lsb
    }
}

impl V5 {
    /// Creates the UUID for `name` within `namespace`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::{Uuid, V5};
    ///
    /// let e = V5::from_name(&Uuid::NAMESPACE_DNS, "python.org");
    /// assert_eq!(e.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
    /// ```
    pub fn from_name(namespace: &Uuid, name: impl AsRef<[u8]>) -> Self {
        let (msb, lsb) = hash_words::<Sha1>(namespace, name.as_ref(), 5);
        Self { msb, lsb }
    }

    /// Returns the most significant 64 bits.
    pub const fn msb(&self) -> u64 {
        self.msb
    }

    /// Returns the least significant 64 bits.
    pub const fn lsb(&self) -> u64 {
        self.lsb
    }
}

impl fmt::Display for V3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from(*self), f)
    }
}

impl fmt::Display for V5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from(*self), f)
    }
}

/// Hashes the big-endian `namespace` followed by `name` and stamps the first 16 bytes of the
/// digest with `version` and the RFC 4122 variant.
///
/// The variant goes in the top two bits of octet 8, as RFC 4122 lays it out. The memeid library
/// writes those bits at bit 52 of the low word instead, so its name-based UUIDs do not match
/// the values produced here or by other RFC 4122 implementations.
fn hash_words<D: Digest>(namespace: &Uuid, name: &[u8], version: u64) -> (u64, u64) {
    let mut hasher = D::new();
    hasher.update(namespace.to_bytes());
    hasher.update(name);
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    let value = u128::from_be_bytes(bytes);
    (
        VERSION.write((value >> 64) as u64, version),
        LSB_VARIANT.write(value as u64, RFC_4122_VARIANT),
    )
}
