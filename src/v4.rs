//! Random UUIDs.

use std::{fmt, time};

use crate::layout::{LSB_VARIANT, MSB_TIME_LOW, RFC_4122_VARIANT, VERSION};
use crate::Uuid;

/// Version 4 UUID: 122 random bits plus the version and variant.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct V4 {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

impl V4 {
    /// Creates a UUID from caller-supplied bits, overwriting the version and variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::V4;
    ///
    /// let e = V4::from_words(u64::MAX, u64::MAX);
    /// assert_eq!(e.to_string(), "ffffffff-ffff-4fff-bfff-ffffffffffff");
    /// ```
    pub const fn from_words(msb: u64, lsb: u64) -> Self {
        Self {
            msb: VERSION.write(msb, 4),
            lsb: LSB_VARIANT.write(lsb, RFC_4122_VARIANT),
        }
    }

    /// Generates a random UUID.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let uuid = rfc4122::V4::random();
    /// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
    /// ```
    pub fn random() -> Self {
        let (msb, lsb): (u64, u64) = rand::random();
        Self::from_words(msb, lsb)
    }

    /// Generates a sequential UUID (SQUUID): a random UUID whose first 32 bits are replaced by
    /// the current POSIX time in seconds.
    ///
    /// The seconds are truncated to 32 bits, so the embedded value wraps to zero at
    /// 2106-02-07T06:28:16Z and SQUUIDs made after that point sort before earlier ones.
    pub fn squuid() -> Self {
        let posix_seconds = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_secs();
        Self::squuid_at(posix_seconds as u32)
    }

    /// Generates a SQUUID carrying `posix_seconds` in its first 32 bits.
    ///
    /// SQUUIDs sort by creation second; within a second they are ordered randomly. The field is
    /// an unsigned 32-bit count, which covers seconds up to 2106-02-07T06:28:15Z.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::V4;
    ///
    /// let e = V4::squuid_at(0x5e0b_e100);
    /// assert!(e.to_string().starts_with("5e0be100-"));
    /// ```
    pub fn squuid_at(posix_seconds: u32) -> Self {
        let random = Self::random();
        Self {
            msb: MSB_TIME_LOW.write(random.msb, posix_seconds as u64),
            lsb: random.lsb,
        }
    }

    /// Returns the POSIX seconds if this is a SQUUID. For other V4 UUIDs, the value is random.
    pub const fn posix_seconds(&self) -> u32 {
        MSB_TIME_LOW.read(self.msb) as u32
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

impl fmt::Display for V4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from(*self), f)
    }
}
