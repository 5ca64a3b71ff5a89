//! RFC 4122 Universally Unique IDentifiers
//!
//! ```rust
//! use rfc4122::{uuid1, uuid4, Uuid, V5};
//!
//! let uuid = uuid1();
//! println!("{}", uuid); // e.g. "d9428888-122b-11e1-b85c-61cd3cbb3210"
//!
//! let uuid = uuid4();
//! println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
//!
//! let uuid = V5::from_name(&Uuid::NAMESPACE_DNS, "python.org");
//! assert_eq!(uuid.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
//! ```
//!
//! See [RFC 4122](https://www.rfc-editor.org/rfc/rfc4122).
//!
//! # Field and bit layout
//!
//! Every UUID is held as two 64-bit words. The RFC 4122 variant declares the following fields:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          time_low                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       time_mid                |  ver  |       time_hi         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|  clock_seq_hi |  clock_seq_low  |         node (0-1)        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         node (2-5)                            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 4-bit `ver` field holds the version: `1` for time-based, `3` and `5` for name-based
//!   and `4` for random UUIDs.
//! - The 2-bit `var` field is set at `10`.
//! - Time-based UUIDs split a 60-bit count of 100-nanosecond intervals since 1582-10-15 over
//!   `time_low`, `time_mid` and `time_hi`, and carry a 14-bit clock sequence and a 48-bit node.
//! - Name-based UUIDs fill all other bits with an MD5 (`3`) or SHA-1 (`5`) hash of a name
//!   space UUID and a name.
//! - Random UUIDs fill all other bits with random numbers.
//!
//! Parsed UUIDs are tagged by the version their bits declare; see [`Uuid`].
//!
//! # Time-based UUIDs
//!
//! The process-wide [`MonotonicClock`] hands out strictly increasing timestamps with up to
//! [`MAX_TICKS_PER_MILLI`] values per millisecond, and the process-wide [`NodeIdentity`] is
//! derived once from a hash of host data. Both can be replaced:
//!
//! ```rust
//! use rfc4122::{MonotonicClock, NodeIdentity, StdSystemTime, V1};
//!
//! let clock = MonotonicClock::new(StdSystemTime);
//! let node = NodeIdentity::new(0x1234, 0x0102_0304_0506);
//! let uuid = V1::next_core(&node, &clock);
//! assert_eq!(uuid.node_id(), 0x0102_0304_0506);
//! ```
//!
//! # Crate features
//!
//! - `serde` enables serialization and deserialization of [`Uuid`].
//! - `uuid` enables conversion from/to the [uuid] crate's `Uuid` type.
//!
//! [uuid]: https://crates.io/crates/uuid

#![cfg_attr(docsrs, feature(doc_cfg))]

mod bits;
mod layout;

mod error;
pub use error::Error;

mod id;
pub use id::{UnknownVersion, Uuid, Variant, V2};

mod clock;
pub use clock::{
    monotonic, MonotonicClock, StdSystemTime, TickSource, TimeSource, GREGORIAN_OFFSET_TICKS,
    MAX_TICKS_PER_MILLI,
};

mod node;
pub use node::{HostSource, NodeIdentity, SystemHost};

mod v1;
pub use v1::V1;

mod v4;
pub use v4::V4;

mod name;
pub use name::{V3, V5};

mod entry;
pub use entry::{uuid1, uuid4};
