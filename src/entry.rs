//! Entry point functions

use crate::{Uuid, V1, V4};

/// Generates a time-based UUID with the process-wide node identity and clock.
///
/// UUIDs returned by this function are unique across all threads of the process and strictly
/// increasing in [`Uuid`] order within a thread. No order is promised between threads.
///
/// # Panics
///
/// Panics if the node identity cannot be derived from the host. Use [`V1::next`] to handle the
/// error instead.
///
/// # Examples
///
/// ```rust
/// let uuid = rfc4122::uuid1();
/// println!("{uuid}"); // e.g., "d9428888-122b-11e1-b85c-61cd3cbb3210"
/// assert!(uuid.is_v1());
/// ```
pub fn uuid1() -> Uuid {
    match V1::next() {
        Ok(e) => e.into(),
        Err(err) => panic!("rfc4122: could not derive node identity: {err}"),
    }
}

/// Generates a random UUID.
///
/// # Examples
///
/// ```rust
/// let uuid = rfc4122::uuid4();
/// println!("{uuid}"); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    V4::random().into()
}
