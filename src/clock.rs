//! Monotonic Gregorian clock for time-based UUIDs.

use std::hint;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of 100-nanosecond intervals between 1582-10-15T00:00:00Z and the Unix epoch.
pub const GREGORIAN_OFFSET_TICKS: u64 = 0x01b2_1dd2_1381_4000;

/// Number of 100-nanosecond intervals in a millisecond.
const TICKS_PER_MILLI: u64 = 10_000;

/// Maximum number of distinct timestamps handed out within a single millisecond.
///
/// This caps the throughput of a single clock at one million timestamps per second. Callers
/// that exhaust a millisecond spin until the wall clock moves on.
pub const MAX_TICKS_PER_MILLI: u64 = 1_000;

/// Bits of the packed state reserved for the sub-millisecond counter.
const COUNTER_BITS: u32 = 10;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

/// A trait that defines the wall clock interface for [`MonotonicClock`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&self) -> u64;
}

/// The default [`TimeSource`] that reads [`std::time::SystemTime`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .expect("clock may have gone backwards")
            .as_millis() as u64
    }
}

/// A source of Gregorian timestamps for [`V1`](crate::V1) generation.
pub trait TickSource {
    /// Returns a 60-bit count of 100-nanosecond intervals since 1582-10-15.
    fn next_tick(&self) -> u64;
}

/// Hands out strictly increasing Gregorian timestamps, even to concurrent callers.
///
/// The clock keeps the last observed wall clock millisecond and a counter of timestamps issued
/// within it, packed into a single atomic word and updated with a compare-and-swap loop. The
/// counter is spliced in as the sub-millisecond part of the timestamp:
///
/// - A newer millisecond resets the counter to zero.
/// - The same millisecond increments the counter, up to [`MAX_TICKS_PER_MILLI`]` - 1`, after
///   which the caller spins until the wall clock advances.
/// - An older millisecond (clock rollback) is treated like the same millisecond, except that an
///   exhausted counter carries into the millisecond after the stored one instead of spinning.
///
/// Timestamps are true RFC 4122 100-nanosecond intervals,
/// `GREGORIAN_OFFSET_TICKS + 10_000 * unix_ts_ms + counter`. They are not interchangeable with
/// the timestamps written by the memeid library, which scales milliseconds by 1000 from a
/// different epoch (`1000 * (unix_ts_ms + 2_208_988_800_000) + 100_103_040_000_000_000`), so the
/// same instant yields a different `time_*` wire value.
///
/// # Examples
///
/// ```rust
/// use rfc4122::{MonotonicClock, StdSystemTime, TickSource};
///
/// let clock = MonotonicClock::new(StdSystemTime);
/// let a = clock.next_tick();
/// let b = clock.next_tick();
/// assert!(a < b);
/// ```
#[derive(Debug)]
pub struct MonotonicClock<T = StdSystemTime> {
    state: AtomicU64,
    time: T,
}

static GLOBAL_CLOCK: MonotonicClock = MonotonicClock::new(StdSystemTime);

impl MonotonicClock {
    /// Returns the process-wide clock backed by the system time.
    pub fn global() -> &'static MonotonicClock {
        &GLOBAL_CLOCK
    }
}

impl<T: TimeSource> MonotonicClock<T> {
    /// Creates a clock reading the wall clock from `time`.
    pub const fn new(time: T) -> Self {
        Self {
            state: AtomicU64::new(0),
            time,
        }
    }

    /// Returns the next timestamp, strictly greater than every timestamp this clock returned
    /// before.
    pub fn next_tick(&self) -> u64 {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let (millis, counter) = unpack(current);
            let now = self.time.unix_ts_ms();
            let next = if now > millis {
                pack(now, 0)
            } else if counter < MAX_TICKS_PER_MILLI - 1 {
                pack(millis, counter + 1)
            } else if now < millis {
                tracing::trace!(now, millis, "wall clock behind; carrying into next millisecond");
                pack(millis + 1, 0)
            } else {
                // millisecond exhausted; wait for the wall clock
                hint::spin_loop();
                current = self.state.load(Ordering::Acquire);
                continue;
            };

            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let (millis, counter) = unpack(next);
                    return to_gregorian(millis, counter);
                }
                Err(actual) => current = actual,
            }
        }
    }
}

impl<T: TimeSource> TickSource for MonotonicClock<T> {
    fn next_tick(&self) -> u64 {
        MonotonicClock::<T>::next_tick(self)
    }
}

impl<S: TickSource + ?Sized> TickSource for &S {
    fn next_tick(&self) -> u64 {
        (**self).next_tick()
    }
}

/// Returns the next timestamp from the process-wide clock.
pub fn monotonic() -> u64 {
    GLOBAL_CLOCK.next_tick()
}

/// Converts a Unix millisecond and a sub-millisecond counter to Gregorian ticks.
pub(crate) const fn to_gregorian(unix_ts_ms: u64, counter: u64) -> u64 {
    counter + GREGORIAN_OFFSET_TICKS + TICKS_PER_MILLI * unix_ts_ms
}

const fn pack(millis: u64, counter: u64) -> u64 {
    (millis << COUNTER_BITS) | counter
}

const fn unpack(state: u64) -> (u64, u64) {
    (state >> COUNTER_BITS, state & COUNTER_MASK)
}

#[cfg(test)]
mod tests {
    use super::{
        to_gregorian, MonotonicClock, StdSystemTime, TimeSource, GREGORIAN_OFFSET_TICKS,
        MAX_TICKS_PER_MILLI,
    };
    use std::sync::atomic::{AtomicU64, Ordering};

    const TS: u64 = 0x0123_4567_89ab;

    /// Reports `TS` for the first `stuck_reads` reads and `TS + 1` afterwards.
    struct StuckTime {
        reads: AtomicU64,
        stuck_reads: u64,
    }

    impl TimeSource for StuckTime {
        fn unix_ts_ms(&self) -> u64 {
            if self.reads.fetch_add(1, Ordering::Relaxed) < self.stuck_reads {
                TS
            } else {
                TS + 1
            }
        }
    }

    /// Reports `TS` once and then a clock that went back by five seconds.
    struct RewoundTime(AtomicU64);

    impl TimeSource for RewoundTime {
        fn unix_ts_ms(&self) -> u64 {
            if self.0.fetch_add(1, Ordering::Relaxed) == 0 {
                TS
            } else {
                TS - 5_000
            }
        }
    }

    /// Converts the Unix epoch to the RFC 4122 Gregorian offset
    #[test]
    fn converts_the_unix_epoch_to_the_gregorian_offset() {
        assert_eq!(to_gregorian(0, 0), 122_192_928_000_000_000);
        assert_eq!(to_gregorian(1, 0) - to_gregorian(0, 0), 10_000);
        assert_eq!(to_gregorian(0, 999), GREGORIAN_OFFSET_TICKS + 999);
    }

    /// Counts 100-nanosecond intervals rather than scaled milliseconds
    #[test]
    fn counts_100_nanosecond_intervals_rather_than_scaled_milliseconds() {
        // 1998-02-04T22:13:53.1511824Z, the timestamp of the DNS name space UUID
        assert_eq!(to_gregorian(886_630_433_151, 1_824), 0x01d1_9dad_6ba7_b810);

        let ms = 1_700_000_000_000;
        let scaled = 1_000 * (ms + 2_208_988_800_000) + 100_103_040_000_000_000;
        assert_ne!(to_gregorian(ms, 0), scaled);
        assert_eq!(to_gregorian(ms, 0) - GREGORIAN_OFFSET_TICKS, ms * 10_000);
    }

    /// Increments the sub-millisecond counter while the wall clock stands still
    #[test]
    fn increments_the_sub_millisecond_counter_while_the_wall_clock_stands_still() {
        let clock = MonotonicClock::new(StuckTime {
            reads: AtomicU64::new(0),
            stuck_reads: u64::MAX,
        });
        for i in 0..MAX_TICKS_PER_MILLI {
            assert_eq!(clock.next_tick(), to_gregorian(TS, i));
        }
    }

    /// Waits for the next millisecond once the counter is exhausted
    #[test]
    fn waits_for_the_next_millisecond_once_the_counter_is_exhausted() {
        let clock = MonotonicClock::new(StuckTime {
            reads: AtomicU64::new(0),
            stuck_reads: 1_500,
        });
        let mut prev = clock.next_tick();
        assert_eq!(prev, to_gregorian(TS, 0));
        for _ in 1..MAX_TICKS_PER_MILLI {
            let curr = clock.next_tick();
            assert_eq!(curr, prev + 1);
            prev = curr;
        }
        assert_eq!(clock.next_tick(), to_gregorian(TS + 1, 0));
        assert!(clock.time.reads.load(Ordering::Relaxed) >= 1_500);
    }

    /// Keeps increasing when the wall clock goes backwards
    #[test]
    fn keeps_increasing_when_the_wall_clock_goes_backwards() {
        let clock = MonotonicClock::new(RewoundTime(AtomicU64::new(0)));
        let first = clock.next_tick();
        let mut prev = first;
        for _ in 0..5_000 {
            let curr = clock.next_tick();
            assert!(prev < curr);
            prev = curr;
        }
        assert_eq!(prev, to_gregorian(TS + 5, 0));
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        let clock = MonotonicClock::new(StdSystemTime);
        for _ in 0..10_000 {
            let ts_now = StdSystemTime.unix_ts_ms() as i64;
            let tick = clock.next_tick();
            let unix_ts_ms = ((tick - GREGORIAN_OFFSET_TICKS) / 10_000) as i64;
            assert!((ts_now - unix_ts_ms).abs() < 16);
        }
    }

    /// Generates no duplicate ticks under multithreading
    #[test]
    fn generates_no_duplicate_ticks_under_multithreading() {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::spawn(move || {
                let mut prev = 0;
                for _ in 0..10_000 {
                    let curr = super::monotonic();
                    assert!(prev < curr);
                    prev = curr;
                    tx.send(curr).unwrap();
                }
            });
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }
        assert_eq!(s.len(), 4 * 10_000);
    }
}
