//! Time-based UUIDs.

use std::{cmp, fmt};

use crate::clock::{MonotonicClock, TickSource, GREGORIAN_OFFSET_TICKS};
use crate::layout::{
    CLOCK_SEQ_HIGH, CLOCK_SEQ_HIGH_AND_RESERVED, CLOCK_SEQ_LOW, CLOCK_SEQ_RESERVED, LSB_BYTE_48,
    LSB_BYTE_56, LSB_CLOCK_SEQ, LSB_NODE, MSB_TIME_HIGH, MSB_TIME_LOW, MSB_TIME_MID,
    RFC_4122_VARIANT, TIME_HIGH, TIME_LOW, TIME_MID, VERSION,
};
use crate::{Error, NodeIdentity, Uuid};

/// Version 1 UUID, built from a 60-bit Gregorian timestamp, a clock sequence and a node id.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          time_low                             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |       time_mid                |  ver  |       time_hi         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |var|  clock_seq_hi |  clock_seq_low  |         node (0-1)        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         node (2-5)                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct V1 {
    pub(crate) msb: u64,
    pub(crate) lsb: u64,
}

impl V1 {
    /// Generates a UUID from the process-wide node identity and clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdentityUnavailable`] if the process-wide node identity cannot be
    /// derived. Use [`V1::next_for`] with an explicit identity to avoid this path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::V1;
    ///
    /// let a = V1::next()?;
    /// let b = V1::next()?;
    /// assert!(a.timestamp() < b.timestamp());
    /// # Ok::<(), rfc4122::Error>(())
    /// ```
    pub fn next() -> Result<Self, Error> {
        Ok(Self::next_for(NodeIdentity::current()?))
    }

    /// Generates a UUID for `node` from the process-wide clock.
    pub fn next_for(node: &NodeIdentity) -> Self {
        Self::next_core(node, MonotonicClock::global())
    }

    /// Generates a UUID for `node` from a timestamp taken from `ticks`.
    ///
    /// Uniqueness of the generated UUIDs relies on `ticks` never returning the same value twice
    /// for the same node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::{NodeIdentity, TickSource, V1};
    ///
    /// struct Fixed;
    /// impl TickSource for Fixed {
    ///     fn next_tick(&self) -> u64 {
    ///         0x01e1_3b9f_2e4a_c000
    ///     }
    /// }
    ///
    /// let node = NodeIdentity::new(0x1234, 0x0102_0304_0506);
    /// let uuid = V1::next_core(&node, Fixed);
    /// assert_eq!(uuid.to_string(), "2e4ac000-3b9f-11e1-9234-010203040506");
    /// ```
    pub fn next_core<T: TickSource>(node: &NodeIdentity, ticks: T) -> Self {
        let timestamp = ticks.next_tick();
        let msb = MSB_TIME_LOW.write(
            MSB_TIME_MID.write(
                VERSION.write(TIME_HIGH.read(timestamp), 1),
                TIME_MID.read(timestamp),
            ),
            TIME_LOW.read(timestamp),
        );

        let clock_sequence = node.clock_sequence() as u64;
        let clock_seq_hi_and_reserved = CLOCK_SEQ_HIGH_AND_RESERVED.read(
            CLOCK_SEQ_RESERVED.write(clock_sequence, RFC_4122_VARIANT),
        );
        let lsb = LSB_BYTE_56.write(
            LSB_BYTE_48.write(node.node_id(), CLOCK_SEQ_LOW.read(clock_sequence)),
            clock_seq_hi_and_reserved,
        );

        Self { msb, lsb }
    }

    /// Returns the 60-bit count of 100-nanosecond intervals since 1582-10-15.
    pub const fn timestamp(&self) -> u64 {
        TIME_HIGH.write(
            TIME_MID.write(MSB_TIME_LOW.read(self.msb), MSB_TIME_MID.read(self.msb)),
            MSB_TIME_HIGH.read(self.msb),
        )
    }

    /// Returns the timestamp converted to milliseconds since the Unix epoch. Timestamps before the
    /// Unix epoch saturate to zero.
    pub const fn unix_ts_ms(&self) -> u64 {
        self.timestamp().saturating_sub(GREGORIAN_OFFSET_TICKS) / 10_000
    }

    /// Returns the 14-bit clock sequence.
    pub const fn clock_sequence(&self) -> u16 {
        LSB_CLOCK_SEQ.read(self.lsb) as u16
    }

    /// Returns the 48-bit node id.
    pub const fn node_id(&self) -> u64 {
        LSB_NODE.read(self.lsb)
    }

    /// Returns the `time_low` field (32 bits).
    pub const fn time_low(&self) -> u32 {
        TIME_LOW.read(self.timestamp()) as u32
    }

    /// Returns the `time_mid` field (16 bits).
    pub const fn time_mid(&self) -> u16 {
        TIME_MID.read(self.timestamp()) as u16
    }

    /// Returns the `time_hi` field without the version (12 bits).
    pub const fn time_high(&self) -> u16 {
        TIME_HIGH.read(self.timestamp()) as u16
    }

    /// Returns the `clock_seq_low` field (8 bits).
    pub const fn clock_seq_low(&self) -> u8 {
        CLOCK_SEQ_LOW.read(self.clock_sequence() as u64) as u8
    }

    /// Returns the `clock_seq_hi` field without the variant (6 bits).
    pub const fn clock_seq_high(&self) -> u8 {
        CLOCK_SEQ_HIGH.read(self.clock_sequence() as u64) as u8
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

/// Orders by timestamp and then by the least significant 64 bits.
impl Ord for V1 {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.timestamp()
            .cmp(&other.timestamp())
            .then_with(|| self.lsb.cmp(&other.lsb))
    }
}

impl PartialOrd for V1 {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for V1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Uuid::from(*self), f)
    }
}

#[cfg(test)]
mod tests {
    use super::V1;
    use crate::clock::{to_gregorian, MonotonicClock, TickSource, TimeSource};
    use crate::{NodeIdentity, Uuid, Variant};
    use std::sync::atomic::{AtomicU64, Ordering};

    const N_SAMPLES: usize = 50_000;
    const NODE: NodeIdentity = NodeIdentity::new(0x2abc, 0x0123_4567_89ab);

    thread_local!(static SAMPLES: Vec<V1> = (0..N_SAMPLES).map(|_| V1::next_for(&NODE)).collect());

    struct Fixed(u64);

    impl TickSource for Fixed {
        fn next_tick(&self) -> u64 {
            self.0
        }
    }

    /// Encodes prepared cases correctly
    #[test]
    fn encodes_prepared_cases_correctly() {
        let cases = [
            (
                (0, 0, 0),
                "00000000-0000-1000-8000-000000000000",
            ),
            (
                ((1 << 60) - 1, 0x3fff, 0xffff_ffff_ffff),
                "ffffffff-ffff-1fff-bfff-ffffffffffff",
            ),
            (
                (0x01e1_3b9f_2e4a_c000, 0x1234, 0x0102_0304_0506),
                "2e4ac000-3b9f-11e1-9234-010203040506",
            ),
            (
                (0x01d1_9dad_6ba7_b810, 0x00b4, 0x00c0_4fd4_30c8),
                "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            ),
        ];

        for ((ts, seq, node), text) in cases {
            let e = V1::next_core(&NodeIdentity::new(seq, node), Fixed(ts));
            assert_eq!(e.to_string(), text);
            assert_eq!(e.timestamp(), ts);
            assert_eq!(e.clock_sequence(), seq);
            assert_eq!(e.node_id(), node);
            assert_eq!(Uuid::from(e), text.parse::<Uuid>().unwrap());
        }
    }

    /// Decodes the fields of the DNS name space
    #[test]
    fn decodes_the_fields_of_the_dns_name_space() {
        let e = Uuid::NAMESPACE_DNS.as_v1().copied().unwrap();
        assert_eq!(e.time_low(), 0x6ba7_b810);
        assert_eq!(e.time_mid(), 0x9dad);
        assert_eq!(e.time_high(), 0x1d1);
        assert_eq!(e.clock_seq_high(), 0x00);
        assert_eq!(e.clock_seq_low(), 0xb4);
        assert_eq!(e.clock_sequence(), 0x00b4);
        assert_eq!(e.node_id(), 0x00c0_4fd4_30c8);
        assert_eq!(e.timestamp(), 0x01d1_9dad_6ba7_b810);
        assert_eq!(e.unix_ts_ms(), 886_630_433_151);
    }

    /// Uses only the lower 14 bits of the clock sequence
    #[test]
    fn uses_only_the_lower_14_bits_of_the_clock_sequence() {
        let e = V1::next_core(&NodeIdentity::new(0x7fff, 0), Fixed(0));
        assert_eq!(e.clock_sequence(), 0x3fff);
        assert_eq!(e.clock_seq_high(), 0x3f);
        assert_eq!(e.clock_seq_low(), 0xff);
        assert_eq!(Uuid::from(e).variant(), Variant::Var10);
    }

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-1[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(&e.to_string()));
            }
        });
    }

    /// Generates 50k identifiers without collision
    #[test]
    fn generates_50k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&V1> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable UUIDs by creation time
    #[test]
    fn generates_sortable_uuids_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
                assert!(Uuid::from(samples[i - 1]) < Uuid::from(samples[i]));
            }
        });
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        SAMPLES.with(|samples| {
            for e in samples {
                let e = Uuid::from(*e);
                assert_eq!(e.variant(), Variant::Var10);
                assert_eq!(e.version(), 1);
                assert!(e.is_v1());
            }
        });
    }

    /// Keeps node identity in every UUID
    #[test]
    fn keeps_node_identity_in_every_uuid() {
        SAMPLES.with(|samples| {
            for e in samples {
                assert_eq!(e.node_id(), NODE.node_id());
                assert_eq!(e.clock_sequence(), NODE.clock_sequence());
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let e = V1::next_for(&NODE);
            assert!((ts_now - e.unix_ts_ms() as i64).abs() < 16);
        }
    }

    /// Generates distinct UUIDs from a stalled wall clock
    #[test]
    fn generates_distinct_uuids_from_a_stalled_wall_clock() {
        struct Stalled(AtomicU64);
        impl TimeSource for Stalled {
            fn unix_ts_ms(&self) -> u64 {
                // moves on only after being read many times
                0x0123_4567_89ab + self.0.fetch_add(1, Ordering::Relaxed) / 5_000
            }
        }

        let clock = MonotonicClock::new(Stalled(AtomicU64::new(0)));
        let first = V1::next_core(&NODE, &clock);
        assert_eq!(first.timestamp(), to_gregorian(0x0123_4567_89ab, 0));
        let mut prev = first;
        for _ in 0..3_000 {
            let curr = V1::next_core(&NODE, &clock);
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Generates no duplicates under multithreading
    #[test]
    fn generates_no_duplicates_under_multithreading() -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        let before = crate::clock::monotonic();
                        let e = V1::next_for(&NODE);
                        assert!(e.timestamp() > before);
                        tx.send(e).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }

    /// Generates from the process-wide node identity
    #[test]
    fn generates_from_the_process_wide_node_identity() {
        let node = NodeIdentity::current().unwrap();
        let e = V1::next().unwrap();
        assert_eq!(e.node_id(), node.node_id());
        assert_eq!(e.node_id() & 1, 1);
        assert_eq!(e.clock_sequence(), node.clock_sequence() & 0x3fff);
    }
}
