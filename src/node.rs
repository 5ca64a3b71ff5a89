//! Node identity for time-based UUIDs.

use std::collections::HashSet;
use std::env;
use std::net::{IpAddr, ToSocketAddrs};

use mac_address::MacAddressIterator;
use md5::{Digest, Md5};
use once_cell::sync::OnceCell;
use rand::Rng;

use crate::Error;

/// The `node` and `clock_seq` pair embedded in every [`V1`](crate::V1) UUID.
///
/// The default identity is derived once per process by [`NodeIdentity::current`]. Instead of a
/// real IEEE 802 address, the node id is a hash of host data with the multicast bit set, as
/// RFC 4122 section 4.5 recommends for hosts that do not expose a MAC address.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeIdentity {
    clock_sequence: u16,
    node_id: u64,
}

impl NodeIdentity {
    /// Largest clock sequence value (15 bits).
    pub const MAX_CLOCK_SEQUENCE: u16 = 0x7fff;

    /// Largest node id value (48 bits).
    pub const MAX_NODE_ID: u64 = 0xffff_ffff_ffff;

    /// Creates an identity from caller-supplied values, discarding bits that do not fit in a
    /// 15-bit clock sequence or a 48-bit node id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rfc4122::NodeIdentity;
    ///
    /// let node = NodeIdentity::new(0x1234, 0x0102_0304_0506);
    /// assert_eq!(node.clock_sequence(), 0x1234);
    /// assert_eq!(node.node_id(), 0x0102_0304_0506);
    /// ```
    pub const fn new(clock_sequence: u16, node_id: u64) -> Self {
        Self {
            clock_sequence: clock_sequence & Self::MAX_CLOCK_SEQUENCE,
            node_id: node_id & Self::MAX_NODE_ID,
        }
    }

    /// Returns the process-wide identity, deriving it from [`SystemHost`] on first use.
    ///
    /// Concurrent first callers all observe the same instance. A failed initialization is not
    /// cached, so a later call retries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdentityUnavailable`] if the host data cannot be collected.
    pub fn current() -> Result<&'static NodeIdentity, Error> {
        static CURRENT: OnceCell<NodeIdentity> = OnceCell::new();
        CURRENT.get_or_try_init(|| Self::from_host(&SystemHost))
    }

    /// Derives an identity from the descriptors reported by `host`, drawing a random clock
    /// sequence.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`HostSource::descriptors`].
    pub fn from_host<H: HostSource + ?Sized>(host: &H) -> Result<Self, Error> {
        let descriptors = host.descriptors()?;
        let node_id = fingerprint(&descriptors);
        let clock_sequence = rand::thread_rng().gen_range(0..=Self::MAX_CLOCK_SEQUENCE);
        tracing::debug!(
            node_id = format_args!("{node_id:012x}"),
            clock_sequence,
            descriptors = descriptors.len(),
            "derived node identity"
        );
        Ok(Self::new(clock_sequence, node_id))
    }

    /// Returns the 15-bit clock sequence.
    pub const fn clock_sequence(&self) -> u16 {
        self.clock_sequence
    }

    /// Returns the 48-bit node id.
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }
}

/// A source of strings describing the host, hashed into the default node id.
pub trait HostSource {
    /// Returns the host descriptors. Order matters; duplicates are ignored.
    fn descriptors(&self) -> Result<Vec<String>, Error>;
}

/// The default [`HostSource`]: runtime descriptors, the host name, the addresses it resolves
/// to and the hardware addresses of the network interfaces.
///
/// Collection fails with [`Error::NodeIdentityUnavailable`] when the host name does not resolve,
/// when the interfaces cannot be enumerated, or when neither yields an address.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SystemHost;

impl HostSource for SystemHost {
    fn descriptors(&self) -> Result<Vec<String>, Error> {
        describe(&OsNetwork)
    }
}

/// Network lookups behind [`SystemHost`].
trait Network {
    fn host_name(&self) -> String;

    fn resolve(&self, host_name: &str) -> Result<Vec<IpAddr>, Error>;

    fn hardware_addresses(&self) -> Result<Vec<String>, Error>;
}

struct OsNetwork;

impl Network for OsNetwork {
    fn host_name(&self) -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }

    fn resolve(&self, host_name: &str) -> Result<Vec<IpAddr>, Error> {
        let addrs = (host_name, 0)
            .to_socket_addrs()
            .map_err(|err| unavailable(format!("could not resolve host {host_name:?}: {err}")))?;
        Ok(addrs.map(|e| e.ip()).collect())
    }

    fn hardware_addresses(&self) -> Result<Vec<String>, Error> {
        let interfaces = MacAddressIterator::new()
            .map_err(|err| unavailable(format!("could not enumerate network interfaces: {err}")))?;
        Ok(interfaces.map(|e| e.to_string()).collect())
    }
}

fn describe<N: Network + ?Sized>(network: &N) -> Result<Vec<String>, Error> {
    let mut descriptors: Vec<String> = [
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env::consts::FAMILY,
        env::consts::OS,
        env::consts::ARCH,
    ]
    .iter()
    .map(|e| (*e).to_owned())
    .collect();

    let host_name = network.host_name();
    let addrs = network.resolve(&host_name)?;
    let hardware_addresses = network.hardware_addresses()?;
    if addrs.is_empty() && hardware_addresses.is_empty() {
        return Err(unavailable(format!(
            "no network address found for host {host_name:?}"
        )));
    }
    tracing::trace!(
        host_name = %host_name,
        addrs = addrs.len(),
        hardware_addresses = hardware_addresses.len(),
        "collected host descriptors"
    );

    descriptors.extend(addrs.iter().map(|e| format!("{host_name}/{e}")));
    descriptors.push(host_name);
    descriptors.extend(hardware_addresses.iter().map(|e| format!("mac {e}")));
    Ok(descriptors)
}

fn unavailable(reason: String) -> Error {
    Error::NodeIdentityUnavailable { reason }
}

/// Hashes the distinct `descriptors` into a 48-bit node id with the multicast bit set.
fn fingerprint(descriptors: &[String]) -> u64 {
    let mut seen = HashSet::new();
    let mut hasher = Md5::new();
    for e in descriptors {
        if seen.insert(e.as_str()) {
            hasher.update(e.as_bytes());
        }
    }
    let digest = hasher.finalize();
    u64::from_be_bytes([
        0,
        0,
        digest[0],
        digest[1],
        digest[2],
        digest[3],
        digest[4],
        digest[5] | 0x01,
    ])
}
