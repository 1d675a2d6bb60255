//! Bootstrap node entries

use crate::error::{ConfigError, ConfigResult};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

const ENODE_PREFIX: &str = "enode://";

/// Parsed `enode://<node id>@<ip>:<port>` entry
#[derive(Clone, PartialEq, Eq)]
pub struct BootNode {
    /// Uncompressed secp256k1 public key without the 0x04 prefix
    pub id: [u8; 64],
    /// TCP endpoint
    pub addr: SocketAddr,
}

impl BootNode {
    /// Hex form of the node id
    pub fn id_hex(&self) -> String {
        hex::encode(self.id)
    }
}

impl fmt::Debug for BootNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BootNode({})", self)
    }
}

impl fmt::Display for BootNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}@{}", ENODE_PREFIX, self.id_hex(), self.addr)
    }
}

impl FromStr for BootNode {
    type Err = ConfigError;

    fn from_str(entry: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidBootNode {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        let rest = entry
            .trim()
            .strip_prefix(ENODE_PREFIX)
            .ok_or_else(|| invalid("missing enode:// scheme"))?;
        let (id_hex, host) = rest
            .split_once('@')
            .ok_or_else(|| invalid("missing '@' between node id and address"))?;

        let bytes = hex::decode(id_hex).map_err(|e| invalid(&format!("node id: {}", e)))?;
        let id: [u8; 64] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| invalid(&format!("node id is {} bytes, expected 64", b.len())))?;

        // discovery port override is not used
        let host = host.split('?').next().unwrap_or(host);
        let addr = host
            .parse::<SocketAddr>()
            .map_err(|e| invalid(&format!("address: {}", e)))?;

        Ok(BootNode { id, addr })
    }
}
