//! Chain descriptors and the built-in networks

use crate::bootnode::BootNode;
use crate::config::ChainConfig;
use crate::error::ConfigResult;
use crate::fork::feature_ids;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAINNET_JSON: &str = include_str!("../res/mainnet.json");
const MORDOR_JSON: &str = include_str!("../res/mordor.json");

/// On-disk chain descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainSpecFile {
    identity: String,
    name: String,
    #[serde(default = "default_network")]
    network: u64,
    #[serde(default)]
    forks: ChainConfig,
    #[serde(default)]
    bootstrap: Vec<String>,
}

fn default_network() -> u64 {
    1
}

/// A validated chain: identity, fork schedule and bootstrap nodes
#[derive(Debug, Clone)]
pub struct ChainSpec {
    /// Short identifier (`mainnet`, `mordor`)
    pub identity: String,
    /// Display name
    pub name: String,
    /// Network id used in the wire handshake
    pub network: u64,
    /// Fork schedule
    pub config: ChainConfig,
    /// Parsed bootstrap nodes
    pub bootstrap: Vec<BootNode>,
}

impl ChainSpec {
    /// Parse and validate a JSON descriptor
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let file: ChainSpecFile = serde_json::from_str(json)?;
        Self::from_file_contents(file)
    }

    /// Read, parse and validate a JSON descriptor from disk
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let spec = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded chain spec '{}' from {}",
            spec.identity,
            path.as_ref().display()
        );
        Ok(spec)
    }

    /// Ethereum Classic mainnet
    pub fn mainnet() -> ConfigResult<Self> {
        Self::from_json(MAINNET_JSON)
    }

    /// Mordor testnet
    pub fn mordor() -> ConfigResult<Self> {
        Self::from_json(MORDOR_JSON)
    }

    /// Built-in network by identity
    pub fn by_identity(identity: &str) -> Option<ConfigResult<Self>> {
        match identity {
            "mainnet" => Some(Self::mainnet()),
            "mordor" => Some(Self::mordor()),
            _ => None,
        }
    }

    /// Chain id from the last `eip155` definition in the schedule
    pub fn chain_id(&self) -> Option<u64> {
        self.config
            .forks()
            .iter()
            .rev()
            .find_map(|fork| fork.feature(feature_ids::EIP155))
            .and_then(|feature| feature.int_option("chainID"))
    }

    fn from_file_contents(file: ChainSpecFile) -> ConfigResult<Self> {
        file.forks.validate()?;
        let bootstrap = file
            .bootstrap
            .iter()
            .map(|entry| entry.parse())
            .collect::<ConfigResult<Vec<BootNode>>>()?;

        tracing::info!(
            "Chain spec '{}' ({}): {} forks, {} bootstrap nodes",
            file.identity,
            file.name,
            file.forks.forks().len(),
            bootstrap.len()
        );

        Ok(ChainSpec {
            identity: file.identity,
            name: file.name,
            network: file.network,
            config: file.forks,
            bootstrap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_minimal_descriptor_defaults() {
        let spec = ChainSpec::from_json(r#"{"identity":"dev","name":"Dev"}"#).unwrap();
        assert_eq!(spec.network, 1);
        assert!(spec.config.forks().is_empty());
        assert!(spec.bootstrap.is_empty());
        assert_eq!(spec.chain_id(), None);
    }

    #[test]
    fn test_descriptor_rejects_bad_json() {
        assert!(matches!(
            ChainSpec::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_descriptor_rejects_negative_block() {
        let json = r#"{"identity":"dev","name":"Dev","forks":[{"name":"Homestead","block":-1}]}"#;
        assert!(matches!(ChainSpec::from_json(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_descriptor_rejects_bad_bootnode() {
        let json = r#"{"identity":"dev","name":"Dev","bootstrap":["enode://zz@1.2.3.4:1"]}"#;
        assert!(matches!(
            ChainSpec::from_json(json),
            Err(ConfigError::InvalidBootNode { .. })
        ));
    }

    #[test]
    fn test_descriptor_validates_schedule() {
        let json = r#"{"identity":"dev","name":"Dev","forks":[
            {"name":"A","block":5},{"name":"B","block":1}]}"#;
        assert!(matches!(
            ChainSpec::from_json(json),
            Err(ConfigError::ForkOrder { .. })
        ));
    }

    #[test]
    fn test_by_identity() {
        assert!(ChainSpec::by_identity("mainnet").is_some());
        assert!(ChainSpec::by_identity("mordor").is_some());
        assert!(ChainSpec::by_identity("ropsten").is_none());
    }
}
