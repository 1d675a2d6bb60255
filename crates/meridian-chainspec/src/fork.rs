//! Fork and feature data model

use crate::error::{ConfigError, ConfigResult};
use meridian_primitives::{BlockNumber, H256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Names of the forks the VM recognises through named predicates.
pub mod fork_names {
    /// Homestead
    pub const HOMESTEAD: &str = "Homestead";
    /// DAO recovery fork
    pub const DAO: &str = "The DAO Hard Fork";
    /// EIP-150 gas repricing
    pub const GAS_REPRICE: &str = "GasReprice";
    /// EIP-155/160 and the difficulty bomb delay
    pub const DIEHARD: &str = "Diehard";
    /// Monetary policy
    pub const GOTHAM: &str = "Gotham";
    /// Difficulty bomb removal
    pub const DEFUSE: &str = "Defuse Difficulty Bomb";
    /// Byzantium-equivalent rules
    pub const ATLANTIS: &str = "Atlantis";
    /// Constantinople/Petersburg-equivalent rules
    pub const AGHARTA: &str = "Agharta";
}

/// Feature identifiers accepted by validation.
pub mod feature_ids {
    /// Difficulty algorithm selection
    pub const DIFFICULTY: &str = "difficulty";
    /// Gas table selection
    pub const GAS_TABLE: &str = "gastable";
    /// Replay-protected signing, carries the chain id
    pub const EIP155: &str = "eip155";
    /// Block reward schedule
    pub const REWARD: &str = "reward";

    /// Every known identifier
    pub const ALL: &[&str] = &[DIFFICULTY, GAS_TABLE, EIP155, REWARD];
}

/// Typed feature option value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Unsigned integer
    Int(u64),
    /// String
    Str(String),
}

impl OptionValue {
    /// String content, if this is a string option
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            OptionValue::Int(_) => None,
        }
    }

    /// Integer content, if this is an integer option
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            OptionValue::Str(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A named, parameterised rule attached to a fork
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature identifier
    pub id: String,
    /// Option key to value
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl Feature {
    /// Feature with no options
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: BTreeMap::new(),
        }
    }

    /// Builder-style option insertion
    pub fn with_option(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Raw option lookup
    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// String option lookup
    pub fn str_option(&self, key: &str) -> Option<&str> {
        self.option(key).and_then(OptionValue::as_str)
    }

    /// Integer option lookup
    pub fn int_option(&self, key: &str) -> Option<u64> {
        self.option(key).and_then(OptionValue::as_u64)
    }

    /// Check identifier and option types against the known feature set
    pub(crate) fn validate(&self, fork: &str) -> ConfigResult<()> {
        let check = FeatureCheck { fork, feature: self };
        match self.id.as_str() {
            feature_ids::DIFFICULTY => {
                match check.string("type", &["homestead", "ecip1010", "defused", "eip100"])? {
                    "ecip1010" => check.integer("length").map(|_| ()),
                    _ => Ok(()),
                }
            }
            feature_ids::GAS_TABLE => check
                .string("type", &["homestead", "eip150", "eip160"])
                .map(|_| ()),
            feature_ids::EIP155 => check.integer("chainID").map(|_| ()),
            feature_ids::REWARD => {
                check.string("type", &["ecip1017"])?;
                let era = check.integer("era")?;
                if era == 0 {
                    return Err(check.malformed("era", "era length must be non-zero"));
                }
                Ok(())
            }
            _ => Err(ConfigError::UnknownFeature {
                fork: fork.to_string(),
                id: self.id.clone(),
            }),
        }
    }
}

struct FeatureCheck<'a> {
    fork: &'a str,
    feature: &'a Feature,
}

impl<'a> FeatureCheck<'a> {
    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingOption {
            fork: self.fork.to_string(),
            feature: self.feature.id.clone(),
            key: key.to_string(),
        }
    }

    fn malformed(&self, key: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::MalformedOption {
            fork: self.fork.to_string(),
            feature: self.feature.id.clone(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn string(&self, key: &str, allowed: &[&str]) -> ConfigResult<&'a str> {
        let value = self.feature.option(key).ok_or_else(|| self.missing(key))?;
        let s = value
            .as_str()
            .ok_or_else(|| self.malformed(key, format!("expected a string, got {}", value)))?;
        if !allowed.contains(&s) {
            return Err(self.malformed(
                key,
                format!("'{}' is not one of {}", s, allowed.join(", ")),
            ));
        }
        Ok(s)
    }

    fn integer(&self, key: &str) -> ConfigResult<u64> {
        let value = self.feature.option(key).ok_or_else(|| self.missing(key))?;
        value
            .as_u64()
            .ok_or_else(|| self.malformed(key, format!("expected an integer, got {}", value)))
    }
}

/// A named rule set activating at a block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fork {
    /// Fork name
    pub name: String,
    /// Activation block; zero means active from genesis
    pub block: BlockNumber,
    /// Block hash the chain must carry at the activation block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_hash: Option<H256>,
    /// Features in force from this fork on
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Fork {
    /// Fork with no features
    pub fn new(name: impl Into<String>, block: BlockNumber) -> Self {
        Self {
            name: name.into(),
            block,
            required_hash: None,
            features: Vec::new(),
        }
    }

    /// Builder-style feature insertion
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// This fork's own definition of `id`
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Check if the fork is active at `block`
    pub fn is_active(&self, block: BlockNumber) -> bool {
        self.block <= block
    }
}
