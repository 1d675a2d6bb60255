//! # meridian-chainspec
//!
//! Hard-fork schedule and feature registry.
//!
//! A chain is described by an ordered list of [`Fork`]s, each activating at a
//! block number and carrying named, parameterised [`Feature`]s. Consensus
//! code asks [`ChainConfig::get_feature`] which definition of a feature is in
//! force at a block, or uses one of the typed selections built on it
//! ([`ChainConfig::gas_table`], [`ChainConfig::difficulty_algorithm`],
//! [`ChainConfig::reward_schedule`]).
//!
//! [`ChainSpec`] wraps a configuration with its network identity and
//! bootstrap nodes, and ships the built-in `mainnet` and `mordor` networks.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bootnode;
mod config;
mod error;
mod fork;
mod selection;
mod spec;

pub use bootnode::BootNode;
pub use config::ChainConfig;
pub use error::{ConfigError, ConfigResult};
pub use fork::{feature_ids, fork_names, Feature, Fork, OptionValue};
pub use selection::{DifficultyAlgorithm, GasTable, RewardSchedule};
pub use spec::ChainSpec;
