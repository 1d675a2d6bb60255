//! Feature registry

use crate::error::{ConfigError, ConfigResult};
use crate::fork::{feature_ids, fork_names, Feature, Fork};
use crate::selection::{DifficultyAlgorithm, GasTable, RewardSchedule};
use meridian_primitives::BlockNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered fork schedule.
///
/// Immutable once validated and shared by reference between the consensus
/// components that consult it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainConfig {
    forks: Vec<Fork>,
}

impl ChainConfig {
    /// Build and validate a schedule
    pub fn new(forks: Vec<Fork>) -> ConfigResult<Self> {
        let config = Self { forks };
        config.validate()?;
        Ok(config)
    }

    /// All forks in schedule order
    pub fn forks(&self) -> &[Fork] {
        &self.forks
    }

    /// Look up a fork by exact name
    pub fn fork_by_name(&self, name: &str) -> Option<&Fork> {
        self.forks.iter().find(|f| f.name == name)
    }

    /// Definition of feature `id` in force at `block`.
    ///
    /// Picks the latest fork activated at or before `block` that defines the
    /// feature. A later definition replaces the earlier one entirely; options
    /// are never merged across forks.
    pub fn get_feature(&self, block: BlockNumber, id: &str) -> Option<(&Feature, &Fork)> {
        self.forks
            .iter()
            .rev()
            .filter(|fork| fork.is_active(block))
            .find_map(|fork| fork.feature(id).map(|feature| (feature, fork)))
    }

    /// Check if the named fork exists and is active at `block`
    pub fn is_fork_active(&self, name: &str, block: BlockNumber) -> bool {
        self.fork_by_name(name)
            .is_some_and(|fork| fork.is_active(block))
    }

    /// Homestead rules
    pub fn is_homestead(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::HOMESTEAD, block)
    }

    /// DAO fork
    pub fn is_dao_fork(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::DAO, block)
    }

    /// EIP-150 repricing
    pub fn is_gas_reprice(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::GAS_REPRICE, block)
    }

    /// Diehard
    pub fn is_diehard(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::DIEHARD, block)
    }

    /// Gotham
    pub fn is_gotham(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::GOTHAM, block)
    }

    /// Difficulty bomb removed
    pub fn is_defused(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::DEFUSE, block)
    }

    /// Atlantis: empty-touch suppression, contract size limit, nonce-1 creation
    pub fn is_atlantis(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::ATLANTIS, block)
    }

    /// Agharta
    pub fn is_agharta(&self, block: BlockNumber) -> bool {
        self.is_fork_active(fork_names::AGHARTA, block)
    }

    /// Gas table in force at `block`
    pub fn gas_table(&self, block: BlockNumber) -> GasTable {
        self.get_feature(block, feature_ids::GAS_TABLE)
            .and_then(|(feature, _)| feature.str_option("type"))
            .and_then(GasTable::from_type)
            .unwrap_or(GasTable::HOMESTEAD)
    }

    /// Difficulty algorithm in force at `block`
    pub fn difficulty_algorithm(&self, block: BlockNumber) -> DifficultyAlgorithm {
        self.get_feature(block, feature_ids::DIFFICULTY)
            .and_then(|(feature, fork)| {
                let kind = feature.str_option("type")?;
                DifficultyAlgorithm::from_options(kind, fork.block, feature.int_option("length"))
            })
            .unwrap_or(DifficultyAlgorithm::Frontier)
    }

    /// Reward schedule in force at `block`
    pub fn reward_schedule(&self, block: BlockNumber) -> RewardSchedule {
        self.get_feature(block, feature_ids::REWARD)
            .and_then(|(feature, _)| feature.int_option("era"))
            .map(|era| RewardSchedule::Ecip1017 { era })
            .unwrap_or(RewardSchedule::Frontier)
    }

    /// Replay-protection chain id in force at `block`
    pub fn chain_id(&self, block: BlockNumber) -> Option<u64> {
        self.get_feature(block, feature_ids::EIP155)
            .and_then(|(feature, _)| feature.int_option("chainID"))
    }

    /// Check schedule ordering, fork names and every feature definition.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        let mut previous: Option<&Fork> = None;

        for (index, fork) in self.forks.iter().enumerate() {
            if fork.name.trim().is_empty() {
                return Err(ConfigError::EmptyForkName { index });
            }
            if !names.insert(fork.name.as_str()) {
                return Err(ConfigError::DuplicateFork(fork.name.clone()));
            }
            if let Some(prev) = previous {
                if fork.block < prev.block {
                    return Err(ConfigError::ForkOrder {
                        name: fork.name.clone(),
                        block: fork.block,
                        previous: prev.name.clone(),
                        previous_block: prev.block,
                    });
                }
            }

            let mut ids = HashSet::new();
            for feature in &fork.features {
                if !ids.insert(feature.id.as_str()) {
                    return Err(ConfigError::DuplicateFeature {
                        fork: fork.name.clone(),
                        id: feature.id.clone(),
                    });
                }
                feature.validate(&fork.name)?;
            }
            previous = Some(fork);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fork::OptionValue;

    fn gastable(kind: &str) -> Feature {
        Feature::new("gastable").with_option("type", OptionValue::Str(kind.into()))
    }

    fn schedule() -> ChainConfig {
        ChainConfig::new(vec![
            Fork::new("Homestead", 100).with_feature(gastable("homestead")),
            Fork::new("The DAO Hard Fork", 150),
            Fork::new("GasReprice", 200).with_feature(gastable("eip150")),
            Fork::new("Diehard", 300)
                .with_feature(gastable("eip160"))
                .with_feature(Feature::new("eip155").with_option("chainID", OptionValue::Int(61))),
        ])
        .unwrap()
    }

    // ==================== Lookup ====================

    #[test]
    fn test_get_feature_before_any_definition() {
        assert!(schedule().get_feature(99, "gastable").is_none());
    }

    #[test]
    fn test_get_feature_picks_latest_active() {
        let config = schedule();
        let (feature, fork) = config.get_feature(250, "gastable").unwrap();
        assert_eq!(fork.name, "GasReprice");
        assert_eq!(feature.str_option("type"), Some("eip150"));

        let (_, fork) = config.get_feature(300, "gastable").unwrap();
        assert_eq!(fork.name, "Diehard");
    }

    #[test]
    fn test_get_feature_skips_forks_without_definition() {
        let config = schedule();
        let (_, fork) = config.get_feature(160, "gastable").unwrap();
        assert_eq!(fork.name, "Homestead");
    }

    #[test]
    fn test_later_definition_shadows_wholesale() {
        let config = ChainConfig::new(vec![
            Fork::new("A", 0).with_feature(
                Feature::new("difficulty")
                    .with_option("type", OptionValue::Str("ecip1010".into()))
                    .with_option("length", OptionValue::Int(2_000_000)),
            ),
            Fork::new("B", 10).with_feature(
                Feature::new("difficulty").with_option("type", OptionValue::Str("defused".into())),
            ),
        ])
        .unwrap();
        let (feature, _) = config.get_feature(10, "difficulty").unwrap();
        assert_eq!(feature.int_option("length"), None);
        assert_eq!(config.difficulty_algorithm(10), DifficultyAlgorithm::Defused);
        assert_eq!(
            config.difficulty_algorithm(9),
            DifficultyAlgorithm::Ecip1010 {
                start: 0,
                length: 2_000_000
            }
        );
    }

    #[test]
    fn test_same_block_forks_later_entry_wins() {
        let config = ChainConfig::new(vec![
            Fork::new("A", 0).with_feature(gastable("homestead")),
            Fork::new("B", 0).with_feature(gastable("eip150")),
        ])
        .unwrap();
        let (_, fork) = config.get_feature(0, "gastable").unwrap();
        assert_eq!(fork.name, "B");
    }

    #[test]
    fn test_fork_by_name() {
        let config = schedule();
        assert_eq!(config.fork_by_name("Diehard").map(|f| f.block), Some(300));
        assert!(config.fork_by_name("diehard").is_none());
    }

    // ==================== Predicates ====================

    #[test]
    fn test_predicates() {
        let config = schedule();
        assert!(!config.is_homestead(99));
        assert!(config.is_homestead(100));
        assert!(config.is_dao_fork(150));
        assert!(config.is_gas_reprice(200));
        assert!(!config.is_diehard(299));
        assert!(config.is_diehard(300));
    }

    #[test]
    fn test_absent_fork_never_active() {
        let config = schedule();
        assert!(!config.is_atlantis(u64::MAX));
        assert!(!config.is_gotham(u64::MAX));
        assert!(!config.is_fork_active("Nonexistent", u64::MAX));
    }

    // ==================== Selections ====================

    #[test]
    fn test_gas_table_selection() {
        let config = schedule();
        assert_eq!(config.gas_table(0), GasTable::HOMESTEAD);
        assert_eq!(config.gas_table(200), GasTable::EIP150);
        assert_eq!(config.gas_table(1_000), GasTable::EIP160);
    }

    #[test]
    fn test_chain_id_selection() {
        let config = schedule();
        assert_eq!(config.chain_id(299), None);
        assert_eq!(config.chain_id(300), Some(61));
    }

    #[test]
    fn test_reward_schedule_default() {
        assert_eq!(schedule().reward_schedule(1_000), RewardSchedule::Frontier);
    }

    // ==================== Validation ====================

    #[test]
    fn test_validate_rejects_decreasing_blocks() {
        let err = ChainConfig::new(vec![Fork::new("B", 10), Fork::new("A", 5)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "fork 'A' at block 5 is ordered after 'B' at block 10"
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let err = ChainConfig::new(vec![Fork::new("A", 0), Fork::new("A", 5)]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFork(name) if name == "A"));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let err = ChainConfig::new(vec![Fork::new("A", 0), Fork::new(" ", 5)]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyForkName { index: 1 }));
    }

    #[test]
    fn test_validate_rejects_duplicate_feature() {
        let err = ChainConfig::new(vec![Fork::new("A", 0)
            .with_feature(gastable("eip150"))
            .with_feature(gastable("eip160"))])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFeature { .. }));
    }

    #[test]
    fn test_empty_schedule_is_valid() {
        let config = ChainConfig::new(Vec::new()).unwrap();
        assert!(config.get_feature(0, "gastable").is_none());
        assert!(!config.is_homestead(0));
    }
}
