//! Typed views over the feature-selected consensus rules

use meridian_primitives::{BlockNumber, Gas};

/// Gas prices for the IO-heavy operations repriced over the fork history
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasTable {
    /// EXTCODESIZE
    pub ext_code_size: Gas,
    /// EXTCODECOPY base cost
    pub ext_code_copy: Gas,
    /// BALANCE
    pub balance: Gas,
    /// SLOAD
    pub sload: Gas,
    /// CALL, CALLCODE, DELEGATECALL base cost
    pub calls: Gas,
    /// SELFDESTRUCT
    pub suicide: Gas,
    /// Per byte of an EXP exponent
    pub exp_byte: Gas,
    /// Added to SELFDESTRUCT when it creates the beneficiary account
    pub create_by_suicide: Option<Gas>,
}

impl GasTable {
    /// Frontier and Homestead prices
    pub const HOMESTEAD: GasTable = GasTable {
        ext_code_size: 20,
        ext_code_copy: 20,
        balance: 20,
        sload: 50,
        calls: 40,
        suicide: 0,
        exp_byte: 10,
        create_by_suicide: None,
    };

    /// EIP-150 repricing
    pub const EIP150: GasTable = GasTable {
        ext_code_size: 700,
        ext_code_copy: 700,
        balance: 400,
        sload: 200,
        calls: 700,
        suicide: 5000,
        exp_byte: 10,
        create_by_suicide: Some(25000),
    };

    /// EIP-160 raises the EXP byte price on top of EIP-150
    pub const EIP160: GasTable = GasTable {
        exp_byte: 50,
        ..GasTable::EIP150
    };

    pub(crate) fn from_type(kind: &str) -> Option<GasTable> {
        match kind {
            "homestead" => Some(GasTable::HOMESTEAD),
            "eip150" => Some(GasTable::EIP150),
            "eip160" => Some(GasTable::EIP160),
            _ => None,
        }
    }
}

/// Difficulty adjustment algorithm in force at a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyAlgorithm {
    /// Original algorithm with the exponential bomb
    Frontier,
    /// EIP-2 adjustment
    Homestead,
    /// Bomb paused for `length` blocks from the activating fork
    Ecip1010 {
        /// Block the pause starts at
        start: BlockNumber,
        /// Pause length
        length: u64,
    },
    /// Bomb removed
    Defused,
    /// Uncle-aware adjustment
    Eip100,
}

impl DifficultyAlgorithm {
    pub(crate) fn from_options(kind: &str, start: BlockNumber, length: Option<u64>) -> Option<Self> {
        match kind {
            "homestead" => Some(DifficultyAlgorithm::Homestead),
            "ecip1010" => length.map(|length| DifficultyAlgorithm::Ecip1010 { start, length }),
            "defused" => Some(DifficultyAlgorithm::Defused),
            "eip100" => Some(DifficultyAlgorithm::Eip100),
            _ => None,
        }
    }
}

/// Block reward schedule in force at a block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardSchedule {
    /// Fixed reward
    Frontier,
    /// Reward reduced by a fifth every `era` blocks
    Ecip1017 {
        /// Era length in blocks
        era: u64,
    },
}

impl RewardSchedule {
    /// Zero-based era index of `block` (always zero for the fixed schedule)
    pub fn era_index(&self, block: BlockNumber) -> u64 {
        match self {
            RewardSchedule::Frontier => 0,
            RewardSchedule::Ecip1017 { era } if *era > 0 => block.saturating_sub(1) / era,
            RewardSchedule::Ecip1017 { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gas_table_lookup() {
        assert_eq!(GasTable::from_type("homestead"), Some(GasTable::HOMESTEAD));
        assert_eq!(GasTable::from_type("eip150"), Some(GasTable::EIP150));
        assert_eq!(GasTable::from_type("frontier"), None);
    }

    #[test]
    fn test_eip160_only_changes_exp() {
        assert_eq!(GasTable::EIP160.exp_byte, 50);
        assert_eq!(
            GasTable {
                exp_byte: 10,
                ..GasTable::EIP160
            },
            GasTable::EIP150
        );
    }

    #[test]
    fn test_difficulty_ecip1010_requires_length() {
        assert_eq!(DifficultyAlgorithm::from_options("ecip1010", 3_000_000, None), None);
        assert_eq!(
            DifficultyAlgorithm::from_options("ecip1010", 3_000_000, Some(2_000_000)),
            Some(DifficultyAlgorithm::Ecip1010 {
                start: 3_000_000,
                length: 2_000_000
            })
        );
    }

    #[test]
    fn test_era_index() {
        let schedule = RewardSchedule::Ecip1017 { era: 5_000_000 };
        assert_eq!(schedule.era_index(1), 0);
        assert_eq!(schedule.era_index(5_000_000), 0);
        assert_eq!(schedule.era_index(5_000_001), 1);
        assert_eq!(RewardSchedule::Frontier.era_index(10_000_000), 0);
    }
}
