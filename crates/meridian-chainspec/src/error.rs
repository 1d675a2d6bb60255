//! Chain configuration errors

use meridian_primitives::BlockNumber;
use thiserror::Error;

/// Chain configuration error.
///
/// Every variant is fatal to initialisation; the `Display` output is the
/// diagnostic shown to operators.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Descriptor is not valid JSON or does not match the schema
    #[error("failed to parse chain descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    /// Descriptor file could not be read
    #[error("failed to read chain descriptor: {0}")]
    Io(#[from] std::io::Error),

    /// A fork has an empty name
    #[error("fork at index {index} has an empty name")]
    EmptyForkName {
        /// Position in the fork list
        index: usize,
    },

    /// Two forks share a name
    #[error("duplicate fork name '{0}'")]
    DuplicateFork(String),

    /// Activation blocks decrease
    #[error("fork '{name}' at block {block} is ordered after '{previous}' at block {previous_block}")]
    ForkOrder {
        /// Offending fork
        name: String,
        /// Its activation block
        block: BlockNumber,
        /// Fork listed before it
        previous: String,
        /// That fork's activation block
        previous_block: BlockNumber,
    },

    /// Feature identifier is not one of the known ids
    #[error("fork '{fork}' defines unknown feature '{id}'")]
    UnknownFeature {
        /// Fork defining the feature
        fork: String,
        /// The unrecognised identifier
        id: String,
    },

    /// A feature is defined twice within one fork
    #[error("fork '{fork}' defines feature '{id}' more than once")]
    DuplicateFeature {
        /// Fork defining the feature
        fork: String,
        /// Repeated identifier
        id: String,
    },

    /// Required option is absent
    #[error("feature '{feature}' in fork '{fork}' is missing option '{key}'")]
    MissingOption {
        /// Fork defining the feature
        fork: String,
        /// Feature identifier
        feature: String,
        /// Missing option key
        key: String,
    },

    /// Option present but of the wrong type or value
    #[error("feature '{feature}' in fork '{fork}' has malformed option '{key}': {reason}")]
    MalformedOption {
        /// Fork defining the feature
        fork: String,
        /// Feature identifier
        feature: String,
        /// Option key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Bootstrap node entry could not be parsed
    #[error("invalid bootstrap node '{entry}': {reason}")]
    InvalidBootNode {
        /// The raw entry
        entry: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type for chain configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_order_display() {
        let err = ConfigError::ForkOrder {
            name: "Diehard".into(),
            block: 10,
            previous: "Gotham".into(),
            previous_block: 20,
        };
        assert_eq!(
            err.to_string(),
            "fork 'Diehard' at block 10 is ordered after 'Gotham' at block 20"
        );
    }

    #[test]
    fn test_unknown_feature_display() {
        let err = ConfigError::UnknownFeature {
            fork: "Homestead".into(),
            id: "warp".into(),
        };
        assert_eq!(err.to_string(), "fork 'Homestead' defines unknown feature 'warp'");
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(err.to_string().starts_with("failed to parse chain descriptor"));
    }
}
