//! Filter configuration module.
//!
//! Sizing defaults used by the `hoku create` command when no sizing flags are
//! given on the command line.

use super::{ConfigResult, Validate};
use crate::data_structures::hoku_bloom_filter::{
    HokuBloomFilterConfig, MAX_HASH_COUNT, MAX_ITEM_COUNT,
};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Bloom filter sizing configuration.
///
/// When both `size_bytes` and `hash_count` are set the filter is sized
/// explicitly and `false_positive_rate` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Number of elements the filter is designed for
    pub expected_items: u32,

    /// Target false positive rate in (0, 1]
    pub false_positive_rate: f64,

    /// Explicit size of the bit store in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,

    /// Explicit number of probes per element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_count: Option<usize>,

    /// Largest bit store the command is allowed to allocate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_memory_bytes: Option<u64>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            expected_items: 100_000,
            false_positive_rate: 0.01,
            size_bytes: None,
            hash_count: None,
            max_memory_bytes: None,
        }
    }
}

impl FilterSettings {
    /// Build the filter configuration these settings describe.
    pub fn to_filter_config(&self) -> HokuBloomFilterConfig {
        let config = HokuBloomFilterConfig::new().with_expected_items(self.expected_items);
        let config = match (self.size_bytes, self.hash_count) {
            (Some(size_bytes), Some(hash_count)) => config.with_explicit_size(size_bytes, hash_count),
            _ => config.with_false_positive_rate(self.false_positive_rate),
        };

        match self.max_memory_bytes {
            Some(limit) => config.with_max_memory_bytes(limit),
            None => config,
        }
    }
}

impl Validate for FilterSettings {
    fn validate(&self) -> ConfigResult<()> {
        if self.expected_items > MAX_ITEM_COUNT {
            return Err(ConfigError::ValueOutOfRange {
                key: "filter.expected_items".to_string(),
                message: format!("must be at most {MAX_ITEM_COUNT}"),
            });
        }

        match (self.size_bytes, self.hash_count) {
            (Some(size_bytes), Some(hash_count)) => {
                if size_bytes == 0 {
                    return Err(ConfigError::ValidationError(
                        "filter.size_bytes must be greater than 0".to_string(),
                    ));
                }
                if hash_count == 0 || hash_count > MAX_HASH_COUNT {
                    return Err(ConfigError::ValueOutOfRange {
                        key: "filter.hash_count".to_string(),
                        message: format!("must be between 1 and {MAX_HASH_COUNT}"),
                    });
                }
            }
            (None, None) => {
                if self.expected_items == 0 {
                    return Err(ConfigError::ValidationError(
                        "filter.expected_items must be greater than 0".to_string(),
                    ));
                }
                if !(self.false_positive_rate > 0.0 && self.false_positive_rate <= 1.0) {
                    return Err(ConfigError::ValueOutOfRange {
                        key: "filter.false_positive_rate".to_string(),
                        message: "must be greater than 0.0 and at most 1.0".to_string(),
                    });
                }
            }
            _ => {
                return Err(ConfigError::ValidationError(
                    "filter.size_bytes and filter.hash_count must be set together".to_string(),
                ))
            }
        }

        if self.max_memory_bytes == Some(0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "filter.max_memory_bytes".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
