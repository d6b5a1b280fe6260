//! Hub configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the [`SessionHub`](crate::SessionHub).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Capacity of each match's command queue. When a queue is full,
    /// callers wait: this is the backpressure on a busy match.
    pub command_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { command_buffer: 64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_default() {
        assert_eq!(HubConfig::default().command_buffer, 64);
    }

    #[test]
    fn test_hub_config_missing_fields_use_defaults() {
        let config: HubConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HubConfig::default());

        let config: HubConfig = serde_json::from_str(r#"{"command_buffer":8}"#).unwrap();
        assert_eq!(config.command_buffer, 8);
    }
}
