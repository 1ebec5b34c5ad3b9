// SPDX-License-Identifier: GPL-3.0-only

use cosmic::cosmic_config;
use cosmic::cosmic_config::{cosmic_config_derive::CosmicConfigEntry, CosmicConfigEntry};

use crate::app_settings::{CLICK_GRACE_MS, SETTLE_DELAY_MS, SNAP_PADDING};

/// User configuration that persists between application runs.
#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq)]
#[version = 1]
pub struct Config {
    /// Distance between a snapped ball and the screen edge, in pixels.
    pub snap_padding: i32,
    /// Delay between a collapse and the automatic snap, in milliseconds.
    pub settle_delay_ms: u64,
    /// How long after a drag a click on the ball is still swallowed.
    pub click_grace_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snap_padding: SNAP_PADDING,
            settle_delay_ms: SETTLE_DELAY_MS,
            click_grace_ms: CLICK_GRACE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostSettings;
    use std::time::Duration;

    /// Test: defaults match the built-in constants.
    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.snap_padding, 20);
        assert_eq!(config.settle_delay_ms, 100);
        assert_eq!(config.click_grace_ms, 100);
    }

    /// Test: host settings are derived from the config.
    #[test]
    fn test_host_settings_from_config() {
        let config = Config {
            snap_padding: 8,
            settle_delay_ms: 250,
            ..Config::default()
        };
        let settings = HostSettings::from(&config);
        assert_eq!(settings.snap_padding, 8);
        assert_eq!(settings.settle_delay, Duration::from_millis(250));
        assert_eq!(HostSettings::from(&Config::default()), HostSettings::default());
    }
}
