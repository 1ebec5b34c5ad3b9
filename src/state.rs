// SPDX-License-Identifier: GPL-3.0-only

//! Key-value state that persists between application runs.
//!
//! The widget stores its last position and its theme under fixed keys. In the
//! application the values live in the cosmic_config state directory of
//! [`APP_ID`](crate::app_settings::APP_ID); tests and headless runs use an
//! in-memory map with the same semantics.

use std::collections::HashMap;

use cosmic::cosmic_config::{self, ConfigGet, ConfigSet};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::theme::Theme;
use crate::window::Position;

/// Key of the persisted horizontal window position.
pub const WINDOW_X: &str = "windowX";

/// Key of the persisted vertical window position.
pub const WINDOW_Y: &str = "windowY";

/// Key of the persisted theme name.
pub const THEME: &str = "theme";

/// Version of the state schema.
pub const STATE_VERSION: u64 = 1;

/// Errors raised while writing state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The cosmic_config backend failed.
    #[error("state backend error: {0}")]
    Backend(String),
    /// The value could not be converted.
    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

enum Backend {
    Memory(HashMap<String, serde_json::Value>),
    Cosmic(cosmic_config::Config),
}

/// Process-wide key-value store.
pub struct KvStore {
    backend: Backend,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::Memory(map) => format!("memory ({} keys)", map.len()),
            Backend::Cosmic(_) => "cosmic_config".to_string(),
        };
        f.debug_struct("KvStore").field("backend", &backend).finish()
    }
}

impl KvStore {
    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(HashMap::new()),
        }
    }

    /// Opens the cosmic_config state entry of `app_id`.
    pub fn open(app_id: &str) -> Result<Self, StoreError> {
        let config = cosmic_config::Config::new_state(app_id, STATE_VERSION)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            backend: Backend::Cosmic(config),
        })
    }

    /// Opens the state of `app_id`, falling back to memory on failure.
    pub fn open_or_memory(app_id: &str) -> Self {
        Self::open(app_id).unwrap_or_else(|e| {
            tracing::warn!("Failed to open state store, positions won't persist: {}", e);
            Self::in_memory()
        })
    }

    /// Reads `key`, returning `default` when missing or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match &self.backend {
            Backend::Memory(map) => map
                .get(key)
                .and_then(|value| serde_json::from_value(value.clone()).ok())
                .unwrap_or(default),
            Backend::Cosmic(config) => config.get(key).unwrap_or(default),
        }
    }

    /// Writes `value` under `key`.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        match &mut self.backend {
            Backend::Memory(map) => {
                map.insert(key.to_string(), serde_json::to_value(value)?);
                Ok(())
            }
            Backend::Cosmic(config) => config
                .set(key, value)
                .map_err(|e| StoreError::Backend(e.to_string())),
        }
    }

    // ========================================================================
    // Typed Accessors
    // ========================================================================

    /// Last persisted window position, or `default` if none was saved.
    pub fn position(&self, default: Position) -> Position {
        Position::new(self.get(WINDOW_X, default.x), self.get(WINDOW_Y, default.y))
    }

    /// Persists a window position. Failures are logged, not returned.
    pub fn save_position(&mut self, position: Position) {
        let result = self
            .set(WINDOW_X, position.x)
            .and_then(|()| self.set(WINDOW_Y, position.y));
        match result {
            Ok(()) => tracing::debug!("Window position saved: ({}, {})", position.x, position.y),
            Err(e) => tracing::warn!("Failed to save window position: {}", e),
        }
    }

    /// Persisted theme, or the default theme.
    pub fn theme(&self) -> Theme {
        let name: String = self.get(THEME, Theme::default().as_str().to_string());
        Theme::from_name_or_default(&name)
    }

    /// Persists the theme by name.
    pub fn save_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.set(THEME, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: missing keys yield the provided default.
    #[test]
    fn test_get_missing_returns_default() {
        let store = KvStore::in_memory();
        assert_eq!(store.get(WINDOW_X, 42), 42);
        assert_eq!(store.get(THEME, "dark".to_string()), "dark");
    }

    /// Test: values written with set are read back.
    #[test]
    fn test_set_then_get() {
        let mut store = KvStore::in_memory();
        store.set(WINDOW_X, 1820).unwrap();
        store.set(WINDOW_Y, -40).unwrap();
        assert_eq!(store.get(WINDOW_X, 0), 1820);
        assert_eq!(store.get(WINDOW_Y, 0), -40);
    }

    /// Test: a value of the wrong type falls back to the default.
    #[test]
    fn test_type_mismatch_returns_default() {
        let mut store = KvStore::in_memory();
        store.set(WINDOW_X, "left").unwrap();
        assert_eq!(store.get(WINDOW_X, 7), 7);
    }

    /// Test: position accessors use the windowX/windowY keys.
    #[test]
    fn test_position_accessors() {
        let mut store = KvStore::in_memory();
        let default = Position::new(1820, 980);
        assert_eq!(store.position(default), default);

        store.save_position(Position::new(20, 500));
        assert_eq!(store.position(default), Position::new(20, 500));
        assert_eq!(store.get(WINDOW_X, 0), 20);
        assert_eq!(store.get(WINDOW_Y, 0), 500);
    }

    /// Test: the theme is stored by name and unknown names fall back.
    #[test]
    fn test_theme_accessors() {
        let mut store = KvStore::in_memory();
        assert_eq!(store.theme(), Theme::Dark);

        store.save_theme(Theme::Nebula).unwrap();
        assert_eq!(store.get(THEME, String::new()), "nebula");
        assert_eq!(store.theme(), Theme::Nebula);

        store.set(THEME, "sepia").unwrap();
        assert_eq!(store.theme(), Theme::Dark);
    }
}
