//! Game settings and tunables
//!
//! Persisted separately from game saves, under the game's storage namespace.

use serde::{Deserialize, Serialize};

use crate::consts::UPDATE_DELAY_MS;
use crate::input::JoystickConfig;
use crate::persistence::{KeyValueStore, Storage};
use crate::sim::Environment;

/// Tunables shared by both games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logic tick period in milliseconds
    pub update_delay_ms: u32,

    // === Simulation ===
    pub environment: Environment,
    /// Recentre drawing on the player entity
    pub follow_player: bool,

    // === Input ===
    pub joystick: JoystickConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_delay_ms: UPDATE_DELAY_MS,
            environment: Environment::default(),
            follow_player: false,
            joystick: JoystickConfig::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Load from storage, falling back to defaults
    pub fn load<S: KeyValueStore>(storage: &Storage<S>) -> Self {
        let json = storage.read(Self::STORAGE_KEY, "");
        if json.is_empty() {
            log::info!("Using default settings");
            return Self::default();
        }

        match serde_json::from_str::<Self>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore>(&self, storage: &mut Storage<S>) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.store(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// A zero tick period would spin the host loop
    fn sanitized(mut self) -> Self {
        if self.update_delay_ms == 0 {
            self.update_delay_ms = UPDATE_DELAY_MS;
        }
        if !(self.joystick.max_length.is_finite() && self.joystick.max_length > 0.0) {
            self.joystick.max_length = JoystickConfig::default().max_length;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn storage() -> Storage<MemoryStore> {
        Storage::new("arcade", MemoryStore::new())
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.update_delay_ms, 10);
        assert_eq!(s.environment.friction, -0.08);
        assert_eq!(s.joystick.max_length, 30.0);
        assert!(!s.follow_player);
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        assert_eq!(Settings::load(&storage()), Settings::default());
    }

    #[test]
    fn test_malformed_settings_use_defaults() {
        let mut s = storage();
        s.store("settings", "[1, 2");
        assert_eq!(Settings::load(&s), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut s = storage();
        s.store("settings", r#"{"follow_player": true, "environment": {"gravity": 0.2}}"#);
        let loaded = Settings::load(&s);
        assert!(loaded.follow_player);
        assert_eq!(loaded.environment.gravity, 0.2);
        assert_eq!(loaded.environment.friction, -0.08);
        assert_eq!(loaded.update_delay_ms, 10);
    }

    #[test]
    fn test_zero_tick_period_is_replaced() {
        let mut s = storage();
        s.store("settings", r#"{"update_delay_ms": 0}"#);
        assert_eq!(Settings::load(&s).update_delay_ms, 10);
    }

    #[test]
    fn test_save_then_load() {
        let mut s = storage();
        let mut settings = Settings::default();
        settings.joystick.sensitivity = 0.75;
        settings.follow_player = true;
        settings.save(&mut s);
        assert_eq!(Settings::load(&s), settings);
    }
}
