//! TOML-based tuning configuration.
//!
//! Stores every gesture's pacing knobs:
//! - Fill/decay rates for the hold days
//! - Drag distance, completion threshold and resistance
//! - Trace zone and staged word thresholds
//! - Proximity radii, separation and merge gap
//! - Tap convergence rates
//! - Patience window and tick interval
//!
//! Configuration is stored at `~/.config/valentine-week/config.toml`.
//! Progress itself is never persisted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::days::DayPreset;
use crate::engine::{
    DragConfig, HoldConfig, SingleBodyConfig, TapConfig, TraceConfig, TwoBodyConfig,
};
use crate::error::ConfigError;
use crate::patience::PatienceConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldPresets {
    #[serde(default = "HoldConfig::propose")]
    pub propose: HoldConfig,
    #[serde(default = "HoldConfig::hug")]
    pub hug: HoldConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPresets {
    #[serde(default = "DragConfig::chocolate")]
    pub chocolate: DragConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracePresets {
    #[serde(default)]
    pub promise: TraceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityPresets {
    #[serde(default)]
    pub kiss: TwoBodyConfig,
    #[serde(default)]
    pub teddy: SingleBodyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapPresets {
    #[serde(default = "TapConfig::valentine")]
    pub valentine: TapConfig,
    #[serde(default = "TapConfig::rose")]
    pub rose: TapConfig,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/valentine-week/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interval of the shared tick source.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub patience: PatienceConfig,
    #[serde(default)]
    pub hold: HoldPresets,
    #[serde(default)]
    pub drag: DragPresets,
    #[serde(default)]
    pub trace: TracePresets,
    #[serde(default)]
    pub proximity: ProximityPresets,
    #[serde(default)]
    pub tap: TapPresets,
}

fn default_tick_ms() -> u64 {
    25
}

impl Default for HoldPresets {
    fn default() -> Self {
        Self {
            propose: HoldConfig::propose(),
            hug: HoldConfig::hug(),
        }
    }
}

impl Default for DragPresets {
    fn default() -> Self {
        Self {
            chocolate: DragConfig::chocolate(),
        }
    }
}

impl Default for TapPresets {
    fn default() -> Self {
        Self {
            valentine: TapConfig::valentine(),
            rose: TapConfig::rose(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            patience: PatienceConfig::default(),
            hold: HoldPresets::default(),
            drag: DragPresets::default(),
            trace: TracePresets::default(),
            proximity: ProximityPresets::default(),
            tap: TapPresets::default(),
        }
    }
}

/// Returns `~/.config/valentine-week[-dev]/` based on VALENTINE_ENV.
///
/// Set VALENTINE_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("VALENTINE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("valentine-week-dev")
    } else {
        base_dir.join("valentine-week")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(e.to_string()))?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or fails validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg = Self::from_toml_str(&content).map_err(|message| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message,
                })?;
                cfg.validate()?;
                debug!(path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Parse a config file, laying it over the defaults so a partial
    /// section keeps the rest of its own preset.
    fn from_toml_str(content: &str) -> Result<Self, String> {
        let overrides: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
        let mut merged = toml::Value::try_from(Self::default()).map_err(|e| e.to_string())?;
        merge_toml(&mut merged, overrides);
        merged.try_into().map_err(|e: toml::de::Error| e.to_string())
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is invalid,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reveal delay configured for a day's interaction.
    pub fn reveal_delay_ms(&self, preset: DayPreset) -> u64 {
        match preset {
            DayPreset::Rose => self.tap.rose.reveal_delay_ms,
            DayPreset::Propose => self.hold.propose.reveal_delay_ms,
            DayPreset::Chocolate => self.drag.chocolate.reveal_delay_ms,
            DayPreset::Teddy => self.proximity.teddy.reveal_delay_ms,
            DayPreset::Promise => self.trace.promise.reveal_delay_ms,
            DayPreset::Hug => self.hold.hug.reveal_delay_ms,
            DayPreset::Kiss => self.proximity.kiss.reveal_delay_ms,
            DayPreset::Valentine => self.tap.valentine.reveal_delay_ms,
        }
    }

    /// Reject values that would stall or break an engine.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be at least 1"));
        }
        if self.patience.window_ms == 0 {
            return Err(invalid("patience.window_ms", "must be at least 1"));
        }
        for (name, hold) in [("hold.propose", &self.hold.propose), ("hold.hug", &self.hold.hug)] {
            positive(&format!("{name}.fill_per_tick"), hold.fill_per_tick)?;
            positive(&format!("{name}.decay_per_tick"), hold.decay_per_tick)?;
        }

        let chocolate = &self.drag.chocolate;
        positive("drag.chocolate.max_distance", chocolate.max_distance)?;
        threshold("drag.chocolate.complete_threshold", chocolate.complete_threshold)?;
        if let Some(resistance) = &chocolate.resistance {
            positive("drag.chocolate.resistance.speed_threshold", resistance.speed_threshold)?;
            threshold("drag.chocolate.resistance.fast_multiplier", resistance.fast_multiplier)?;
        }

        let promise = &self.trace.promise;
        positive("trace.promise.zone_width", promise.zone_width)?;
        threshold("trace.promise.complete_threshold", promise.complete_threshold)?;
        if promise.word_thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(invalid("trace.promise.word_thresholds", "must be ascending"));
        }

        let kiss = &self.proximity.kiss;
        positive("proximity.kiss.max_radius", kiss.max_radius)?;
        positive("proximity.kiss.separation", kiss.separation)?;
        threshold("proximity.kiss.merge_gap_ratio", kiss.merge_gap_ratio)?;
        positive("proximity.kiss.approach_factor", kiss.approach_factor)?;

        let teddy = &self.proximity.teddy;
        positive("proximity.teddy.max_radius", teddy.max_radius)?;
        positive("proximity.teddy.capture_radius", teddy.capture_radius)?;

        positive("tap.valentine.rate_per_tick", self.tap.valentine.rate_per_tick)?;
        positive("tap.rose.rate_per_tick", self.tap.rose.rate_per_tick)?;
        if self.tap.rose.options == 0 {
            return Err(invalid("tap.rose.options", "must offer at least one rose"));
        }
        Ok(())
    }
}

fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, "must be a positive number"))
    }
}

fn threshold(key: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(key, "must be in (0, 1]"))
    }
}
