//! Widget settings and their schema
//!
//! Values live in a host-owned key/value store. The widget registers a schema
//! on initialization, validates every write against it, and reads a
//! [`Settings`] snapshot once per render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::consts::{DEFAULT_ICON, DEFAULT_UNIT_SIZE, MAX_UNIT_SIZE, MIN_UNIT_SIZE, MODULE_ID};
use crate::error::{HeartError, Result};

/// Setting keys
pub mod keys {
    pub const VALUE_PATH: &str = "attribute.value.path";
    pub const MAX_PATH: &str = "attribute.max.path";
    pub const TEMP_PATH: &str = "attribute.temp.path";
    pub const TEMP_MAX_PATH: &str = "attribute.tempMax.path";
    pub const UNIT_SIZE: &str = "unitSize";
    pub const ICON: &str = "iconGlyph";
    pub const ENABLED: &str = "widgetEnabled";
    pub const VISIBLE: &str = "widgetVisible";
}

/// Where a setting is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Shared by every client of the installation
    World,
    /// Local to this client
    Client,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::World => "world",
            Scope::Client => "client",
        }
    }
}

/// Value type accepted by a setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingKind {
    Bool,
    /// Whole number within an inclusive range
    Integer { min: i64, max: i64 },
    Text,
}

/// Schema entry for one setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDef {
    pub key: &'static str,
    pub scope: Scope,
    pub kind: SettingKind,
    pub default: Value,
    /// Shown in the host settings menu
    pub config: bool,
    /// Changes only apply after the host reloads
    pub requires_reload: bool,
    /// Localization keys for the menu entry
    pub name: Option<&'static str>,
    pub hint: Option<&'static str>,
}

impl SettingDef {
    fn new(key: &'static str, scope: Scope, kind: SettingKind, default: Value) -> Self {
        Self {
            key,
            scope,
            kind,
            default,
            config: true,
            requires_reload: false,
            name: None,
            hint: None,
        }
    }

    fn labelled(mut self, name: &'static str, hint: &'static str) -> Self {
        self.name = Some(name);
        self.hint = Some(hint);
        self
    }

    /// Check `value` against the schema, returning its normalized form
    pub fn validate(&self, value: &Value) -> Result<Value> {
        let invalid = |reason: String| HeartError::InvalidSetting {
            key: self.key.to_string(),
            reason,
        };
        match self.kind {
            SettingKind::Bool => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(invalid(format!("expected a boolean, got {other}"))),
            },
            SettingKind::Integer { min, max } => {
                let n = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| invalid(format!("expected a number, got {value}")))?;
                if n.fract() != 0.0 {
                    return Err(invalid(format!("{n} is not a whole number")));
                }
                if n < min as f64 || n > max as f64 {
                    return Err(invalid(format!("{n} is outside {min}..={max}")));
                }
                Ok(json!(n as i64))
            }
            SettingKind::Text => match value {
                Value::String(s) => Ok(Value::String(s.trim().to_string())),
                other => Err(invalid(format!("expected a string, got {other}"))),
            },
        }
    }
}

/// Registered setting schema
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    defs: Vec<SettingDef>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self { defs: Vec::new() }
    }

    /// Registry holding every setting the widget uses
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for def in default_schema() {
            registry.register(def);
        }
        registry
    }

    /// Add or replace a definition
    pub fn register(&mut self, def: SettingDef) {
        log::debug!("Registering setting {}.{} ({})", MODULE_ID, def.key, def.scope.as_str());
        match self.defs.iter_mut().find(|d| d.key == def.key) {
            Some(existing) => *existing = def,
            None => self.defs.push(def),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SettingDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Read a setting, falling back to its default when missing or invalid
    pub fn read(&self, store: &dyn SettingsStore, key: &str) -> Result<Value> {
        let def = self
            .get(key)
            .ok_or_else(|| HeartError::UnknownSetting(key.to_string()))?;
        let Some(raw) = store.get(def.scope, key)? else {
            return Ok(def.default.clone());
        };
        let parsed: Value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        match def.validate(&parsed) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("{}, using default {}", e, def.default);
                Ok(def.default.clone())
            }
        }
    }

    /// Validate and persist a setting
    pub fn write(&self, store: &mut dyn SettingsStore, key: &str, value: Value) -> Result<()> {
        let def = self
            .get(key)
            .ok_or_else(|| HeartError::UnknownSetting(key.to_string()))?;
        let value = def.validate(&value)?;
        store.set(def.scope, key, &serde_json::to_string(&value)?)?;
        if def.requires_reload {
            log::info!("Setting {} changed, reload to apply", key);
        }
        Ok(())
    }
}

fn default_schema() -> Vec<SettingDef> {
    let path = |key: &'static str, field: &str, name: &'static str, hint: &'static str| {
        SettingDef::new(key, Scope::World, SettingKind::Text, json!(format!("hp.{field}")))
            .labelled(name, hint)
    };
    vec![
        path(
            keys::VALUE_PATH,
            "value",
            "HEART_CONTAINERS.SettingsPathNameValue",
            "HEART_CONTAINERS.SettingsPathNameValueHint",
        ),
        path(
            keys::MAX_PATH,
            "max",
            "HEART_CONTAINERS.SettingsPathNameMax",
            "HEART_CONTAINERS.SettingsPathNameMaxHint",
        ),
        path(
            keys::TEMP_PATH,
            "temp",
            "HEART_CONTAINERS.SettingsPathNameTemp",
            "HEART_CONTAINERS.SettingsPathNameTempHint",
        ),
        path(
            keys::TEMP_MAX_PATH,
            "tempmax",
            "HEART_CONTAINERS.SettingsPathNameTempmax",
            "HEART_CONTAINERS.SettingsPathNameTempmaxHint",
        ),
        SettingDef::new(
            keys::ICON,
            Scope::World,
            SettingKind::Text,
            json!(DEFAULT_ICON),
        )
        .labelled(
            "HEART_CONTAINERS.SettingsFontAwesomeIcon",
            "HEART_CONTAINERS.SettingsFontAwesomeIconHint",
        ),
        SettingDef {
            config: false,
            ..SettingDef::new(keys::VISIBLE, Scope::Client, SettingKind::Bool, json!(true))
        },
        SettingDef {
            requires_reload: true,
            ..SettingDef::new(keys::ENABLED, Scope::Client, SettingKind::Bool, json!(true))
                .labelled(
                    "HEART_CONTAINERS.SettingsEnableHeartContainers",
                    "HEART_CONTAINERS.SettingsEnableHeartContainersHint",
                )
        },
        SettingDef::new(
            keys::UNIT_SIZE,
            Scope::Client,
            SettingKind::Integer {
                min: MIN_UNIT_SIZE as i64,
                max: MAX_UNIT_SIZE as i64,
            },
            json!(DEFAULT_UNIT_SIZE),
        )
        .labelled(
            "HEART_CONTAINERS.SettingsContainerSize",
            "HEART_CONTAINERS.SettingsContainerSizeHint",
        ),
    ]
}

/// Host-owned key/value store holding serialized setting values
pub trait SettingsStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>>;
    fn set(&mut self, scope: Scope, key: &str, raw: &str) -> Result<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<(Scope, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(&(scope, key.to_string())).cloned())
    }

    fn set(&mut self, scope: Scope, key: &str, raw: &str) -> Result<()> {
        self.values.insert((scope, key.to_string()), raw.to_string());
        Ok(())
    }
}

/// Dotted paths to hit point attributes on a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePaths {
    pub value: String,
    pub max: String,
    pub temp: String,
    pub temp_max: String,
}

impl Default for AttributePaths {
    fn default() -> Self {
        Self {
            value: "hp.value".to_string(),
            max: "hp.max".to_string(),
            temp: "hp.temp".to_string(),
            temp_max: "hp.tempmax".to_string(),
        }
    }
}

/// Snapshot of every widget setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub paths: AttributePaths,
    /// Hit points per heart
    pub unit_size: u32,
    /// Icon glyph class
    pub icon: String,
    /// Widget is created at all (reload required)
    pub enabled: bool,
    /// Hearts are expanded rather than collapsed behind the toggle
    pub visible: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: AttributePaths::default(),
            unit_size: DEFAULT_UNIT_SIZE,
            icon: DEFAULT_ICON.to_string(),
            enabled: true,
            visible: true,
        }
    }
}

impl Settings {
    /// Read a consistent snapshot from the store
    pub fn load(store: &dyn SettingsStore, registry: &SettingsRegistry) -> Result<Self> {
        let text = |key: &str| -> Result<String> {
            Ok(registry.read(store, key)?.as_str().unwrap_or_default().to_string())
        };
        let flag = |key: &str| -> Result<bool> { Ok(registry.read(store, key)?.as_bool().unwrap_or(true)) };

        let unit_size = registry
            .read(store, keys::UNIT_SIZE)?
            .as_u64()
            .map(|n| n as u32)
            .unwrap_or(DEFAULT_UNIT_SIZE);
        let icon = text(keys::ICON)?;

        Ok(Self {
            paths: AttributePaths {
                value: text(keys::VALUE_PATH)?,
                max: text(keys::MAX_PATH)?,
                temp: text(keys::TEMP_PATH)?,
                temp_max: text(keys::TEMP_MAX_PATH)?,
            },
            unit_size,
            icon: if icon.is_empty() { DEFAULT_ICON.to_string() } else { icon },
            enabled: flag(keys::ENABLED)?,
            visible: flag(keys::VISIBLE)?,
        })
    }
}
