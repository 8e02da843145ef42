//! # PMOTv Configuration Module
//!
//! This crate provides configuration management for PMOTv, including:
//! - An embedded default configuration (every key has a default)
//! - Merging with an optional external `config.yaml`
//! - Environment variable overrides
//! - Typed getters for configuration values
//! - Thread-safe singleton access pattern
//!
//! Crate-specific settings (channel loader, playback controller) are exposed
//! through extension traits implemented on [`Config`] by the crates that own
//! them.
//!
//! ## Usage
//!
//! ```no_run
//! use pmotvconfig::get_config;
//!
//! let config = get_config();
//! println!("{}", config.get_app_title());
//! ```
//!
//! ## Environment overrides
//!
//! Any variable named `PMOTV_CONFIG__<SECTION>__<KEY>` overrides the matching
//! path, e.g. `PMOTV_CONFIG__CHANNEL__TENANT_NAME=acme` sets
//! `channel.tenant_name`. Values are parsed as YAML so `false` or `42` keep
//! their type.

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{debug, info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmotv.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load PMOTv configuration"));
}

const ENV_CONFIG_DIR: &str = "PMOTV_CONFIG";
const ENV_PREFIX: &str = "PMOTV_CONFIG__";
const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_APP_TITLE: &str = "TV Channel";
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";

/// Macro to generate getter/setter for string values with default
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            self.get_string_or($path, $default)
        }

        pub fn $setter(&self, value: impl Into<String>) -> Result<()> {
            self.set_value($path, Value::String(value.into()))
        }
    };
}

/// Configuration manager for PMOTv
///
/// Values live in memory only: the client reads `config.yaml` but never
/// writes it back.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        Self {
            config_dir: self.config_dir.clone(),
            data: Mutex::new(self.lock().clone()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: String::new(),
            data: Mutex::new(Self::defaults()),
        }
    }
}

impl Config {
    /// Finds the config directory by trying different locations in order
    ///
    /// 1. The provided `directory` if not empty
    /// 2. The `PMOTV_CONFIG` environment variable
    /// 3. `.pmotv` in the current directory
    /// 4. `.pmotv` in the user's home directory
    fn find_config_dir(directory: &str) -> String {
        if !directory.is_empty() {
            return directory.to_string();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return env_path;
        }

        if Path::new(".pmotv").exists() {
            return ".pmotv".to_string();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(".pmotv");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        ".pmotv".to_string()
    }

    fn defaults() -> Value {
        serde_yaml::from_str(DEFAULT_CONFIG).unwrap_or(Value::Mapping(Mapping::new()))
    }

    /// Loads the configuration
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the embedded default configuration
    /// 3. Merges it with `config.yaml` from that directory when present
    /// 4. Applies `PMOTV_CONFIG__*` environment overrides
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        let path = Path::new(&config_dir).join(CONFIG_FILE);

        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        match fs::read(&path) {
            Ok(data) => {
                info!(config_file = %path.display(), "Loaded config file");
                let external: Value = serde_yaml::from_slice(&data)?;
                Self::merge_external(&mut value, external);
            }
            Err(_) => {
                debug!(config_file = %path.display(), "Config file not found, using embedded defaults");
            }
        }

        let config = Config {
            config_dir,
            data: Mutex::new(Self::lower_keys_value(value)),
        };
        config.apply_overrides(env::vars());
        Ok(config)
    }

    /// Builds a configuration from a YAML document merged over the defaults
    ///
    /// No file and no environment variable is consulted.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut value = Self::defaults();
        let external: Value = serde_yaml::from_str(yaml)?;
        Self::merge_external(&mut value, external);
        Ok(Config {
            config_dir: String::new(),
            data: Mutex::new(value),
        })
    }

    /// Merges a user document over the defaults. An empty document (`Null`) is a no-op.
    fn merge_external(value: &mut Value, external: Value) {
        if !external.is_null() {
            merge_yaml(value, &Self::lower_keys_value(external));
        }
    }

    /// Directory the configuration was looked up in
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Applies `PMOTV_CONFIG__A__B=value` style overrides
    ///
    /// Variables without the prefix are ignored.
    pub fn apply_overrides<I, K, V>(&self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut data = self.lock();
        for (key, value) in vars {
            let key = key.as_ref();
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(value.as_ref());
                if let Err(err) = Self::set_value_internal(&mut data, &key_path, yaml_value) {
                    warn!(variable = key, error = %err, "Ignoring configuration override");
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["channel", "tenant_name"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.lock();
        Self::set_value_internal(&mut data, path, value)
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                match map.get(&Value::String(key.to_lowercase())) {
                    Some(next) => current = next,
                    None => return Err(anyhow!("Path {} does not exist", path[..=i].join("."))),
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    /// Deserializes the value at `path` into `T`
    pub fn get_typed<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        Ok(serde_yaml::from_value(self.get_value(path)?)?)
    }

    /// Gets a non-empty string at `path`, or `default`
    pub fn get_string_or(&self, path: &[&str], default: &str) -> String {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s,
            Ok(Value::Number(n)) => n.to_string(),
            Ok(Value::String(_)) | Ok(Value::Null) | Err(_) => default.to_string(),
            Ok(_) => {
                warn!(path = %path.join("."), "Expected a string, using default {}", default);
                default.to_string()
            }
        }
    }

    /// Gets a boolean at `path`, or `default`
    pub fn get_bool_or(&self, path: &[&str], default: bool) -> bool {
        match self.get_value(path) {
            Ok(Value::Bool(b)) => b,
            Ok(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => {
                    warn!(path = %path.join("."), value = %s, "Invalid boolean, using default {}", default);
                    default
                }
            },
            _ => default,
        }
    }

    /// Gets an unsigned integer at `path`, or `default`
    pub fn get_u64_or(&self, path: &[&str], default: u64) -> u64 {
        match self.get_value(path) {
            Ok(Value::Number(n)) => match n.as_u64() {
                Some(v) => v,
                None => {
                    warn!(path = %path.join("."), "Negative or fractional number, using default {}", default);
                    default
                }
            },
            Ok(Value::String(s)) => s.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(path = %path.join("."), value = %s, "Invalid number, using default {}", default);
                default
            }),
            _ => default,
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    let key = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    new_map.insert(key, Self::lower_keys_value(v));
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    impl_string_config!(
        get_app_title,
        set_app_title,
        &["app", "title"],
        DEFAULT_APP_TITLE
    );

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["app", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );
}

/// Returns the global configuration instance
///
/// Lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges `external` into `default`
///
/// Mappings are merged key by key; scalars and sequences replace.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
