use crate::config::{BuildConfig, LoaderConfig};
use crate::constants::keys;
use crate::error::{ConfigError, Result};
use crate::graph::{Signature, Value};
use crate::logging::{LogConfig, LogFormat};
use crate::utils::error_helpers::{ParseErrorMapper, SerializeErrorMapper};
use crate::utils::file_io::{is_json_path, read_file_string, write_file_string};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Settings for the loader, the builder and logging, plus extra target declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Reserved key names inside target mappings
    #[serde(default)]
    pub keys: KeysSection,

    /// Document loading options
    #[serde(default)]
    pub loader: LoaderSection,

    /// Log output
    #[serde(default)]
    pub logging: LoggingSection,

    /// Targets registered on top of the built-in ones
    #[serde(default)]
    pub targets: Vec<TargetSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysSection {
    /// Key naming the constructor (default: "_target_")
    pub target: String,

    /// Key requesting a deferred call (default: "_partial_")
    pub partial: String,

    /// Key holding positional arguments (default: "_args_")
    pub args: String,

    /// Key disabling instantiation of nested targets (default: "_recursive_")
    pub recursive: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSection {
    /// Merge key (default: "<<")
    pub merge_key: String,

    /// Let a repeated key overwrite the earlier one instead of failing (default: false)
    pub allow_duplicate_keys: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// One of error, warn, info, debug, trace (default: "info")
    pub level: String,

    /// One of compact, pretty, json (default: "compact")
    pub format: String,
}

/// A target whose instances record their bound arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSection {
    pub name: String,

    /// Accept keyword arguments not listed in `params`
    #[serde(default)]
    pub variadic: bool,

    /// Other names resolving to the same constructor
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Parameters in positional order
    #[serde(default)]
    pub params: Vec<ParamSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSection {
    pub name: String,

    /// Without a default the parameter is required, unless `optional` is set
    /// in which case it defaults to null
    #[serde(default)]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            target: keys::TARGET.to_string(),
            partial: keys::PARTIAL.to_string(),
            args: keys::ARGS.to_string(),
            recursive: keys::RECURSIVE.to_string(),
        }
    }
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            merge_key: keys::MERGE.to_string(),
            allow_duplicate_keys: false,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl TargetSection {
    pub fn to_signature(&self) -> Result<Signature> {
        if self.name.is_empty() {
            return Err(ConfigError::InvalidParameter("Target name must not be empty".into()));
        }
        let mut signature = Signature::new().with_variadic(self.variadic);
        for param in &self.params {
            if signature.params().iter().any(|p| p.name == param.name) {
                return Err(ConfigError::InvalidParameter(format!(
                    "Parameter '{}' of target '{}' is declared twice",
                    param.name, self.name
                )));
            }
            signature = match (&param.default, param.optional) {
                (Some(default), _) => signature.optional(param.name.as_str(), Value::from_json(default)),
                (None, true) => signature.optional(param.name.as_str(), Value::Null),
                (None, false) => signature.required(param.name.as_str()),
            };
        }
        Ok(signature)
    }
}

impl SettingsFile {
    /// Load settings from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = read_file_string(path)?;
        toml::from_str::<Self>(&contents).map_parse_err("Failed to parse TOML settings")
    }

    /// Load settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = read_file_string(path)?;
        serde_json::from_str::<Self>(&contents).map_parse_err("Failed to parse JSON settings")
    }

    /// Load settings, picking the format from the extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if is_json_path(&path) {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Save settings to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_serialize_err("Failed to serialize to TOML")?;
        write_file_string(path, &contents)
    }

    /// Save settings to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).map_serialize_err("Failed to serialize to JSON")?;
        write_file_string(path, &contents)
    }

    pub fn to_loader_config(&self) -> Result<LoaderConfig> {
        let config = LoaderConfig::builder()
            .merge_key(self.loader.merge_key.as_str())
            .allow_duplicate_keys(self.loader.allow_duplicate_keys)
            .build();
        config.validate()?;
        Ok(config)
    }

    pub fn to_build_config(&self) -> Result<BuildConfig> {
        let config = BuildConfig::builder()
            .target_key(self.keys.target.as_str())
            .partial_key(self.keys.partial.as_str())
            .args_key(self.keys.args.as_str())
            .recursive_key(self.keys.recursive.as_str())
            .build();
        config.validate()?;
        Ok(config)
    }

    pub fn to_log_config(&self) -> Result<LogConfig> {
        let level = tracing::Level::from_str(&self.logging.level).map_err(|_| {
            ConfigError::InvalidParameter(format!(
                "Invalid log level: {}. Use error, warn, info, debug or trace",
                self.logging.level
            ))
        })?;
        let format = LogFormat::from_str(&self.logging.format)?;
        Ok(LogConfig { level, format })
    }

    /// Generate default settings
    pub fn generate_default() -> Self {
        Self {
            keys: KeysSection::default(),
            loader: LoaderSection::default(),
            logging: LoggingSection::default(),
            targets: vec![
                TargetSection {
                    name: "torch.optim.Adam".to_string(),
                    variadic: true,
                    aliases: vec!["Adam".to_string()],
                    params: vec![
                        ParamSection {
                            name: "params".to_string(),
                            optional: false,
                            default: None,
                        },
                        ParamSection {
                            name: "lr".to_string(),
                            optional: false,
                            default: Some(serde_json::json!(0.001)),
                        },
                    ],
                },
            ],
        }
    }

    /// Create example settings with comments
    pub fn create_example_toml() -> String {
        r#"# srgan-config settings file
# Controls how configuration documents are loaded and built

[keys]
# Key naming the constructor of a target mapping
target = "_target_"

# Set to true to get a deferred call instead of an instance
partial = "_partial_"

# Sequence of positional arguments
args = "_args_"

# Set to false to pass nested target mappings through unbuilt
recursive = "_recursive_"

[loader]
# Mapping key that merges other mappings into the current one
merge_key = "<<"

# Let a repeated key overwrite the earlier one instead of failing
allow_duplicate_keys = false

[logging]
# error, warn, info, debug or trace
level = "info"

# compact, pretty or json
format = "compact"

# Extra targets, registered next to the built-in ESRGAN ones.
# Their instances record the arguments they were built with.
[[targets]]
name = "torch.optim.Adam"
aliases = ["Adam"]
# Accept keyword arguments that are not listed below
variadic = true

[[targets.params]]
name = "params"

[[targets.params]]
name = "lr"
default = 0.001

[[targets]]
name = "torch.optim.lr_scheduler.StepLR"
variadic = false

[[targets.params]]
name = "optimizer"

[[targets.params]]
name = "step_size"
default = 30

[[targets.params]]
name = "gamma"
default = 0.1
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = SettingsFile::generate_default();
        assert_eq!(settings.keys.target, "_target_");
        assert_eq!(settings.loader.merge_key, "<<");
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.targets.len(), 1);
    }

    #[test]
    fn test_example_toml_parses() {
        let settings: SettingsFile = toml::from_str(&SettingsFile::create_example_toml()).unwrap();
        assert_eq!(settings.targets.len(), 2);
        assert_eq!(settings.targets[1].params.len(), 3);
        assert_eq!(settings.targets[1].params[2].default, Some(serde_json::json!(0.1)));
        assert!(!settings.loader.allow_duplicate_keys);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = SettingsFile::generate_default();
        settings.to_toml_file(&path).unwrap();
        let loaded = SettingsFile::from_file(&path).unwrap();
        assert_eq!(loaded.targets, settings.targets);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = SettingsFile::generate_default();
        settings.to_json_file(&path).unwrap();
        let loaded = SettingsFile::from_file(&path).unwrap();
        assert_eq!(loaded.targets, settings.targets);
        assert_eq!(loaded.keys.recursive, "_recursive_");
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let settings: SettingsFile = toml::from_str("[keys]\ntarget = \"cls\"\n").unwrap();
        let build = settings.to_build_config().unwrap();
        assert_eq!(build.target_key, "cls");
        assert_eq!(build.partial_key, "_partial_");
        assert!(settings.targets.is_empty());
    }

    #[test]
    fn test_clashing_keys_rejected() {
        let settings: SettingsFile = toml::from_str("[keys]\ntarget = \"_args_\"\n").unwrap();
        assert!(settings.to_build_config().is_err());
    }

    #[test]
    fn test_to_log_config() {
        let mut settings = SettingsFile::generate_default();
        settings.logging.level = "debug".to_string();
        settings.logging.format = "json".to_string();
        let log = settings.to_log_config().unwrap();
        assert_eq!(log.level, tracing::Level::DEBUG);
        assert_eq!(log.format, LogFormat::Json);

        settings.logging.level = "loud".to_string();
        assert!(settings.to_log_config().is_err());
    }

    #[test]
    fn test_target_signature() {
        let target = TargetSection {
            name: "StepLR".to_string(),
            variadic: false,
            aliases: Vec::new(),
            params: vec![
                ParamSection { name: "optimizer".into(), optional: false, default: None },
                ParamSection { name: "last_epoch".into(), optional: true, default: None },
                ParamSection { name: "gamma".into(), optional: false, default: Some(serde_json::json!(0.1)) },
            ],
        };
        let signature = target.to_signature().unwrap();
        assert_eq!(signature.to_string(), "(optimizer, last_epoch=null, gamma=0.1)");
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let target = TargetSection {
            name: "T".to_string(),
            variadic: false,
            aliases: Vec::new(),
            params: vec![
                ParamSection { name: "a".into(), optional: false, default: None },
                ParamSection { name: "a".into(), optional: true, default: None },
            ],
        };
        assert!(target.to_signature().is_err());
    }
}
