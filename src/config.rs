use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::detect::{
    identity::{DEFAULT_DMI_DIR, DEFAULT_PCI_DIR},
    quirks::QuirkRule,
    types::{CapabilityFacts, IdentityDescriptor, PlatformFacts},
};

const SCHEMA_FILE_NAME: &str = "backlight-arbiter.schema.json";
const EMBEDDED_SCHEMA: &str = include_str!("../backlight-arbiter.schema.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Boot override: one of `vendor`, `video`, `native`, `nvidia_wmi_ec`,
    /// `none`. Anything else leaves the choice to detection.
    #[serde(default)]
    pub backlight: Option<String>,
    /// Whether a native (GPU driver) backlight is already known to exist.
    #[serde(default)]
    pub native_hint: bool,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub platform: PlatformFacts,
    #[serde(default)]
    pub capabilities: CapabilityFacts,
    #[serde(default)]
    pub quirks: Vec<QuirkRule>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IdentityConfig {
    Sysfs {
        #[serde(default = "default_dmi_dir")]
        dmi_dir: PathBuf,
        #[serde(default = "default_pci_dir")]
        pci_dir: Option<PathBuf>,
    },
    Inline {
        descriptor: IdentityDescriptor,
    },
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self::Sysfs {
            dmi_dir: default_dmi_dir(),
            pci_dir: default_pci_dir(),
        }
    }
}

fn default_dmi_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DMI_DIR)
}

fn default_pci_dir() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_PCI_DIR))
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_enabled_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for JSON log files; file logging is off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_enabled_true")]
    pub stderr_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            stderr_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = load_schema(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if let IdentityConfig::Sysfs { dmi_dir, pci_dir } = &mut config.identity {
            if !dmi_dir.is_absolute() {
                *dmi_dir = config_base.join(&*dmi_dir);
            }
            if let Some(pci_dir) = pci_dir
                && !pci_dir.is_absolute()
            {
                *pci_dir = config_base.join(&*pci_dir);
            }
        }
        if let Some(dir) = &mut config.logging.dir
            && !dir.is_absolute()
        {
            *dir = config_base.join(&*dir);
        }

        Ok(config)
    }
}

/// Uses `$schema` when the config names one, then a schema file next to the
/// config, then the schema compiled into the binary.
fn load_schema(config_base: &Path, config_value: &Value) -> Result<Value> {
    let schema_path = match config_value.get("$schema").and_then(|value| value.as_str()) {
        Some(path_text) => {
            let configured = PathBuf::from(path_text);
            Some(if configured.is_absolute() {
                configured
            } else {
                config_base.join(configured)
            })
        }
        None => Some(config_base.join(SCHEMA_FILE_NAME)).filter(|path| path.exists()),
    };

    let schema_content = match &schema_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?,
        None => EMBEDDED_SCHEMA.to_string(),
    };

    serde_json::from_str(&schema_content).with_context(|| match &schema_path {
        Some(path) => format!("failed to parse schema {}", path.display()),
        None => "failed to parse embedded schema".to_string(),
    })
}

fn validate_against_schema(config_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
