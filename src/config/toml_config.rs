use crate::adapters::{CommandClipboard, MemoryClipboard, RandomOracle, RdapOracle};
use crate::domain::ports::{AvailabilityOracle, Clipboard, ConfigProvider};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    pub cart: CartSection,
    pub oracle: OracleConfig,
    pub clipboard: ClipboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSection {
    pub required_count: usize,
}

impl Default for CartSection {
    fn default() -> Self {
        Self { required_count: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Random,
    Rdap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub kind: OracleKind,
    pub latency_ms: u64,
    pub probability: f64,
    pub seed: Option<u64>,
    pub timeout_ms: u64,
    pub endpoint: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::Random,
            latency_ms: 500,
            probability: 0.5,
            seed: None,
            timeout_ms: 2000,
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl CartConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RDAP_ENDPOINT})，未設定的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn lookup_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.oracle.timeout_ms)
    }

    pub fn build_oracle(&self) -> Result<Arc<dyn AvailabilityOracle>> {
        match self.oracle.kind {
            OracleKind::Random => Ok(Arc::new(RandomOracle::new(
                Duration::from_millis(self.oracle.latency_ms),
                self.oracle.probability,
                self.oracle.seed,
            ))),
            OracleKind::Rdap => {
                let endpoint = validate_required_field("oracle.endpoint", &self.oracle.endpoint)?;
                Ok(Arc::new(RdapOracle::new(
                    endpoint,
                    self.lookup_timeout_duration(),
                )?))
            }
        }
    }

    pub fn build_clipboard(&self) -> Result<Arc<dyn Clipboard>> {
        match &self.clipboard.command {
            Some(command) => Ok(Arc::new(CommandClipboard::new(command)?)),
            None => Ok(Arc::new(MemoryClipboard::new())),
        }
    }
}

impl Validate for CartConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("cart.required_count", self.cart.required_count, 1)?;
        validate_range("oracle.probability", self.oracle.probability, 0.0, 1.0)?;
        validate_positive_number("oracle.timeout_ms", self.oracle.timeout_ms, 1)?;

        if self.oracle.kind == OracleKind::Rdap {
            let endpoint = validate_required_field("oracle.endpoint", &self.oracle.endpoint)?;
            validate_url("oracle.endpoint", endpoint)?;
        }

        if let Some(command) = &self.clipboard.command {
            let program = command.first().map(String::as_str).unwrap_or_default();
            validate_non_empty_string("clipboard.command", program)?;
        }

        Ok(())
    }
}

impl ConfigProvider for CartConfig {
    fn required_count(&self) -> usize {
        self.cart.required_count
    }

    fn lookup_timeout(&self) -> Option<Duration> {
        Some(self.lookup_timeout_duration())
    }
}
