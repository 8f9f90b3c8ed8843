use crate::config::toml_config::{CartConfig, OracleKind};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "domain-cart")]
#[command(about = "Pick domain names for purchase from an interactive cart")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of domains that must be selected before purchasing
    #[arg(long)]
    pub required_count: Option<usize>,

    /// Availability oracle to use
    #[arg(long, value_enum)]
    pub oracle: Option<OracleKind>,

    /// RDAP base URL (rdap oracle only)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Seed for the random oracle
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// 載入 TOML（若有指定），再套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<CartConfig> {
        let mut config = match &self.config {
            Some(path) => CartConfig::from_file(path)?,
            None => CartConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut CartConfig) {
        if let Some(required_count) = self.required_count {
            config.cart.required_count = required_count;
        }
        if let Some(kind) = self.oracle {
            config.oracle.kind = kind;
        }
        if let Some(endpoint) = &self.endpoint {
            config.oracle.endpoint = Some(endpoint.clone());
        }
        if self.seed.is_some() {
            config.oracle.seed = self.seed;
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.log_json;
    }
}
