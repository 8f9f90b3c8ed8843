use crate::domain::model::Domain;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 域名可用性查詢
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    async fn is_available(&self, domain: &Domain) -> Result<bool>;

    fn name(&self) -> &str;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn required_count(&self) -> usize;
    fn lookup_timeout(&self) -> Option<Duration>;
}
