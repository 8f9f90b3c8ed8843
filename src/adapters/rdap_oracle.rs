use crate::domain::model::Domain;
use crate::domain::ports::AvailabilityOracle;
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// 透過 RDAP 查詢域名是否已被註冊。
///
/// `GET {endpoint}/domain/{name}`：404 表示未註冊（可購買），2xx 表示已被註冊，
/// 其他狀態碼視為查詢失敗。
pub struct RdapOracle {
    endpoint: String,
    client: Client,
}

impl RdapOracle {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn lookup_url(&self, domain: &Domain) -> String {
        format!("{}/domain/{}", self.endpoint, domain)
    }
}

#[async_trait]
impl AvailabilityOracle for RdapOracle {
    async fn is_available(&self, domain: &Domain) -> Result<bool> {
        let url = self.lookup_url(domain);
        tracing::debug!("RDAP lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/rdap+json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(true),
            status if status.is_success() => Ok(false),
            status => Err(CartError::OracleError {
                domain: domain.to_string(),
                message: format!("unexpected RDAP status {}", status),
            }),
        }
    }

    fn name(&self) -> &str {
        "rdap"
    }
}
