use crate::domain::model::{Availability, Domain};
use crate::domain::ports::AvailabilityOracle;
use futures::future::join_all;
use std::time::Duration;

/// 同時發出所有查詢，再依原順序收集結果。
/// 單一查詢失敗或逾時只會得到 `Unknown`，不影響其他結果。
pub async fn check_all(
    oracle: &dyn AvailabilityOracle,
    domains: &[Domain],
    timeout: Option<Duration>,
) -> Vec<Availability> {
    tracing::debug!(
        "Checking {} domains with {} oracle",
        domains.len(),
        oracle.name()
    );

    let lookups = domains.iter().map(|domain| check_one(oracle, domain, timeout));
    join_all(lookups).await
}

async fn check_one(
    oracle: &dyn AvailabilityOracle,
    domain: &Domain,
    timeout: Option<Duration>,
) -> Availability {
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, oracle.is_available(domain)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("⏱️ Lookup for {} timed out after {:?}", domain, limit);
                return Availability::Unknown;
            }
        },
        None => oracle.is_available(domain).await,
    };

    match outcome {
        Ok(available) => {
            tracing::debug!("{} available: {}", domain, available);
            Availability::from(available)
        }
        Err(e) => {
            tracing::warn!("⚠️ Lookup for {} failed: {}", domain, e);
            Availability::Unknown
        }
    }
}
