use crate::domain::model::Domain;
use crate::domain::ports::AvailabilityOracle;
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// 模擬註冊商查詢：等待固定延遲後回傳隨機結果
pub struct RandomOracle {
    latency: Duration,
    probability: f64,
    rng: Mutex<StdRng>,
}

impl RandomOracle {
    pub fn new(latency: Duration, probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // gen_bool 不接受 NaN
        let probability = if probability.is_nan() {
            0.5
        } else {
            probability.clamp(0.0, 1.0)
        };

        Self {
            latency,
            probability,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl AvailabilityOracle for RandomOracle {
    async fn is_available(&self, domain: &Domain) -> Result<bool> {
        tokio::time::sleep(self.latency).await;

        let mut rng = self.rng.lock().map_err(|_| CartError::OracleError {
            domain: domain.to_string(),
            message: "random source poisoned".to_string(),
        })?;
        Ok(rng.gen_bool(self.probability))
    }

    fn name(&self) -> &str {
        "random"
    }
}
