// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Simulated reward points provider.

use crate::services::provider::{simulate_latency, ProviderError, RewardPointsOracle};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use uuid::Uuid;

/// Returns pseudo-random point values in `1..1000`.
#[derive(Debug, Default, Clone)]
pub struct RewardCentral {
    max_latency: Duration,
}

impl RewardCentral {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a random delay of up to `max` to every lookup.
    pub fn with_simulated_latency(mut self, max: Duration) -> Self {
        self.max_latency = max;
        self
    }
}

#[async_trait]
impl RewardPointsOracle for RewardCentral {
    async fn points(&self, _attraction_id: Uuid, _user_id: Uuid) -> Result<u32, ProviderError> {
        simulate_latency(self.max_latency).await;
        Ok(rand::thread_rng().gen_range(1..1000))
    }
}
