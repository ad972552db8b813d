// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interfaces to the external location and reward providers.

use crate::models::{Attraction, VisitedLocation};
use async_trait::async_trait;
use uuid::Uuid;

/// Source of attractions and live user positions.
#[async_trait]
pub trait AttractionCatalog: Send + Sync {
    /// All attractions, in catalog order. Each call is a stable snapshot.
    async fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError>;

    /// A fresh position for one user.
    async fn current_location(&self, user_id: Uuid) -> Result<VisitedLocation, ProviderError>;
}

/// Source of reward point values.
#[async_trait]
pub trait RewardPointsOracle: Send + Sync {
    /// Points a user earns for an attraction. Failures are per call.
    async fn points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError>;
}

/// Errors from provider calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),
}

/// Sleep for a random duration up to `max`, imitating a remote call.
pub(crate) async fn simulate_latency(max: std::time::Duration) {
    if max.is_zero() {
        return;
    }
    let millis = {
        use rand::Rng;
        rand::thread_rng().gen_range(0..=max.as_millis() as u64)
    };
    tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
}
