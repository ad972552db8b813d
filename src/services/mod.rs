// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod distance;
pub mod gps;
pub mod provider;
pub mod reward_central;
pub mod rewards;
pub mod tour_guide;

pub use gps::{CatalogLoadError, GpsCatalog};
pub use provider::{AttractionCatalog, ProviderError, RewardPointsOracle};
pub use reward_central::RewardCentral;
pub use rewards::{BatchReport, RewardFailure, RewardService, RewardSettings, UserRewardOutcome};
pub use tour_guide::{LocationFailure, TourGuideService, TrackingReport};
