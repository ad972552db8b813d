// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod location;
pub mod nearby;
pub mod reward;
pub mod user;

pub use location::{Attraction, Coordinate, VisitedLocation};
pub use nearby::{AttractionDistance, NearbyAttraction, NearbyAttractions};
pub use reward::UserReward;
pub use user::{RewardCalculationGuard, User};
