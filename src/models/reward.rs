// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward earned for visiting an attraction.

use super::{Attraction, VisitedLocation};
use serde::{Deserialize, Serialize};

/// A reward granted once per (user, attraction name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReward {
    /// The first visit (in chronological order) that was close enough.
    pub visited_location: VisitedLocation,
    pub attraction: Attraction,
    pub reward_points: u32,
}

impl UserReward {
    pub fn new(visited_location: VisitedLocation, attraction: Attraction, reward_points: u32) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }
}
