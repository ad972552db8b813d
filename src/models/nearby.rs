// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nearby-attraction view returned to API callers.

use super::Attraction;
use serde::Serialize;

/// Maximum number of attractions returned by a nearby lookup.
pub const NEARBY_ATTRACTION_LIMIT: usize = 5;

/// An attraction paired with its distance from a reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionDistance {
    pub attraction: Attraction,
    /// Statute miles.
    pub distance: f64,
}

/// One entry of the nearby-attractions response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyAttraction {
    pub attraction_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Statute miles from the user.
    pub distance: f64,
    pub reward_points: u32,
}

/// The user's position and the closest attractions, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyAttractions {
    pub user_latitude: f64,
    pub user_longitude: f64,
    pub attractions: Vec<NearbyAttraction>,
}
