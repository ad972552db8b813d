// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Positions, visits and points of interest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<geo::Point<f64>> for Coordinate {
    /// GeoJSON points are (x = longitude, y = latitude).
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// A position a user was observed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedLocation {
    pub user_id: Uuid,
    pub location: Coordinate,
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    pub fn new(user_id: Uuid, location: Coordinate, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}

/// A point of interest from the attraction catalog.
///
/// The attraction name is its identity for reward purposes: a user earns at
/// most one reward per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub attraction_id: Uuid,
    pub attraction_name: String,
    pub city: String,
    pub state: String,
    pub location: Coordinate,
}

impl Attraction {
    pub fn new(
        attraction_name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        location: Coordinate,
    ) -> Self {
        Self {
            attraction_id: Uuid::new_v4(),
            attraction_name: attraction_name.into(),
            city: city.into(),
            state: state.into(),
            location,
        }
    }
}
