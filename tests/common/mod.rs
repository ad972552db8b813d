// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scripted providers and fixtures shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tour_guide::config::Config;
use tour_guide::db::UserStore;
use tour_guide::models::{Attraction, Coordinate, User, VisitedLocation};
use tour_guide::routes::create_router;
use tour_guide::services::distance::STATUTE_MILES_PER_NAUTICAL_MILE;
use tour_guide::services::{
    AttractionCatalog, ProviderError, RewardPointsOracle, RewardService, RewardSettings,
    TourGuideService,
};
use tour_guide::AppState;
use uuid::Uuid;

/// Degrees of latitude spanning `miles` statute miles.
pub fn miles_to_degrees(miles: f64) -> f64 {
    miles / (60.0 * STATUTE_MILES_PER_NAUTICAL_MILE)
}

pub fn attraction_at(name: &str, latitude: f64, longitude: f64) -> Attraction {
    Attraction::new(name, "Test City", "TS", Coordinate::new(latitude, longitude))
}

/// A user whose history holds one visit per coordinate, oldest first.
pub fn user_with_visits(name: &str, visits: &[Coordinate]) -> User {
    let user = User::new(Uuid::new_v4(), name, "000", format!("{}@tourGuide.com", name));
    let start = Utc::now() - ChronoDuration::hours(visits.len() as i64);
    for (i, coordinate) in visits.iter().enumerate() {
        user.add_to_visited_locations(VisitedLocation::new(
            user.user_id(),
            *coordinate,
            start + ChronoDuration::hours(i as i64),
        ));
    }
    user
}

// ─── Catalog ─────────────────────────────────────────────────────

/// Catalog with a fixed attraction list that reports every user at one spot.
pub struct FixedCatalog {
    attractions: Vec<Attraction>,
    position: Coordinate,
    location_delay: Duration,
    fail_listing: bool,
    unlocatable: Mutex<HashSet<Uuid>>,
    pub list_calls: AtomicUsize,
    pub location_calls: AtomicUsize,
}

impl FixedCatalog {
    pub fn new(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions,
            position: Coordinate::new(0.0, 0.0),
            location_delay: Duration::ZERO,
            fail_listing: false,
            unlocatable: Mutex::new(HashSet::new()),
            list_calls: AtomicUsize::new(0),
            location_calls: AtomicUsize::new(0),
        }
    }

    pub fn reporting(mut self, position: Coordinate) -> Self {
        self.position = position;
        self
    }

    pub fn with_location_delay(mut self, delay: Duration) -> Self {
        self.location_delay = delay;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn make_unlocatable(&self, user_id: Uuid) {
        self.unlocatable.lock().insert(user_id);
    }
}

#[async_trait]
impl AttractionCatalog for FixedCatalog {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(ProviderError::Unavailable("catalog offline".to_string()));
        }
        Ok(self.attractions.clone())
    }

    async fn current_location(&self, user_id: Uuid) -> Result<VisitedLocation, ProviderError> {
        self.location_calls.fetch_add(1, Ordering::SeqCst);
        if !self.location_delay.is_zero() {
            tokio::time::sleep(self.location_delay).await;
        }
        if self.unlocatable.lock().contains(&user_id) {
            return Err(ProviderError::Unavailable("gps offline".to_string()));
        }
        Ok(VisitedLocation::new(user_id, self.position, Utc::now()))
    }
}

// ─── Oracle ──────────────────────────────────────────────────────

/// Oracle returning fixed points, with scriptable failures and delays.
pub struct FixedOracle {
    points: u32,
    failing_attractions: Mutex<HashSet<Uuid>>,
    slow_users: Mutex<HashMap<Uuid, Duration>>,
    pub calls: AtomicUsize,
}

impl FixedOracle {
    pub fn new(points: u32) -> Self {
        Self {
            points,
            failing_attractions: Mutex::new(HashSet::new()),
            slow_users: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_for(&self, attraction_id: Uuid) {
        self.failing_attractions.lock().insert(attraction_id);
    }

    pub fn recover(&self) {
        self.failing_attractions.lock().clear();
    }

    pub fn delay_for(&self, user_id: Uuid, delay: Duration) {
        self.slow_users.lock().insert(user_id, delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardPointsOracle for FixedOracle {
    async fn points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<u32, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.slow_users.lock().get(&user_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_attractions.lock().contains(&attraction_id) {
            return Err(ProviderError::Unavailable("reward central offline".to_string()));
        }
        Ok(self.points)
    }
}

// ─── Services ────────────────────────────────────────────────────

pub fn settings_with_buffer(proximity_buffer_miles: f64) -> RewardSettings {
    RewardSettings {
        proximity_buffer_miles,
        ..RewardSettings::default()
    }
}

pub fn reward_service(
    catalog: Arc<FixedCatalog>,
    oracle: Arc<FixedOracle>,
    settings: RewardSettings,
) -> Arc<RewardService> {
    Arc::new(RewardService::new(catalog, oracle, settings))
}

pub fn tour_guide_service(
    catalog: Arc<FixedCatalog>,
    oracle: Arc<FixedOracle>,
    settings: RewardSettings,
) -> TourGuideService {
    TourGuideService::new(UserStore::new(), reward_service(catalog, oracle, settings))
}

/// Router over the given service, with default config.
pub fn create_test_app(tour_guide: TourGuideService) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        tour_guide,
    });
    (create_router(state.clone()), state)
}
