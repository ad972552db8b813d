// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing tracking operations.
//!
//! Handles the core workflow:
//! 1. Fetch fresh positions from the attraction catalog
//! 2. Append them to each user's history
//! 3. Run the reward engine over the affected users
//! 4. Answer location, reward and nearby-attraction queries

use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::models::nearby::NEARBY_ATTRACTION_LIMIT;
use crate::models::{
    Attraction, AttractionDistance, Coordinate, NearbyAttraction, NearbyAttractions, User,
    UserReward, VisitedLocation,
};
use crate::services::distance::distance;
use crate::services::provider::ProviderError;
use crate::services::rewards::{BatchReport, RewardService};
use futures_util::future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A user whose position could not be refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFailure {
    pub user_name: String,
    pub error: ProviderError,
}

/// Result of refreshing positions and rewards for a set of users.
#[derive(Debug, Clone, Default)]
pub struct TrackingReport {
    /// Users whose position was refreshed.
    pub located: usize,
    pub location_failures: Vec<LocationFailure>,
    pub rewards: BatchReport,
}

/// Tracking and query service shared by the tracker and the HTTP layer.
#[derive(Clone)]
pub struct TourGuideService {
    users: UserStore,
    rewards: Arc<RewardService>,
}

impl TourGuideService {
    pub fn new(users: UserStore, rewards: Arc<RewardService>) -> Self {
        Self { users, rewards }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn rewards(&self) -> &Arc<RewardService> {
        &self.rewards
    }

    /// Look up a user by name.
    pub fn get_user(&self, user_name: &str) -> Result<Arc<User>> {
        self.users
            .get_user(user_name)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_name)))
    }

    pub fn get_user_rewards(&self, user: &User) -> Vec<UserReward> {
        user.user_rewards()
    }

    /// Last known position, or a freshly tracked one if there is no history.
    pub async fn get_user_location(&self, user: &User) -> Result<VisitedLocation> {
        match user.last_visited_location() {
            Some(location) => Ok(location),
            None => self.track_user_location(user).await,
        }
    }

    /// Fetch and record the user's current position, then update their rewards.
    ///
    /// Once the position is recorded it is returned even if the reward update
    /// fails; the next tracking cycle retries the rewards.
    pub async fn track_user_location(&self, user: &User) -> Result<VisitedLocation> {
        let visited_location = self
            .rewards
            .catalog()
            .current_location(user.user_id())
            .await?;
        user.add_to_visited_locations(visited_location.clone());

        if let Err(e) = self.rewards.calculate_rewards(user).await {
            tracing::warn!(
                user = %user.user_name(),
                error = %e,
                "Reward update failed after tracking location"
            );
        }
        Ok(visited_location)
    }

    /// Refresh every user's position, then run one reward batch over all of them.
    ///
    /// A user whose position cannot be fetched is reported and still takes
    /// part in the reward batch with their existing history.
    pub async fn track_all_users(&self, users: &[Arc<User>]) -> Result<TrackingReport> {
        let permits = Arc::new(Semaphore::new(self.rewards.worker_pool_size()));
        let mut tasks = JoinSet::new();

        for user in users {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
            let catalog = Arc::clone(self.rewards.catalog());
            let user = Arc::clone(user);

            tasks.spawn(async move {
                let _permit = permit;
                match catalog.current_location(user.user_id()).await {
                    Ok(location) => {
                        user.add_to_visited_locations(location);
                        None
                    }
                    Err(error) => {
                        tracing::warn!(
                            user = %user.user_name(),
                            error = %error,
                            "Failed to refresh user location"
                        );
                        Some(LocationFailure {
                            user_name: user.user_name().to_string(),
                            error,
                        })
                    }
                }
            });
        }

        let mut located = 0;
        let mut location_failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(None) => located += 1,
                Ok(Some(failure)) => location_failures.push(failure),
                Err(e) => tracing::error!(error = %e, "Location refresh task failed"),
            }
        }

        let rewards = self.rewards.compute_batch(users).await?;

        Ok(TrackingReport {
            located,
            location_failures,
            rewards,
        })
    }

    /// The closest attractions to `visited_location`, with the points `user`
    /// would earn for each.
    pub async fn nearby_attractions(
        &self,
        visited_location: &VisitedLocation,
        user: &User,
    ) -> Result<NearbyAttractions> {
        let attractions = self.rewards.catalog().list_attractions().await?;
        let nearest = rank_by_distance(
            visited_location.location,
            attractions,
            NEARBY_ATTRACTION_LIMIT,
        );

        let points = future::try_join_all(
            nearest
                .iter()
                .map(|a| self.rewards.reward_points(&a.attraction, user)),
        )
        .await?;

        let attractions = nearest
            .into_iter()
            .zip(points)
            .map(|(a, reward_points)| NearbyAttraction {
                attraction_name: a.attraction.attraction_name,
                latitude: a.attraction.location.latitude,
                longitude: a.attraction.location.longitude,
                distance: a.distance,
                reward_points,
            })
            .collect();

        Ok(NearbyAttractions {
            user_latitude: visited_location.location.latitude,
            user_longitude: visited_location.location.longitude,
            attractions,
        })
    }
}

/// The `limit` attractions closest to `origin`, nearest first.
///
/// Equal distances keep catalog order.
pub fn rank_by_distance(
    origin: Coordinate,
    attractions: Vec<Attraction>,
    limit: usize,
) -> Vec<AttractionDistance> {
    let mut ranked: Vec<AttractionDistance> = attractions
        .into_iter()
        .map(|attraction| AttractionDistance {
            distance: distance(origin, attraction.location),
            attraction,
        })
        .collect();

    // stable sort
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(limit);
    ranked
}
