// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reward calculation engine.
//!
//! For each user, every attraction not yet rewarded is checked against the
//! user's visit history. The first visit (oldest first) inside the proximity
//! buffer earns the reward, with points from the reward oracle.
//!
//! Batches spawn one task per user onto the runtime, with at most
//! `worker_pool_size` in flight, and return only after every task has
//! finished. Dropping an unfinished batch aborts its tasks.

use crate::error::{AppError, Result};
use crate::models::{Attraction, Coordinate, User, UserReward, VisitedLocation};
use crate::services::distance::is_near;
use crate::services::provider::{AttractionCatalog, ProviderError, RewardPointsOracle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Tunables for the reward engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardSettings {
    /// Statute miles within which a visit earns a reward.
    pub proximity_buffer_miles: f64,
    /// Statute miles within which an attraction is worth showing.
    pub attraction_proximity_range_miles: f64,
    /// Maximum number of per-user tasks in flight during a batch.
    pub worker_pool_size: usize,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            proximity_buffer_miles: 10.0,
            attraction_proximity_range_miles: 200.0,
            worker_pool_size: 5000,
        }
    }
}

/// A reward that could not be granted because the oracle failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardFailure {
    pub user_id: Uuid,
    pub user_name: String,
    pub attraction_name: String,
    pub error: ProviderError,
}

/// Result of computing rewards for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserRewardOutcome {
    pub rewards_added: usize,
    pub failures: Vec<RewardFailure>,
}

/// Result of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Users submitted to the batch.
    pub users: usize,
    /// Users whose rewards were computed by this batch.
    pub computed: usize,
    /// Users skipped because a calculation was already running for them.
    pub skipped_in_progress: usize,
    /// Rewards created across all users.
    pub rewards_added: usize,
    /// Per (user, attraction) oracle failures.
    pub failures: Vec<RewardFailure>,
}

impl BatchReport {
    /// Returns true if no oracle call failed.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes and records rewards.
pub struct RewardService {
    catalog: Arc<dyn AttractionCatalog>,
    oracle: Arc<dyn RewardPointsOracle>,
    default_proximity_buffer: f64,
    /// Current buffer, stored as `f64` bits.
    proximity_buffer: AtomicU64,
    attraction_proximity_range: f64,
    worker_pool_size: usize,
}

impl RewardService {
    pub fn new(
        catalog: Arc<dyn AttractionCatalog>,
        oracle: Arc<dyn RewardPointsOracle>,
        settings: RewardSettings,
    ) -> Self {
        Self {
            catalog,
            oracle,
            default_proximity_buffer: settings.proximity_buffer_miles,
            proximity_buffer: AtomicU64::new(settings.proximity_buffer_miles.to_bits()),
            attraction_proximity_range: settings.attraction_proximity_range_miles,
            worker_pool_size: settings.worker_pool_size.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    // ─── Settings ────────────────────────────────────────────────

    pub fn proximity_buffer(&self) -> f64 {
        f64::from_bits(self.proximity_buffer.load(Ordering::Relaxed))
    }

    /// Override the reward proximity buffer (statute miles).
    pub fn set_proximity_buffer(&self, miles: f64) {
        self.proximity_buffer
            .store(miles.to_bits(), Ordering::Relaxed);
    }

    /// Restore the configured proximity buffer.
    pub fn reset_proximity_buffer(&self) {
        self.set_proximity_buffer(self.default_proximity_buffer);
    }

    pub fn attraction_proximity_range(&self) -> f64 {
        self.attraction_proximity_range
    }

    pub fn worker_pool_size(&self) -> usize {
        self.worker_pool_size
    }

    pub fn catalog(&self) -> &Arc<dyn AttractionCatalog> {
        &self.catalog
    }

    // ─── Proximity ───────────────────────────────────────────────

    /// True if the attraction is within the discovery range of `location`.
    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: Coordinate,
    ) -> bool {
        is_near(attraction.location, location, self.attraction_proximity_range)
    }

    /// True if the visit is close enough to earn the attraction's reward.
    pub fn near_attraction(&self, visited_location: &VisitedLocation, attraction: &Attraction) -> bool {
        is_near(
            attraction.location,
            visited_location.location,
            self.proximity_buffer(),
        )
    }

    pub async fn reward_points(
        &self,
        attraction: &Attraction,
        user: &User,
    ) -> std::result::Result<u32, ProviderError> {
        self.oracle
            .points(attraction.attraction_id, user.user_id())
            .await
    }

    // ─── Calculation ─────────────────────────────────────────────

    /// Grant every reward the user has earned against `attractions`.
    ///
    /// Attractions are visited in catalog order and visits oldest first. Calling
    /// this again with the same inputs adds nothing. An oracle failure skips
    /// only that attraction and is reported in the outcome.
    pub async fn compute_for_user(
        &self,
        user: &User,
        attractions: &[Attraction],
    ) -> UserRewardOutcome {
        let mut outcome = UserRewardOutcome::default();

        let visited_locations = user.visited_locations();
        if visited_locations.is_empty() {
            return outcome;
        }

        let mut rewarded = user.rewarded_attraction_names();

        for attraction in attractions {
            if rewarded.contains(&attraction.attraction_name) {
                continue;
            }

            let Some(visit) = visited_locations
                .iter()
                .find(|v| self.near_attraction(v, attraction))
            else {
                continue;
            };

            match self.reward_points(attraction, user).await {
                Ok(points) => {
                    let reward = UserReward::new(visit.clone(), attraction.clone(), points);
                    if user.add_user_reward(reward) {
                        outcome.rewards_added += 1;
                    }
                    rewarded.insert(attraction.attraction_name.clone());
                }
                Err(error) => {
                    tracing::warn!(
                        user = %user.user_name(),
                        attraction = %attraction.attraction_name,
                        error = %error,
                        "Reward points lookup failed"
                    );
                    outcome.failures.push(RewardFailure {
                        user_id: user.user_id(),
                        user_name: user.user_name().to_string(),
                        attraction_name: attraction.attraction_name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Compute rewards for one user against a fresh attraction snapshot.
    ///
    /// Returns `Ok(None)` if a calculation for this user is already running.
    pub async fn calculate_rewards(&self, user: &User) -> Result<Option<UserRewardOutcome>> {
        let attractions = self.catalog.list_attractions().await?;

        let Some(_guard) = user.try_begin_reward_calculation() else {
            tracing::debug!(user = %user.user_name(), "Reward calculation already in progress");
            return Ok(None);
        };

        Ok(Some(self.compute_for_user(user, &attractions).await))
    }

    /// Compute rewards for every user in parallel and wait for all of them.
    ///
    /// The attraction list is fetched once for the whole batch. Users whose
    /// calculation is already running are skipped. Failing to list
    /// attractions fails the batch; oracle failures do not.
    pub async fn compute_batch(self: &Arc<Self>, users: &[Arc<User>]) -> Result<BatchReport> {
        let attractions: Arc<[Attraction]> = self
            .catalog
            .list_attractions()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch attractions for reward batch");
                AppError::from(e)
            })?
            .into();

        let mut report = BatchReport {
            users: users.len(),
            ..BatchReport::default()
        };

        let permits = Arc::new(Semaphore::new(self.worker_pool_size));
        let mut tasks = JoinSet::new();

        for user in users {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(e.into()))?;

            let Some(guard) = user.try_begin_reward_calculation() else {
                tracing::debug!(
                    user = %user.user_name(),
                    "Reward calculation already in progress, skipping"
                );
                report.skipped_in_progress += 1;
                continue;
            };

            let rewards = Arc::clone(self);
            let user = Arc::clone(user);
            let attractions = Arc::clone(&attractions);
            tasks.spawn(async move {
                let _permit = permit;
                let _guard = guard;
                rewards.compute_for_user(&user, &attractions).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    report.computed += 1;
                    report.rewards_added += outcome.rewards_added;
                    report.failures.extend(outcome.failures);
                }
                Err(e) => tracing::error!(error = %e, "Reward task failed"),
            }
        }

        tracing::info!(
            users = report.users,
            computed = report.computed,
            skipped = report.skipped_in_progress,
            rewards_added = report.rewards_added,
            failed = report.failures.len(),
            "Reward batch complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gps::GpsCatalog;
    use crate::services::reward_central::RewardCentral;

    fn service(settings: RewardSettings) -> RewardService {
        RewardService::new(
            Arc::new(GpsCatalog::default()),
            Arc::new(RewardCentral::new()),
            settings,
        )
    }

    #[test]
    fn test_set_and_reset_proximity_buffer() {
        let rewards = service(RewardSettings::default());
        assert_eq!(rewards.proximity_buffer(), 10.0);

        rewards.set_proximity_buffer(f64::from(i32::MAX));
        assert_eq!(rewards.proximity_buffer(), f64::from(i32::MAX));

        rewards.reset_proximity_buffer();
        assert_eq!(rewards.proximity_buffer(), 10.0);
    }

    #[test]
    fn test_discovery_range_is_wider_than_buffer() {
        let rewards = service(RewardSettings::default());
        let attraction = Attraction::new("Far", "City", "ST", Coordinate::new(0.0, 0.0));
        // ~69 statute miles north
        let point = Coordinate::new(1.0, 0.0);
        let visit = VisitedLocation::new(Uuid::new_v4(), point, chrono::Utc::now());

        assert!(rewards.is_within_attraction_proximity(&attraction, point));
        assert!(!rewards.near_attraction(&visit, &attraction));
    }

    #[test]
    fn test_worker_pool_size_has_floor() {
        let rewards = service(RewardSettings {
            worker_pool_size: 0,
            ..RewardSettings::default()
        });
        assert_eq!(rewards.worker_pool_size(), 1);

        let rewards = service(RewardSettings {
            worker_pool_size: usize::MAX,
            ..RewardSettings::default()
        });
        assert_eq!(rewards.worker_pool_size(), Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_batch_report_success() {
        let mut report = BatchReport::default();
        assert!(report.is_complete_success());
        report.failures.push(RewardFailure {
            user_id: Uuid::nil(),
            user_name: "jon".to_string(),
            attraction_name: "Disneyland".to_string(),
            error: ProviderError::Unavailable("down".to_string()),
        });
        assert!(!report.is_complete_success());
    }
}
