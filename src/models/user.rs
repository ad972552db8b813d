// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model: visit history, rewards and the reward-calculation guard.

use super::{UserReward, VisitedLocation};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A tracked user.
///
/// Users are shared as `Arc<User>` between the store, the tracker and the
/// reward engine. History and rewards are mutated in place behind per-user
/// locks, so different users never contend with each other.
#[derive(Debug)]
pub struct User {
    user_id: Uuid,
    user_name: String,
    phone_number: String,
    email_address: String,
    /// Append-only, in chronological (append) order.
    visited_locations: RwLock<Vec<VisitedLocation>>,
    /// At most one entry per attraction name.
    user_rewards: RwLock<Vec<UserReward>>,
    /// Shared with the live [`RewardCalculationGuard`], if any.
    reward_calculation_in_progress: Arc<AtomicBool>,
}

impl User {
    pub fn new(
        user_id: Uuid,
        user_name: impl Into<String>,
        phone_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            phone_number: phone_number.into(),
            email_address: email_address.into(),
            visited_locations: RwLock::new(Vec::new()),
            user_rewards: RwLock::new(Vec::new()),
            reward_calculation_in_progress: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    // ─── Visited Locations ───────────────────────────────────────

    pub fn add_to_visited_locations(&self, visited_location: VisitedLocation) {
        self.visited_locations.write().push(visited_location);
    }

    /// Snapshot of the visit history, oldest first.
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().cloned()
    }

    pub fn visited_location_count(&self) -> usize {
        self.visited_locations.read().len()
    }

    // ─── Rewards ─────────────────────────────────────────────────

    /// Record a reward unless one already exists for the same attraction name.
    ///
    /// Returns `true` if the reward was added.
    pub fn add_user_reward(&self, reward: UserReward) -> bool {
        let mut rewards = self.user_rewards.write();
        let already_rewarded = rewards
            .iter()
            .any(|r| r.attraction.attraction_name == reward.attraction.attraction_name);
        if already_rewarded {
            return false;
        }
        rewards.push(reward);
        true
    }

    /// Snapshot of the rewards earned so far.
    pub fn user_rewards(&self) -> Vec<UserReward> {
        self.user_rewards.read().clone()
    }

    /// Names of every attraction this user already holds a reward for.
    pub fn rewarded_attraction_names(&self) -> HashSet<String> {
        self.user_rewards
            .read()
            .iter()
            .map(|r| r.attraction.attraction_name.clone())
            .collect()
    }

    pub fn total_reward_points(&self) -> u64 {
        self.user_rewards
            .read()
            .iter()
            .map(|r| u64::from(r.reward_points))
            .sum()
    }

    // ─── Reward Calculation Guard ────────────────────────────────

    pub fn is_reward_calculation_in_progress(&self) -> bool {
        self.reward_calculation_in_progress.load(Ordering::Acquire)
    }

    /// Atomically move the user from idle to busy.
    ///
    /// Returns `None` if another calculation already holds the guard. The flag
    /// is cleared when the returned guard is dropped, including on panic or
    /// when the owning task is aborted. The guard does not borrow the user, so
    /// it can move into a spawned task.
    pub fn try_begin_reward_calculation(&self) -> Option<RewardCalculationGuard> {
        self.reward_calculation_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RewardCalculationGuard {
                in_progress: Arc::clone(&self.reward_calculation_in_progress),
            })
    }
}

/// Proof that the holder owns one user's reward calculation.
#[derive(Debug)]
pub struct RewardCalculationGuard {
    in_progress: Arc<AtomicBool>,
}

impl Drop for RewardCalculationGuard {
    fn drop(&mut self) {
        self.in_progress.store(false, Ordering::Release);
    }
}
