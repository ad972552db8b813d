// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory user registry keyed by user name.
//!
//! Users live for the whole process. Each is held as an `Arc<User>` so the
//! tracker and reward engine mutate the same instance callers see.

use crate::db::INTERNAL_USER_HISTORY_LEN;
use crate::models::{User, VisitedLocation};
use crate::services::gps::random_coordinate;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

/// Visits of generated users fall in this many past days.
const INTERNAL_HISTORY_DAYS: i64 = 30;

/// Shared user registry.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<DashMap<String, Arc<User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user unless the name is already taken.
    ///
    /// Returns `true` if the user was added.
    pub fn add_user(&self, user: User) -> bool {
        match self.users.entry(user.user_name().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(user));
                true
            }
        }
    }

    pub fn get_user(&self, user_name: &str) -> Option<Arc<User>> {
        self.users.get(user_name).map(|u| Arc::clone(u.value()))
    }

    /// Handles to every registered user, in no particular order.
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.users.iter().map(|u| Arc::clone(u.value())).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    // ─── Internal Test Users ─────────────────────────────────────

    /// Create `count` generated users, each with a short random history.
    pub fn initialize_internal_users(&self, count: usize) {
        for i in 0..count {
            let user_name = format!("internalUser{}", i);
            let email = format!("{}@tourGuide.com", user_name);
            let user = User::new(Uuid::new_v4(), user_name, "000", email);
            generate_user_location_history(&user);
            self.add_user(user);
        }
        tracing::debug!(count, "Created internal test users");
    }
}

fn generate_user_location_history(user: &User) {
    for _ in 0..INTERNAL_USER_HISTORY_LEN {
        user.add_to_visited_locations(VisitedLocation::new(
            user.user_id(),
            random_coordinate(),
            random_time(),
        ));
    }
}

/// A random day within the last month.
fn random_time() -> DateTime<Utc> {
    let days = rand::thread_rng().gen_range(0..INTERNAL_HISTORY_DAYS);
    Utc::now() - Duration::days(days)
}
