// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location, reward and nearby-attraction endpoints.

use crate::error::{AppError, Result};
use crate::models::{NearbyAttractions, UserReward, VisitedLocation};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Longest accepted user name.
const MAX_USER_NAME_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getLocation", get(get_location))
        .route("/getNearbyAttractions", get(get_nearby_attractions))
        .route("/getRewards", get(get_rewards))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_name: String,
}

impl UserQuery {
    fn validated(&self) -> Result<&str> {
        let name = self.user_name.trim();
        if name.is_empty() || name.len() > MAX_USER_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "userName must be 1-{} characters",
                MAX_USER_NAME_LEN
            )));
        }
        Ok(name)
    }
}

/// Last known position of the user.
async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<VisitedLocation>> {
    let user = state.tour_guide.get_user(query.validated()?)?;
    let location = state.tour_guide.get_user_location(&user).await?;
    Ok(Json(location))
}

/// The five attractions closest to the user's last known position.
async fn get_nearby_attractions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<NearbyAttractions>> {
    let user = state.tour_guide.get_user(query.validated()?)?;
    let location = state.tour_guide.get_user_location(&user).await?;
    let nearby = state
        .tour_guide
        .nearby_attractions(&location, &user)
        .await?;
    Ok(Json(nearby))
}

/// Rewards earned so far.
async fn get_rewards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<UserReward>>> {
    let user = state.tour_guide.get_user(query.validated()?)?;
    Ok(Json(state.tour_guide.get_user_rewards(&user)))
}
