// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TourGuide: track user positions and reward visits to attractions.
//!
//! This crate provides the reward engine, the periodic location tracker and
//! a small HTTP API over them.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod tracker;

use config::Config;
use services::TourGuideService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tour_guide: TourGuideService,
}
