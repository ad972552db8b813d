// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attraction catalog backed by a GeoJSON file, with simulated user positions.

use crate::models::{Attraction, Coordinate, VisitedLocation};
use crate::services::provider::{simulate_latency, AttractionCatalog, ProviderError};
use async_trait::async_trait;
use chrono::Utc;
use geojson::GeoJson;
use rand::Rng;
use std::fs;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Latitude bound of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Catalog of attractions; positions reported for users are random.
#[derive(Debug, Default, Clone)]
pub struct GpsCatalog {
    attractions: Vec<Attraction>,
    max_latency: Duration,
}

impl GpsCatalog {
    /// Load attractions from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogLoadError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| CatalogLoadError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load attractions from a GeoJSON `FeatureCollection` of points.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogLoadError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| CatalogLoadError::ParseError(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(CatalogLoadError::ParseError(
                "expected a FeatureCollection".to_string(),
            ));
        };

        let mut attractions = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let text = |key: &str| {
                feature
                    .property(key)
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            };

            let name = text("name").ok_or(CatalogLoadError::MissingProperty("name"))?;
            let city = text("city").unwrap_or_default();
            let state = text("state").unwrap_or_default();
            let attraction_id = text("id")
                .and_then(|id| Uuid::parse_str(&id).ok())
                .unwrap_or_else(Uuid::new_v4);

            let Some(geometry) = feature.geometry else {
                return Err(CatalogLoadError::MissingProperty("geometry"));
            };
            let point: geo::Point<f64> = geometry
                .value
                .try_into()
                .map_err(|_| CatalogLoadError::UnsupportedGeometry)?;

            attractions.push(Attraction {
                attraction_id,
                attraction_name: name,
                city,
                state,
                location: Coordinate::from(point),
            });
        }

        tracing::info!(count = attractions.len(), "Loaded attractions");
        Ok(Self::from_attractions(attractions))
    }

    pub fn from_attractions(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions,
            max_latency: Duration::ZERO,
        }
    }

    /// Add a random delay of up to `max` to every provider call.
    pub fn with_simulated_latency(mut self, max: Duration) -> Self {
        self.max_latency = max;
        self
    }

    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }
}

#[async_trait]
impl AttractionCatalog for GpsCatalog {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        Ok(self.attractions.clone())
    }

    async fn current_location(&self, user_id: Uuid) -> Result<VisitedLocation, ProviderError> {
        simulate_latency(self.max_latency).await;
        Ok(VisitedLocation::new(user_id, random_coordinate(), Utc::now()))
    }
}

/// A uniformly random coordinate within the Web Mercator latitude band.
pub fn random_coordinate() -> Coordinate {
    let mut rng = rand::thread_rng();
    Coordinate::new(
        rng.gen_range(-MAX_LATITUDE..MAX_LATITUDE),
        rng.gen_range(-180.0..180.0),
    )
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Unsupported geometry type (expected Point)")]
    UnsupportedGeometry,

    #[error("Feature is missing required property: {0}")]
    MissingProperty(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Disneyland", "city": "Anaheim", "state": "CA"},
                "geometry": {"type": "Point", "coordinates": [-117.922008, 33.817595]}
            },
            {
                "type": "Feature",
                "properties": {
                    "name": "Jackson Hole",
                    "city": "Jackson Hole",
                    "state": "WY",
                    "id": "0b8c5a2c-8f44-4f3f-9e94-3e1f8f2d7a10"
                },
                "geometry": {"type": "Point", "coordinates": [-110.821999, 43.582767]}
            }
        ]
    }"#;

    #[test]
    fn test_load_points_in_file_order() {
        let catalog = GpsCatalog::load_from_json(TWO_POINTS).expect("valid catalog");
        let attractions = catalog.attractions();

        assert_eq!(attractions.len(), 2);
        assert_eq!(attractions[0].attraction_name, "Disneyland");
        assert_eq!(attractions[0].location.latitude, 33.817595);
        assert_eq!(attractions[0].location.longitude, -117.922008);
        assert_eq!(
            attractions[1].attraction_id.to_string(),
            "0b8c5a2c-8f44-4f3f-9e94-3e1f8f2d7a10"
        );
    }

    #[test]
    fn test_polygon_geometry_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Square"},
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
            }]
        }"#;
        let result = GpsCatalog::load_from_json(json);
        assert!(matches!(result, Err(CatalogLoadError::UnsupportedGeometry)));
    }

    #[test]
    fn test_missing_name_rejected() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"city": "Nowhere"},
                "geometry": {"type": "Point", "coordinates": [0, 0]}
            }]
        }"#;
        let result = GpsCatalog::load_from_json(json);
        assert!(matches!(result, Err(CatalogLoadError::MissingProperty("name"))));
    }

    #[test]
    fn test_random_coordinate_in_bounds() {
        for _ in 0..1000 {
            let c = random_coordinate();
            assert!(c.latitude.abs() <= MAX_LATITUDE);
            assert!(c.longitude.abs() <= 180.0);
        }
    }

    #[tokio::test]
    async fn test_current_location_is_for_requested_user() {
        let catalog = GpsCatalog::load_from_json(TWO_POINTS).expect("valid catalog");
        let user_id = Uuid::new_v4();
        let location = catalog.current_location(user_id).await.expect("location");
        assert_eq!(location.user_id, user_id);
    }
}
