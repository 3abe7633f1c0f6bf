// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! openrouteservice.org client for geocoding and driving directions.
//!
//! Handles:
//! - Free-text address geocoding (first match only)
//! - Driving-car directions as GeoJSON, decoded into a polyline
//! - First maneuver instruction and route summary extraction

use crate::models::{Coordinates, Route};
use async_trait::async_trait;
use geo::{LineString, Point};
use geojson::{Feature, GeoJson};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Routing API errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RoutingError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Geocoding and routing backend.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Resolve a free-text address; `None` if nothing matched.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, RoutingError>;

    /// Driving route between two points.
    async fn directions(
        &self,
        start: Coordinates,
        destination: Coordinates,
    ) -> Result<Route, RoutingError>;
}

/// openrouteservice HTTP client.
#[derive(Clone)]
pub struct OpenRouteServiceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouteServiceClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Check response status and return the body text.
    async fn check_response(&self, response: reqwest::Response) -> Result<String, RoutingError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        if status.as_u16() == 429 {
            tracing::warn!("openrouteservice rate limit hit (429)");
        }

        Err(RoutingError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RoutingProvider for OpenRouteServiceClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, RoutingError> {
        let url = format!("{}/geocode/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("text", address),
                ("size", "1"),
            ])
            .send()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        let body = self.check_response(response).await?;
        parse_geocode_response(&body)
    }

    async fn directions(
        &self,
        start: Coordinates,
        destination: Coordinates,
    ) -> Result<Route, RoutingError> {
        let url = format!("{}/v2/directions/driving-car/geojson", self.base_url);

        let body = serde_json::json!({
            "coordinates": [start.lng_lat(), destination.lng_lat()],
        });

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RoutingError::Transport(e.to_string()))?;

        let body = self.check_response(response).await?;
        parse_directions_response(&body)
    }
}

// ─── Response parsing ────────────────────────────────────────────

/// First feature of a GeoJSON FeatureCollection, if any.
fn first_feature(body: &str) -> Result<Option<Feature>, RoutingError> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e: geojson::Error| RoutingError::Parse(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection.features.into_iter().next()),
        _ => Err(RoutingError::Parse(
            "expected a FeatureCollection".to_string(),
        )),
    }
}

/// Parse a `/geocode/search` response into the first match.
pub fn parse_geocode_response(body: &str) -> Result<Option<Coordinates>, RoutingError> {
    let Some(feature) = first_feature(body)? else {
        return Ok(None);
    };

    let geometry = feature
        .geometry
        .ok_or_else(|| RoutingError::Parse("geocode feature has no geometry".to_string()))?;

    let point: Point<f64> = geometry
        .value
        .try_into()
        .map_err(|e: geojson::Error| RoutingError::Parse(e.to_string()))?;

    Ok(Some(Coordinates::from(point.0)))
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    instruction: String,
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct Summary {
    distance: Option<f64>,
    duration: Option<f64>,
}

/// Parse a `/v2/directions/{profile}/geojson` response.
pub fn parse_directions_response(body: &str) -> Result<Route, RoutingError> {
    let feature = first_feature(body)?
        .ok_or_else(|| RoutingError::Parse("directions response has no route".to_string()))?;

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| RoutingError::Parse("route feature has no geometry".to_string()))?;

    let line: LineString<f64> = geometry
        .value
        .clone()
        .try_into()
        .map_err(|e: geojson::Error| RoutingError::Parse(e.to_string()))?;

    if line.0.is_empty() {
        return Err(RoutingError::Parse("route has no coordinates".to_string()));
    }

    let segments: Vec<Segment> = feature
        .property("segments")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| RoutingError::Parse(format!("invalid segments: {}", e)))?
        .unwrap_or_default();

    let next_instruction = segments
        .first()
        .and_then(|segment| segment.steps.first())
        .map(format_instruction);

    let summary: Option<Summary> = feature
        .property("summary")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| RoutingError::Parse(format!("invalid summary: {}", e)))?;

    Ok(Route {
        line,
        next_instruction,
        distance_m: summary.as_ref().and_then(|s| s.distance),
        duration_s: summary.as_ref().and_then(|s| s.duration),
    })
}

fn format_instruction(step: &Step) -> String {
    format!("{} ({} m)", step.instruction, step.distance.round() as i64)
}
