#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the cafe map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the warehouse row types to allow independent evolution of the API
//! contract.

use cafe_map_site_models::{ScoreResult, SiteInput};
use cafe_map_warehouse_models::{
    AnalysisSite, BikeShareLevel, DistanceCategory, FlowLevel, ScoreLevel, Shop,
    SiteSearchFilters, Station, SupplyDemandLevel,
};
use serde::{Deserialize, Serialize};

/// Default page size for site searches.
pub const DEFAULT_SITE_LIMIT: u64 = 100;

/// Query parameters for the sites endpoint.
///
/// Level parameters arrive as free strings and are validated into the
/// closed enums by [`SiteQueryParams::to_filters`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteQueryParams {
    /// Exact station name.
    pub station: Option<String>,
    /// Minimum composite score, inclusive.
    pub min_score: Option<f64>,
    /// Maximum composite score, inclusive.
    pub max_score: Option<f64>,
    /// Competitive-pressure band name.
    pub supply_demand_level: Option<String>,
    /// Overall score band name.
    pub score_level: Option<String>,
    /// Foot-traffic band name.
    pub flow_level: Option<String>,
    /// Bike-share band name.
    pub bike_share_level: Option<String>,
    /// Access mode category name.
    pub distance_category: Option<String>,
    /// Only recommended (or only non-recommended) zones.
    pub is_recommended: Option<bool>,
    /// Exact zone label.
    pub zone: Option<String>,
    /// Page size.
    pub limit: Option<u64>,
    /// Page offset.
    pub offset: Option<u64>,
}

fn parse_level<T: std::str::FromStr>(
    value: Option<&str>,
    param: &'static str,
) -> Result<Option<T>, String> {
    value
        .map(|s| {
            s.trim()
                .to_uppercase()
                .parse::<T>()
                .map_err(|_| format!("invalid value for {param}: {s}"))
        })
        .transpose()
}

impl SiteQueryParams {
    /// Validates the raw query parameters into warehouse search filters.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending parameter when a level value
    /// does not match any known band.
    pub fn to_filters(&self) -> Result<SiteSearchFilters, String> {
        Ok(SiteSearchFilters {
            station: self.station.clone(),
            min_score: self.min_score,
            max_score: self.max_score,
            supply_demand_level: parse_level::<SupplyDemandLevel>(
                self.supply_demand_level.as_deref(),
                "supplyDemandLevel",
            )?,
            score_level: parse_level::<ScoreLevel>(self.score_level.as_deref(), "scoreLevel")?,
            flow_level: parse_level::<FlowLevel>(self.flow_level.as_deref(), "flowLevel")?,
            bike_share_level: parse_level::<BikeShareLevel>(
                self.bike_share_level.as_deref(),
                "bikeShareLevel",
            )?,
            distance_category: parse_level::<DistanceCategory>(
                self.distance_category.as_deref(),
                "distanceCategory",
            )?,
            is_recommended: self.is_recommended,
            zone: self.zone.clone(),
            limit: self.limit.unwrap_or(DEFAULT_SITE_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// Query parameters for the top sites endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopQueryParams {
    /// How many sites to return (default 10).
    pub n: Option<usize>,
    /// Restrict to a single station.
    pub station: Option<String>,
}

/// Query parameters for the shops endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopQueryParams {
    /// Listing type filter.
    #[serde(rename = "type")]
    pub shop_type: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
}

/// Query parameters for the combined map data endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDataQueryParams {
    /// Whether to include shop listings in the payload.
    pub include_shops: Option<bool>,
}

/// Combined map payload: everything the map view needs in one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDataResponse {
    /// All analysis zones.
    pub sites: Vec<AnalysisSite>,
    /// All stations.
    pub stations: Vec<Station>,
    /// Shop listings, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<Shop>>,
    /// Row counts per collection.
    pub counts: MapDataCounts,
}

/// Row counts for the combined map payload.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDataCounts {
    /// Number of analysis zones.
    pub sites: usize,
    /// Number of stations.
    pub stations: usize,
    /// Number of shop listings (0 when shops were not requested).
    pub shops: usize,
}

/// Request body for single-site scoring.
///
/// All fields are optional at the wire level so that missing required
/// fields produce a 400 naming them instead of a generic deserialization
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Candidate site latitude.
    pub lat: Option<f64>,
    /// Candidate site longitude.
    pub lon: Option<f64>,
    /// Reference station name.
    pub station: Option<String>,
    /// Pedestrian count per day at the reference station.
    pub daily_flow: Option<u64>,
    /// Meters from the site to the station (default 0).
    pub transit_distance: Option<f64>,
    /// Meters to the nearest bike-share dock. Absent means no dock.
    pub bike_share_distance: Option<f64>,
    /// Competing businesses within the analysis radius (default 0).
    pub competitor_count: Option<u32>,
    /// Bike-share docks within the analysis radius (default 0).
    pub bike_share_count: Option<u32>,
    /// Monthly rent estimate. Absent means unknown.
    pub rent: Option<f64>,
}

impl CalculateRequest {
    /// Names the required fields that are absent, in wire casing.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.lat.is_none() {
            missing.push("lat");
        }
        if self.lon.is_none() {
            missing.push("lon");
        }
        if self.station.is_none() {
            missing.push("station");
        }
        if self.daily_flow.is_none() {
            missing.push("dailyFlow");
        }
        missing
    }

    /// Converts the request into engine input, applying defaults.
    ///
    /// Callers must check [`Self::missing_required`] first; absent required
    /// fields fall back to zero here.
    #[must_use]
    pub fn to_site_input(&self) -> SiteInput {
        SiteInput {
            daily_flow: self.daily_flow.unwrap_or(0),
            transit_distance: self.transit_distance.unwrap_or(0.0),
            bike_share_distance: self.bike_share_distance,
            competitor_count: self.competitor_count.unwrap_or(0),
            bike_share_count: self.bike_share_count.unwrap_or(0),
            rent: self.rent,
        }
    }
}

/// Response body for single-site scoring.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    /// Reference station name, echoed from the request.
    pub station: String,
    /// Candidate site latitude, echoed from the request.
    pub lat: f64,
    /// Candidate site longitude, echoed from the request.
    pub lon: f64,
    /// Engine output.
    pub result: ScoreResult,
}

/// Request body for batch scoring.
///
/// Items are raw JSON values so that one malformed item yields a per-item
/// error instead of rejecting the whole batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculateRequest {
    /// Candidate sites to score, in request order.
    pub sites: Vec<serde_json::Value>,
}

/// Per-item outcome in a batch scoring response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    /// The item as submitted.
    pub input: serde_json::Value,
    /// Whether scoring succeeded for this item.
    pub success: bool,
    /// Engine output, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreResult>,
    /// Error description, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for batch scoring.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    /// Items submitted.
    pub total: usize,
    /// Items scored successfully.
    pub succeeded: usize,
    /// Items that failed validation or scoring.
    pub failed: usize,
    /// Per-item outcomes, in request order.
    pub results: Vec<BatchItem>,
}

/// Request body for the AI explanation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    /// The scored site to explain.
    pub site: AnalysisSite,
}

/// Response body for the AI explanation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    /// Markdown narrative.
    pub explanation: String,
}

/// Request body for the AI comparison endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    /// The scored sites to compare (at least 2).
    pub sites: Vec<AnalysisSite>,
}

/// Response body for the AI comparison endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    /// Markdown narrative.
    pub comparison: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
