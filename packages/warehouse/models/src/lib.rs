#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row types returned by the warehouse data-access layer.
//!
//! The warehouse stores level columns as free text (a mix of English tokens
//! and legacy localized labels). Those are normalized at the data-access
//! boundary into the closed enums defined here, so nothing downstream ever
//! pattern-matches on raw label text.

use cafe_map_site_models::{RecommendationTier, SupplyDemandStatus};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Overall score band for an analysis site.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreLevel {
    /// Composite score 85 or above.
    Excellent,
    /// Composite score 70-85.
    Good,
    /// Composite score 60-70.
    Fair,
    /// Composite score below 60.
    Poor,
}

/// Foot-traffic band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowLevel {
    /// High daily reach.
    High,
    /// Moderate daily reach.
    Medium,
    /// Low daily reach.
    Low,
}

/// Competitive-pressure band derived from the supply/demand ratio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyDemandLevel {
    /// Little competition relative to flow.
    Low,
    /// Moderate competition.
    Medium,
    /// Heavy competition.
    High,
}

/// Bike-share infrastructure band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeShareLevel {
    /// Five or more docks nearby.
    Excellent,
    /// Three or four docks.
    Good,
    /// One or two docks.
    Fair,
    /// No docks nearby.
    Poor,
}

/// How a site is reached from its reference station.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceCategory {
    /// Within easy walking distance.
    Walk,
    /// Best reached by bike-share.
    BikeShare,
    /// Requires a transit transfer.
    Transit,
    /// Too far to serve station traffic.
    Far,
}

/// One analysis zone around a transit station, as served by the API.
///
/// Produced by the warehouse layer from a `main_analysis` row after label
/// normalization and rent attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSite {
    /// Stable identifier: `{station}_{zone_label}`.
    pub point_id: String,
    /// Reference transit station name.
    pub station: String,
    /// Zone label within the station's catchment (e.g. `"0-500m"`).
    pub zone_label: String,
    /// Zone start distance from the station, in meters.
    pub zone_start_m: f64,
    /// Daily pedestrian flow at the station.
    pub base_flow: u64,
    /// Distance decay coefficient applied to the base flow.
    pub distance_decay: f64,
    /// Estimated effective daily reach after decay.
    pub flow_accessibility: u64,
    /// Flow sub-score in `[0, 100]`.
    pub flow_score: f64,
    /// Foot-traffic band.
    pub flow_level: FlowLevel,
    /// Cafes within the analysis radius.
    pub cafe_count: u32,
    /// All competing businesses within the analysis radius.
    pub total_competitors: u32,
    /// Competitor count normalized by flow.
    pub supply_demand_ratio: f64,
    /// Competitive-pressure band.
    pub supply_demand_level: SupplyDemandLevel,
    /// Supply/demand sub-score in `[0, 100]`.
    pub competition_score: f64,
    /// Bike-share docks within the analysis radius.
    pub bike_share_count: u32,
    /// Bike-share sub-score in `[0, 100]`.
    pub bike_share_score: f64,
    /// Bike-share infrastructure band.
    pub bike_share_level: BikeShareLevel,
    /// Access mode category for the zone.
    pub distance_category: DistanceCategory,
    /// Weighted composite score in `[0, 100]`.
    pub optimal_score: f64,
    /// Overall score band.
    pub score_level: ScoreLevel,
    /// Recommendation tier (shared taxonomy, same thresholds as the engine).
    pub recommendation: RecommendationTier,
    /// Competition status (shared taxonomy).
    pub supply_demand_status: SupplyDemandStatus,
    /// Station-median monthly rent, when shop listings provide one.
    pub rent: Option<f64>,
    /// Rent sub-score for the attached rent.
    pub rent_score: Option<f64>,
}

/// A transit station with its location and daily flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Station name.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Daily pedestrian flow.
    pub daily_flow: u64,
}

/// A station name with its flow, for filter dropdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    /// Station name.
    pub name: String,
    /// Daily pedestrian flow.
    pub daily_flow: u64,
}

/// A shop listing near a station.
///
/// Source columns are messy (typo'd names, rent buried in free text); the
/// warehouse layer reconciles them before constructing this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Reference station, when known.
    pub station: Option<String>,
    /// Listing type (e.g. storefront, kiosk).
    pub shop_type: Option<String>,
    /// Shop name.
    pub name: Option<String>,
    /// Distance from the station, in meters.
    pub distance_m: Option<f64>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude.
    pub lat: Option<f64>,
    /// Longitude.
    pub lon: Option<f64>,
    /// Raw listing status text.
    pub status: Option<String>,
    /// Monthly rent, from the rent column or extracted from the status text.
    pub rent: Option<f64>,
}

/// A station together with all of its analysis zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDetail {
    /// The station itself.
    pub station: Station,
    /// Analysis zones ordered by score, best first.
    pub zones: Vec<AnalysisSite>,
}

/// Aggregate statistics over the whole analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Total analysis zones.
    pub total_sites: u64,
    /// Distinct stations covered.
    pub total_stations: u64,
    /// Mean composite score.
    pub avg_score: f64,
    /// Highest composite score.
    pub max_score: f64,
    /// Lowest composite score.
    pub min_score: f64,
    /// Mean supply/demand ratio.
    pub avg_supply_demand_ratio: f64,
    /// Total cafes across all zones.
    pub total_cafes: u64,
    /// Zones classified as recommended (top two tiers).
    pub recommended_count: u64,
    /// Zones classified below the recommended tiers.
    pub not_recommended_count: u64,
    /// Zone counts per score band.
    pub score_levels: LevelCounts,
    /// Zone counts per competition band.
    pub competition_levels: CompetitionCounts,
}

/// Zone counts per score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    /// Excellent band.
    pub excellent: u64,
    /// Good band.
    pub good: u64,
    /// Fair band.
    pub fair: u64,
    /// Poor band.
    pub poor: u64,
}

/// Zone counts per competition band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionCounts {
    /// Low competition.
    pub low: u64,
    /// Medium competition.
    pub medium: u64,
    /// High competition.
    pub high: u64,
}

/// Filters accepted by the site search operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSearchFilters {
    /// Exact station name.
    pub station: Option<String>,
    /// Minimum composite score, inclusive.
    pub min_score: Option<f64>,
    /// Maximum composite score, inclusive.
    pub max_score: Option<f64>,
    /// Competitive-pressure band.
    pub supply_demand_level: Option<SupplyDemandLevel>,
    /// Overall score band.
    pub score_level: Option<ScoreLevel>,
    /// Foot-traffic band.
    pub flow_level: Option<FlowLevel>,
    /// Bike-share band.
    pub bike_share_level: Option<BikeShareLevel>,
    /// Access mode category.
    pub distance_category: Option<DistanceCategory>,
    /// Only recommended (or only non-recommended) zones.
    pub is_recommended: Option<bool>,
    /// Exact zone label.
    pub zone: Option<String>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// One page of site search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSearchPage {
    /// The matching sites, best score first.
    pub data: Vec<AnalysisSite>,
    /// Total matches across all pages.
    pub total: u64,
    /// Page size used.
    pub limit: u64,
    /// Page offset used.
    pub offset: u64,
    /// Whether more results exist beyond this page.
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_enums_parse_screaming_snake_case() {
        assert_eq!(
            "EXCELLENT".parse::<ScoreLevel>().unwrap(),
            ScoreLevel::Excellent
        );
        assert_eq!(
            "BIKE_SHARE".parse::<DistanceCategory>().unwrap(),
            DistanceCategory::BikeShare
        );
        assert!("WALKABLE".parse::<DistanceCategory>().is_err());
    }

    #[test]
    fn analysis_site_serializes_camel_case() {
        let site = AnalysisSite {
            point_id: "Union Square_0-500m".into(),
            station: "Union Square".into(),
            zone_label: "0-500m".into(),
            zone_start_m: 0.0,
            base_flow: 42_000,
            distance_decay: 1.0,
            flow_accessibility: 42_000,
            flow_score: 42.0,
            flow_level: FlowLevel::Medium,
            cafe_count: 4,
            total_competitors: 9,
            supply_demand_ratio: 2.14,
            supply_demand_level: SupplyDemandLevel::High,
            competition_score: 0.0,
            bike_share_count: 3,
            bike_share_score: 60.0,
            bike_share_level: BikeShareLevel::Good,
            distance_category: DistanceCategory::Walk,
            optimal_score: 33.8,
            score_level: ScoreLevel::Poor,
            recommendation: RecommendationTier::NotRecommended,
            supply_demand_status: SupplyDemandStatus::MarketSaturated,
            rent: Some(1350.0),
            rent_score: Some(85.0),
        };
        let json = serde_json::to_value(&site).unwrap();
        assert_eq!(json["pointId"], "Union Square_0-500m");
        assert_eq!(json["supplyDemandLevel"], "HIGH");
        assert_eq!(json["recommendation"], "NOT_RECOMMENDED");
        assert_eq!(json["rentScore"], 85.0);
    }
}
